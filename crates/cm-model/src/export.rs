//! Export settings chosen before rendering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Default download name, without extension.
pub const DEFAULT_FILE_NAME: &str = "Confusion_Matrix";

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
    Pdf,
}

impl ExportFormat {
    /// All formats, in selector order.
    pub const ALL: [Self; 3] = [Self::Png, Self::Jpg, Self::Pdf];

    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Pdf => "application/pdf",
        }
    }

    /// Whether the output is a pixel raster.
    #[must_use]
    pub const fn is_raster(self) -> bool {
        matches!(self, Self::Png | Self::Jpg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpg => write!(f, "JPG"),
            Self::Pdf => write!(f, "PDF"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(ModelError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ExportFormat> for String {
    fn from(format: ExportFormat) -> Self {
        format.extension().to_string()
    }
}

/// Export resolution in dots per inch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Dpi {
    #[default]
    Dpi300,
    Dpi600,
}

impl Dpi {
    /// Both supported resolutions.
    pub const ALL: [Self; 2] = [Self::Dpi300, Self::Dpi600];

    /// Dots per inch as a number.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Dpi300 => 300,
            Self::Dpi600 => 600,
        }
    }
}

impl fmt::Display for Dpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl TryFrom<u32> for Dpi {
    type Error = ModelError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            300 => Ok(Self::Dpi300),
            600 => Ok(Self::Dpi600),
            other => Err(ModelError::UnsupportedDpi(other)),
        }
    }
}

impl From<Dpi> for u32 {
    fn from(dpi: Dpi) -> Self {
        dpi.value()
    }
}

/// Settings for one export action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    format: ExportFormat,
    dpi: Dpi,
    file_name: String,
}

impl ExportConfig {
    /// Create export settings.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyFileName`] if `file_name` is blank.
    pub fn new(format: ExportFormat, dpi: Dpi, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into().trim().to_string();
        if file_name.is_empty() {
            return Err(ModelError::EmptyFileName);
        }
        Ok(Self {
            format,
            dpi,
            file_name,
        })
    }

    #[must_use]
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    #[must_use]
    pub fn dpi(&self) -> Dpi {
        self.dpi
    }

    /// File name as entered, without extension.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Download name `{file_name}.{ext}`.
    #[must_use]
    pub fn file_name_with_extension(&self) -> String {
        format!("{}.{}", self.file_name, self.format.extension())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            dpi: Dpi::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}
