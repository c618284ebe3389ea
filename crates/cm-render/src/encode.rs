//! Raster encoders carrying the export resolution in their metadata.

use image::RgbImage;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};

use cm_model::ExportFormat;

use crate::error::{RenderError, Result};

const JPEG_QUALITY: u8 = 95;
const METERS_PER_INCH: f64 = 0.0254;

/// Encode as PNG with a `pHYs` chunk for `dpi`.
pub fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let per_meter = (f64::from(dpi) / METERS_PER_INCH).round() as u32;
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: per_meter,
            yppu: per_meter,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder
            .write_header()
            .map_err(|err| RenderError::encode(ExportFormat::Png, err))?;
        writer
            .write_image_data(image.as_raw())
            .map_err(|err| RenderError::encode(ExportFormat::Png, err))?;
        writer
            .finish()
            .map_err(|err| RenderError::encode(ExportFormat::Png, err))?;
    }
    Ok(bytes)
}

/// Encode as baseline JPEG with a JFIF density of `dpi`.
pub fn encode_jpeg(image: &RgbImage, dpi: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    let density = u16::try_from(dpi).unwrap_or(u16::MAX);
    encoder.set_pixel_density(PixelDensity::dpi(density));
    encoder
        .encode_image(image)
        .map_err(|err| RenderError::encode(ExportFormat::Jpg, err))?;
    Ok(bytes)
}
