//! Vector backend: a single-page PDF drawn with the base-14 Helvetica font.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::trace;

use crate::color::{Colormap, Rgb};
use crate::error::Result;
use crate::layout::{POINTS_PER_INCH, TITLE};
use crate::metrics::HelveticaMetrics;
use crate::scene::{Element, Rect, Scene, TextItem};

const FONT_NAME: &str = "F1";
const PRODUCER: &str = concat!("cm-render ", env!("CARGO_PKG_VERSION"));

/// Write `scene` as a PDF page of the figure's size.
///
/// Vector content is resolution independent; `dpi` only sets the pixel height
/// of the embedded colour bar gradient.
pub fn write_pdf(scene: &Scene, dpi: u32) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut page = PageWriter {
        height: scene.height,
        dpi,
        operations: Vec::new(),
        images: Vec::new(),
    };
    for element in &scene.elements {
        page.draw(&mut doc, element);
    }

    let mut xobjects = Dictionary::new();
    for (name, id) in &page.images {
        xobjects.set(name.as_str(), *id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { FONT_NAME => font_id },
        "XObject" => xobjects,
    });
    let operation_count = page.operations.len();
    let content = Content {
        operations: page.operations,
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), scene.width.into(), scene.height.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(TITLE),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    trace!(operations = operation_count, bytes = bytes.len(), "wrote pdf");
    Ok(bytes)
}

struct PageWriter {
    height: f32,
    dpi: u32,
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

impl PageWriter {
    fn draw(&mut self, doc: &mut Document, element: &Element) {
        match element {
            Element::Fill { rect, color } => {
                self.fill_color(*color);
                self.push("re", self.rect_operands(rect));
                self.push("f", vec![]);
            }
            Element::Line {
                from,
                to,
                width,
                color,
            } => {
                self.push("w", vec![(*width).into()]);
                self.push("J", vec![2.into()]);
                let [r, g, b] = color.unit();
                self.push("RG", vec![r.into(), g.into(), b.into()]);
                self.push("m", vec![from.0.into(), (self.height - from.1).into()]);
                self.push("l", vec![to.0.into(), (self.height - to.1).into()]);
                self.push("S", vec![]);
            }
            Element::Gradient { rect, colormap } => {
                let name = format!("Im{}", self.images.len() + 1);
                let id = doc.add_object(gradient_image(rect, *colormap, self.dpi));
                self.images.push((name.clone(), id));
                self.push("q", vec![]);
                self.push(
                    "cm",
                    vec![
                        rect.width.into(),
                        0.into(),
                        0.into(),
                        rect.height.into(),
                        rect.x.into(),
                        (self.height - rect.bottom()).into(),
                    ],
                );
                self.push("Do", vec![Object::Name(name.into_bytes())]);
                self.push("Q", vec![]);
            }
            Element::Text(text) => self.text(text),
        }
    }

    fn text(&mut self, item: &TextItem) {
        if item.content.is_empty() {
            return;
        }
        let placement = item.placement(&HelveticaMetrics);
        let (sin, cos) = item.rotation.to_radians().sin_cos();
        self.fill_color(item.color);
        self.push("BT", vec![]);
        self.push("Tf", vec![FONT_NAME.into(), item.size.into()]);
        self.push(
            "Tm",
            vec![
                cos.into(),
                sin.into(),
                (-sin).into(),
                cos.into(),
                placement.origin.0.into(),
                (self.height - placement.origin.1).into(),
            ],
        );
        self.push(
            "Tj",
            vec![Object::String(win_ansi(&item.content), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    fn fill_color(&mut self, color: Rgb) {
        let [r, g, b] = color.unit();
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn rect_operands(&self, rect: &Rect) -> Vec<Object> {
        vec![
            rect.x.into(),
            (self.height - rect.bottom()).into(),
            rect.width.into(),
            rect.height.into(),
        ]
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }
}

/// One-pixel-wide RGB image of the colour scale, darkest row first.
fn gradient_image(rect: &Rect, colormap: Colormap, dpi: u32) -> Stream {
    let rows = ((rect.height / POINTS_PER_INCH) * dpi as f32).round().max(2.0) as u32;
    let mut pixels = Vec::with_capacity(rows as usize * 3);
    for row in 0..rows {
        let t = 1.0 - row as f32 / (rows - 1) as f32;
        pixels.extend_from_slice(&colormap.sample(t).0);
    }
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => i64::from(rows),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        pixels,
    )
}

/// Encode text for a WinAnsi font; characters it cannot show become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '\u{2026}' => 0x85,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{20ac}' => 0x80,
            _ => b'?',
        })
        .collect()
}
