//! End-to-end export tests: snapshot in, encoded bytes out.

use std::io::Cursor;

use cm_model::{ClassLabels, ConfusionGrid, Dpi, ExportConfig, ExportFormat, MatrixSnapshot};
use cm_render::{
    Colormap, HelveticaMetrics, RenderExporter, Scene, TextMetrics, TextRole, layout,
};
use image::ImageReader;
use lopdf::Document;
use lopdf::content::Content;
use proptest::prelude::*;

fn cat_dog() -> MatrixSnapshot {
    MatrixSnapshot::new(
        ClassLabels::parse("Cat, Dog"),
        ConfusionGrid::from_rows(&[vec![5, 0], vec![2, 10]]).unwrap(),
    )
    .unwrap()
}

fn sized(n: usize, labels: Vec<String>) -> MatrixSnapshot {
    let rows: Vec<Vec<u64>> = (0..n)
        .map(|r| (0..n).map(|c| (r * 37 + c * 11) as u64 % 1000).collect())
        .collect();
    MatrixSnapshot::new(
        ClassLabels::from_vec(labels).unwrap(),
        ConfusionGrid::from_rows(&rows).unwrap(),
    )
    .unwrap()
}

fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap()
}

fn pdf_strings(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    let page_id = *pages.values().next().unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|operand| operand.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .collect()
}

fn texts_outside(scene: &Scene, metrics: &dyn TextMetrics) -> Vec<String> {
    let frame = scene.frame();
    scene
        .texts()
        .filter_map(|text| {
            let bounds = text.placement(metrics).bounds;
            (!frame.contains_rect(&bounds, 0.0))
                .then(|| format!("{:?} {:?} at {bounds:?}", text.role, text.content))
        })
        .collect()
}

fn assert_text_inside(scene: &Scene, metrics: &dyn TextMetrics) {
    let escaped = texts_outside(scene, metrics);
    assert!(escaped.is_empty(), "text escapes the figure: {escaped:?}");
}

#[test]
fn png_has_figure_size_times_dpi() {
    let exporter = RenderExporter::new().unwrap();
    let config = ExportConfig::new(ExportFormat::Png, Dpi::Dpi300, "matrix").unwrap();
    let image = exporter.export(&cat_dog(), &config).unwrap();

    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.file_name, "matrix.png");
    assert_eq!(png_dimensions(&image.bytes), (2100, 1800));
}

#[test]
fn doubling_dpi_doubles_png_dimensions() {
    let exporter = RenderExporter::new().unwrap();
    let low = exporter
        .render(&cat_dog(), ExportFormat::Png, Dpi::Dpi300)
        .unwrap();
    let high = exporter
        .render(&cat_dog(), ExportFormat::Png, Dpi::Dpi600)
        .unwrap();

    let (w1, h1) = png_dimensions(&low);
    let (w2, h2) = png_dimensions(&high);
    assert_eq!((w2, h2), (w1 * 2, h1 * 2));
}

#[test]
fn jpg_decodes_with_figure_size() {
    let exporter = RenderExporter::new().unwrap();
    let config = ExportConfig::new(ExportFormat::Jpg, Dpi::Dpi300, "matrix").unwrap();
    let image = exporter.export(&cat_dog(), &config).unwrap();

    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.file_name, "matrix.jpg");
    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2100, 1800));
}

#[test]
fn pdf_mime_type_does_not_depend_on_dpi() {
    let exporter = RenderExporter::new().unwrap();
    for dpi in Dpi::ALL {
        let config = ExportConfig::new(ExportFormat::Pdf, dpi, "matrix").unwrap();
        let image = exporter.export(&cat_dog(), &config).unwrap();
        assert_eq!(image.mime_type, "application/pdf");
        assert_eq!(image.file_name, "matrix.pdf");
        assert!(image.bytes.starts_with(b"%PDF"));
    }
}

#[test]
fn pdf_shows_counts_labels_and_titles() {
    let exporter = RenderExporter::new().unwrap();
    let bytes = exporter
        .render(&cat_dog(), ExportFormat::Pdf, Dpi::Dpi300)
        .unwrap();
    let strings = pdf_strings(&bytes);

    for expected in [
        "5",
        "0",
        "2",
        "10",
        "Cat",
        "Dog",
        "Predicted",
        "Actual",
        "Confusion Matrix",
    ] {
        assert!(
            strings.iter().any(|s| s == expected),
            "missing {expected:?} in {strings:?}"
        );
    }
}

#[test]
fn each_count_is_annotated_once_on_its_cell() {
    let exporter = RenderExporter::new().unwrap();
    let snapshot = cat_dog();
    for format in ExportFormat::ALL {
        let scene = exporter.scene(&snapshot, format);
        let annotations: Vec<_> = scene
            .texts()
            .filter(|text| matches!(text.role, TextRole::Cell { .. }))
            .collect();
        assert_eq!(annotations.len(), 4);

        for (content, row, col) in [("5", 0, 0), ("0", 0, 1), ("2", 1, 0), ("10", 1, 1)] {
            let matching: Vec<_> = annotations
                .iter()
                .filter(|text| text.content == content)
                .collect();
            assert_eq!(matching.len(), 1, "{content} annotated more than once");
            assert_eq!(matching[0].role, TextRole::Cell { row, col });

            let cell = scene
                .cells
                .iter()
                .find(|cell| cell.row == row && cell.col == col)
                .unwrap();
            let (cx, cy) = cell.rect.center();
            let (ax, ay) = matching[0].anchor;
            assert!((cx - ax).abs() < 1e-3 && (cy - ay).abs() < 1e-3);
        }
    }
}

#[test]
fn darkest_colour_marks_the_largest_count() {
    let exporter = RenderExporter::new().unwrap();
    let snapshot = cat_dog();
    let scene = exporter.scene(&snapshot, ExportFormat::Png);
    let image = exporter.render_raster(&snapshot, Dpi::Dpi300);
    let scale = 300.0 / 72.0;

    let colour_at = |row: usize, col: usize| {
        let cell = scene
            .cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
            .unwrap();
        // corner of the cell, clear of the centred annotation
        let x = ((cell.rect.x + cell.rect.width * 0.1) * scale) as u32;
        let y = ((cell.rect.y + cell.rect.height * 0.1) * scale) as u32;
        image.get_pixel(x, y).0
    };

    assert_eq!(colour_at(1, 1), Colormap::blues().sample(1.0).0);
    assert_eq!(colour_at(0, 1), Colormap::blues().sample(0.0).0);
}

#[test]
fn text_stays_inside_the_figure_for_every_class_count() {
    let exporter = RenderExporter::new().unwrap();
    for n in cm_model::MIN_CLASSES..=cm_model::MAX_CLASSES {
        let snapshot = sized(n, ClassLabels::defaults(n).as_slice().to_vec());
        assert_text_inside(&layout(&snapshot, &HelveticaMetrics), &HelveticaMetrics);
        assert_text_inside(&layout(&snapshot, exporter.font()), exporter.font());
    }
}

#[test]
fn long_labels_are_kept_inside_the_figure() {
    let exporter = RenderExporter::new().unwrap();
    for n in [2, 7, 20] {
        let labels = (0..n)
            .map(|i| format!("A remarkably verbose class description number {i}"))
            .collect();
        let snapshot = sized(n, labels);
        assert_text_inside(&layout(&snapshot, &HelveticaMetrics), &HelveticaMetrics);
        assert_text_inside(&layout(&snapshot, exporter.font()), exporter.font());
    }
}

#[test]
fn flat_grid_uses_lightest_colour_everywhere() {
    let snapshot = MatrixSnapshot::new(ClassLabels::defaults(3), ConfusionGrid::zeros(3)).unwrap();
    let scene = layout(&snapshot, &HelveticaMetrics);
    assert!(
        scene
            .cells
            .iter()
            .all(|cell| cell.color == Colormap::blues().sample(0.0))
    );
    let ticks: Vec<&str> = scene
        .texts()
        .filter(|text| matches!(text.role, TextRole::ColorbarTick(_)))
        .map(|text| text.content.as_str())
        .collect();
    assert_eq!(ticks, ["0", "1"]);
}

fn counts_and_labels() -> impl Strategy<Value = (Vec<Vec<u64>>, Vec<String>)> {
    (cm_model::MIN_CLASSES..=cm_model::MAX_CLASSES).prop_flat_map(|n| {
        (
            prop::collection::vec(
                prop::collection::vec(prop_oneof![0u64..100, 0u64..10_000_000_000], n),
                n,
            ),
            prop::collection::vec("[A-Za-z][A-Za-z0-9 _-]{0,40}", n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn arbitrary_counts_and_labels_stay_inside_the_figure(
        (rows, labels) in counts_and_labels(),
    ) {
        let snapshot = MatrixSnapshot::new(
            ClassLabels::from_vec(labels).unwrap(),
            ConfusionGrid::from_rows(&rows).unwrap(),
        )
        .unwrap();
        let exporter = RenderExporter::new().unwrap();

        let vector = texts_outside(&layout(&snapshot, &HelveticaMetrics), &HelveticaMetrics);
        prop_assert!(vector.is_empty(), "{:?}", vector);
        let raster = texts_outside(&layout(&snapshot, exporter.font()), exporter.font());
        prop_assert!(raster.is_empty(), "{:?}", raster);
    }
}
