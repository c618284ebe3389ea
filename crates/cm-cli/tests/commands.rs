//! Integration tests for the export, preview and template commands.

use std::fs;
use std::path::PathBuf;

use cm_cli::commands::{ExportOverrides, run_export, run_preview, run_template};
use cm_cli::preview::preview_table;
use cm_cli::session::Session;
use cm_model::{Dpi, ExportFormat};
use tempfile::TempDir;

const CAT_DOG: &str = r#"
classes = 2
labels = "Cat, Dog"
matrix = [[5, 0], [2, 10]]

[export]
file_name = "pets"
"#;

fn write_session(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("session.toml");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn export_writes_png_next_to_session() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir, CAT_DOG);

    let outcome = run_export(&session, &ExportOverrides::default()).unwrap();

    assert_eq!(outcome.path, dir.path().join("pets.png"));
    assert_eq!(outcome.mime_type, "image/png");
    assert_eq!(outcome.pixels, Some((2100, 1800)));
    let bytes = fs::read(&outcome.path).unwrap();
    assert_eq!(bytes.len(), outcome.bytes);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2100, 1800));
}

#[test]
fn overrides_take_precedence_over_session() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir, CAT_DOG);
    let out = dir.path().join("exports");

    let outcome = run_export(
        &session,
        &ExportOverrides {
            format: Some(ExportFormat::Pdf),
            dpi: Some(Dpi::Dpi600),
            file_name: Some("report".to_string()),
            output_dir: Some(out.clone()),
            font: None,
        },
    )
    .unwrap();

    assert_eq!(outcome.path, out.join("report.pdf"));
    assert_eq!(outcome.mime_type, "application/pdf");
    assert_eq!(outcome.pixels, None);
    assert!(fs::read(&outcome.path).unwrap().starts_with(b"%PDF"));
    assert!(outcome.summary().starts_with("Wrote "));
}

#[test]
fn label_mismatch_blocks_export_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir, "classes = 3\nlabels = \"Cat, Dog\"\n");

    let err = run_export(&session, &ExportOverrides::default()).unwrap_err();

    let message = format!("{err:#}");
    assert!(
        message.contains("Number of class names must match number of classes"),
        "{message}"
    );
    assert!(!dir.path().join("Confusion_Matrix.png").exists());
}

#[test]
fn negative_count_is_reported() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir, "classes = 2\nmatrix = [[1, -1], [0, 0]]\n");

    let err = run_export(&session, &ExportOverrides::default()).unwrap_err();

    assert!(format!("{err:#}").contains("invalid cell value '-1'"));
}

#[test]
fn missing_font_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir, CAT_DOG);

    let err = run_export(
        &session,
        &ExportOverrides {
            font: Some(dir.path().join("missing.ttf")),
            ..ExportOverrides::default()
        },
    )
    .unwrap_err();

    assert!(format!("{err:#}").contains("load font"));
    assert!(!dir.path().join("pets.png").exists());
}

#[test]
fn preview_names_every_label() {
    let dir = TempDir::new().unwrap();
    let session = write_session(&dir, CAT_DOG);

    let table = run_preview(&session).unwrap();

    for expected in ["Actual \\ Predicted", "C1", "C2", "R1 – Cat", "R2 – Dog", "10"] {
        assert!(table.contains(expected), "missing {expected:?}\n{table}");
    }
}

#[test]
fn preview_header_layout() {
    let state = Session::parse(CAT_DOG).unwrap().to_state().unwrap();
    let table = preview_table(&state);
    let header = table
        .header()
        .unwrap()
        .cell_iter()
        .map(|cell| cell.content().replace('\n', "/"))
        .collect::<Vec<_>>()
        .join(" | ");
    insta::assert_snapshot!(header, @r"Actual \ Predicted | C1/Cat | C2/Dog");
}

#[test]
fn template_file_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("starter.toml");

    assert_eq!(run_template(5, Some(&path)).unwrap(), None);

    let state = Session::load(&path).unwrap().to_state().unwrap();
    assert_eq!(state.num_classes(), 5);
    assert!(state.has_default_labels());
}

#[test]
fn template_rejects_out_of_range_classes() {
    let err = run_template(21, None).unwrap_err();
    assert!(format!("{err:#}").contains("between 2 and 20"));
}
