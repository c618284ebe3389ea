//! Terminal rendering of the entry grid.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cm_model::MatrixState;

/// Corner header of the grid.
pub const CORNER_HEADER: &str = "Actual \\ Predicted";

/// Rows are actual classes (`R1 – Cat`), columns predicted classes (`C1` over
/// the label).
#[must_use]
pub fn preview_table(state: &MatrixState) -> Table {
    let labels = state.labels();
    let mut table = Table::new();
    let mut header = vec![header_cell(CORNER_HEADER)];
    header.extend(
        labels
            .iter()
            .enumerate()
            .map(|(j, label)| header_cell(&format!("C{}\n{label}", j + 1))),
    );
    table.set_header(header);
    apply_preview_style(&mut table);

    for (i, row) in state.grid().rows().enumerate() {
        let label = labels.get(i).unwrap_or_default();
        let mut cells = vec![
            Cell::new(format!("R{} – {label}", i + 1))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ];
        cells.extend(row.iter().enumerate().map(|(j, &value)| count_cell(value, i == j)));
        table.add_row(cells);
    }
    for index in 1..table.column_count() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn apply_preview_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(value: u64, diagonal: bool) -> Cell {
    if value == 0 {
        Cell::new(value).add_attribute(Attribute::Dim)
    } else if diagonal {
        Cell::new(value).fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new(value)
    }
}
