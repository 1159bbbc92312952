//! Subcommand implementations other than the main pipeline.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

use costat_model::{FieldKind, report_field_defs};

/// Print the attribute fields appended to every output dataset, in append
/// order.
pub fn run_fields() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Field").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Width").add_attribute(Attribute::Bold),
        Cell::new("Decimals").add_attribute(Attribute::Bold),
    ]);
    for column_idx in [2, 3] {
        if let Some(column) = table.column_mut(column_idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    for def in report_field_defs() {
        let kind = match def.kind {
            FieldKind::Numeric => "N",
            FieldKind::Character => "C",
        };
        table.add_row(vec![
            Cell::new(&def.name),
            Cell::new(kind),
            Cell::new(def.width),
            Cell::new(def.decimals),
        ]);
    }
    println!("{table}");
}
