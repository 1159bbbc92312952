//! Run summary output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::pipeline::RunSummary;

pub fn print_summary(summary: &RunSummary) {
    if summary.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", summary.output_dir.display());
    }
    println!("Base regions per dataset: {}", summary.base_regions);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("Reports"),
        header_cell("Written"),
        header_cell("Skipped"),
        header_cell("Failed"),
    ]);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.discovered),
        Cell::new(summary.written.len()).fg(Color::Green),
        count_cell(summary.skipped.len(), Color::Yellow),
        count_cell(summary.failed.len(), Color::Red),
    ]);
    println!("{table}");

    for (path, reason) in &summary.skipped {
        println!("skipped {}: {reason}", path.display());
    }
    if summary.has_failures() {
        eprintln!("Failures:");
        for (path, reason) in &summary.failed {
            eprintln!("- {}: {reason}", path.display());
        }
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(color)
    }
}
