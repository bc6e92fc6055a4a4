use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{MergeReport, StandardiseReport};

pub fn print_merge_summary(report: &MergeReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Samples"),
        header_cell("Taxa"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(report.samples),
        Cell::new(report.taxa),
        Cell::new(report.output.display()),
    ]);
    println!("{table}");
}

pub fn print_standardise_summary(report: &StandardiseReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sample"),
        header_cell("Taxa"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(&report.sample),
        Cell::new(report.taxa),
        Cell::new(report.output.display()),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
