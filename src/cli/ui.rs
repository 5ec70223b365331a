use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use crate::core::rate::display_value;
use rust_decimal::Decimal;

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned rate value, or a red "N/A" when the page had none.
pub fn rate_cell(value: Decimal) -> Cell {
    if value.is_zero() {
        Cell::new("N/A")
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right)
    } else {
        Cell::new(format!("{:.4}", display_value(value)))
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right)
    }
}
