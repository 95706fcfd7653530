use shared::{CellValue, FieldColumn};

/// Key used for null or absent cells.
pub const BLANK_KEY: &str = "(Blank)";

/// Canonical string form of a raw cell; `None` maps to [`BLANK_KEY`].
pub fn canonical_key(cell: Option<&CellValue>) -> String {
    match cell {
        Some(value) => value.to_string(),
        None => BLANK_KEY.to_string(),
    }
}

/// Canonical key of `column` at `row`. Rows past the end of a short column read as blank.
pub fn column_key(column: &FieldColumn, row: usize) -> String {
    canonical_key(column.cell(row))
}
