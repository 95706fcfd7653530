use crate::host::IdentitySource;
use crate::node::{Level, ValueNode};
use crate::normalize::column_key;
use indexmap::IndexMap;
use shared::FieldColumn;

/// Builds the flat value list of a standalone filter in first-occurrence order.
pub fn build_standalone(
    field: usize,
    column: &FieldColumn,
    row_count: usize,
    identities: &dyn IdentitySource,
) -> Level {
    let mut first_rows: IndexMap<String, usize> = IndexMap::new();
    for row in 0..row_count {
        first_rows.entry(column_key(column, row)).or_insert(row);
    }

    let mut level = Level::new(column.display_name.clone(), 0);
    for (key, row) in first_rows {
        let identity = identities.mint(field, column, row);
        level.insert(ValueNode::new(key, identity));
    }
    level
}
