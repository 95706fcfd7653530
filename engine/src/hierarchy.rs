//! Hierarchy tree builder.
//!
//! Two passes over the rows. Dedup runs for every level before any linking,
//! so linking never sees a half-built level:
//!
//! 1. per level, the first occurrence of each canonical key creates its node
//!    (and mints its identity);
//! 2. per row, each adjacent level pair links parent to child.
//!
//! Children keep link order and are never sorted, so ordinal columns such as
//! months keep their source order.
//!
//! A value that appears under several parents is one shared node: it is listed
//! as a child of every parent it was linked under, but its `parent_key` is the
//! parent linked last in row order. Upward recomputation follows that key only.

use crate::host::IdentitySource;
use crate::node::{Level, ValueNode};
use crate::normalize::column_key;
use shared::FieldColumn;

/// Anomalies absorbed while linking one hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Parent or child key missing from its level map.
    pub skipped_edges: usize,
    /// Links that moved a child's `parent_key` to a different parent.
    pub reparented_nodes: usize,
}

pub fn build_hierarchy(
    columns: &[(usize, &FieldColumn)],
    row_count: usize,
    identities: &dyn IdentitySource,
) -> (Vec<Level>, LinkStats) {
    let mut levels: Vec<Level> = columns
        .iter()
        .enumerate()
        .map(|(depth, &(field, column))| dedup_level(field, column, depth, row_count, identities))
        .collect();

    let mut stats = LinkStats::default();
    for row in 0..row_count {
        for depth in 0..levels.len().saturating_sub(1) {
            let parent_key = column_key(columns[depth].1, row);
            let child_key = column_key(columns[depth + 1].1, row);
            link(&mut levels, depth, &parent_key, &child_key, &mut stats);
        }
    }

    if stats.skipped_edges > 0 {
        log::warn!(
            "hierarchy '{}': skipped {} edges with unresolved keys",
            columns.first().map_or("", |(_, column)| column.display_name.as_str()),
            stats.skipped_edges
        );
    }

    (levels, stats)
}

fn dedup_level(
    field: usize,
    column: &FieldColumn,
    depth: usize,
    row_count: usize,
    identities: &dyn IdentitySource,
) -> Level {
    let mut level = Level::new(column.display_name.clone(), depth);
    for row in 0..row_count {
        let key = column_key(column, row);
        if !level.contains_key(&key) {
            let identity = identities.mint(field, column, row);
            level.insert(ValueNode::new(key, identity));
        }
    }
    level
}

fn link(
    levels: &mut [Level],
    depth: usize,
    parent_key: &str,
    child_key: &str,
    stats: &mut LinkStats,
) {
    let (upper, lower) = levels.split_at_mut(depth + 1);
    let parent_level = &mut upper[depth];
    let child_level = &mut lower[0];

    let (Some(parent_index), Some(child_index)) =
        (parent_level.index_of(parent_key), child_level.index_of(child_key))
    else {
        stats.skipped_edges += 1;
        return;
    };

    if let Some(parent) = parent_level.node_mut(parent_index) {
        parent.link_child(child_index);
    }
    let previous = child_level
        .node_mut(child_index)
        .and_then(|child| child.relink_parent(parent_key));
    if let Some(previous) = previous {
        stats.reparented_nodes += 1;
        log::debug!(
            "level '{}': '{}' relinked from parent '{}' to '{}'",
            child_level.name(),
            child_key,
            previous,
            parent_key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RowIdentity;
    use crate::normalize::BLANK_KEY;

    fn keys(level: &Level) -> Vec<&str> {
        level.keys().collect()
    }

    fn child_keys<'a>(levels: &'a [Level], depth: usize, key: &str) -> Vec<&'a str> {
        let node = levels[depth].get(key).unwrap();
        node.children()
            .iter()
            .map(|&index| levels[depth + 1].node(index).unwrap().key())
            .collect()
    }

    #[test]
    fn links_parents_to_children_in_first_seen_order() {
        let category = FieldColumn::new("Category").values(["Fruit", "Fruit", "Veg", "Fruit"]);
        let item = FieldColumn::new("Item").values(["Apple", "Banana", "Carrot", "Apple"]);

        let (levels, stats) = build_hierarchy(&[(0, &category), (1, &item)], 4, &RowIdentity);

        assert_eq!(keys(&levels[0]), vec!["Fruit", "Veg"]);
        assert_eq!(keys(&levels[1]), vec!["Apple", "Banana", "Carrot"]);
        assert_eq!(child_keys(&levels, 0, "Fruit"), vec!["Apple", "Banana"]);
        assert_eq!(child_keys(&levels, 0, "Veg"), vec!["Carrot"]);
        assert_eq!(levels[1].get("Carrot").unwrap().parent_key(), Some("Veg"));
        assert_eq!(levels[0].get("Fruit").unwrap().parent_key(), None);
        assert_eq!(stats, LinkStats::default());
    }

    #[test]
    fn identity_binds_to_first_occurrence() {
        let category = FieldColumn::new("Category").values(["Veg", "Fruit", "Fruit"]);
        let item = FieldColumn::new("Item").values(["Carrot", "Apple", "Apple"]);

        let (levels, _) = build_hierarchy(&[(0, &category), (1, &item)], 3, &RowIdentity);

        assert_eq!(levels[0].get("Fruit").unwrap().identity().as_str(), "0:Category#1");
        assert_eq!(levels[1].get("Apple").unwrap().identity().as_str(), "1:Item#1");
    }

    #[test]
    fn ordinal_children_are_not_sorted() {
        let year = FieldColumn::new("Year").values(["2024", "2024", "2024"]);
        let month = FieldColumn::new("Month").values(["Mar", "Jan", "Feb"]);

        let (levels, _) = build_hierarchy(&[(0, &year), (1, &month)], 3, &RowIdentity);

        assert_eq!(child_keys(&levels, 0, "2024"), vec!["Mar", "Jan", "Feb"]);
    }

    #[test]
    fn blanks_link_like_any_value() {
        let region = FieldColumn::new("Region").optional_values([Some("North"), None, None]);
        let city = FieldColumn::new("City").optional_values([Some("Oslo"), Some("Bergen"), None]);

        let (levels, _) = build_hierarchy(&[(0, &region), (1, &city)], 3, &RowIdentity);

        assert_eq!(keys(&levels[0]), vec!["North", BLANK_KEY]);
        assert_eq!(child_keys(&levels, 0, BLANK_KEY), vec!["Bergen", BLANK_KEY]);
        assert_eq!(levels[1].get(BLANK_KEY).unwrap().parent_key(), Some(BLANK_KEY));
    }

    #[test]
    fn ragged_levels_read_missing_rows_as_blank() {
        let region = FieldColumn::new("Region").values(["North", "South"]);
        let city = FieldColumn::new("City").values(["Oslo"]);

        let (levels, _) = build_hierarchy(&[(0, &region), (1, &city)], 2, &RowIdentity);

        assert_eq!(child_keys(&levels, 0, "South"), vec![BLANK_KEY]);
    }

    #[test]
    fn shared_child_keeps_last_linked_parent() {
        let category = FieldColumn::new("Category").values(["Fruit", "Snack", "Fruit"]);
        let item = FieldColumn::new("Item").values(["Apple", "Apple", "Pear"]);

        let (levels, stats) = build_hierarchy(&[(0, &category), (1, &item)], 3, &RowIdentity);

        assert_eq!(levels[1].len(), 2);
        assert_eq!(child_keys(&levels, 0, "Fruit"), vec!["Apple", "Pear"]);
        assert_eq!(child_keys(&levels, 0, "Snack"), vec!["Apple"]);
        assert_eq!(levels[1].get("Apple").unwrap().parent_key(), Some("Snack"));
        assert_eq!(stats.reparented_nodes, 1);
    }

    #[test]
    fn zero_rows_give_empty_levels() {
        let a = FieldColumn::new("A");
        let b = FieldColumn::new("B");

        let (levels, stats) = build_hierarchy(&[(0, &a), (1, &b)], 0, &RowIdentity);

        assert_eq!(levels.len(), 2);
        assert!(levels.iter().all(Level::is_empty));
        assert_eq!(stats, LinkStats::default());
    }

    #[test]
    fn unresolved_keys_are_counted_not_fatal() {
        let category = FieldColumn::new("Category").values(["Fruit"]);
        let item = FieldColumn::new("Item").values(["Apple"]);
        let (mut levels, _) = build_hierarchy(&[(0, &category), (1, &item)], 1, &RowIdentity);

        let mut stats = LinkStats::default();
        link(&mut levels, 0, "Fruit", "Durian", &mut stats);
        link(&mut levels, 0, "Fruit", "Apple", &mut stats);

        assert_eq!(stats.skipped_edges, 1);
        assert_eq!(child_keys(&levels, 0, "Fruit"), vec!["Apple"]);
    }
}
