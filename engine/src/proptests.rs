//! Property checks over generated trees. Values at each level embed their
//! parent's key so every child has exactly one parent.

use crate::hierarchy::build_hierarchy;
use crate::host::RowIdentity;
use crate::node::{Level, SelectionState, ValueNode};
use crate::search::{SearchTerm, matches};
use crate::selection;
use crate::standalone::build_standalone;
use indexmap::IndexSet;
use proptest::prelude::*;
use shared::FieldColumn;

// -- Strategy helpers --

fn arb_rows() -> impl Strategy<Value = Vec<(u8, u8, u8)>> {
    prop::collection::vec((0..3u8, 0..3u8, 0..3u8), 1..16)
}

fn arb_toggles() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..3usize, any::<usize>()), 0..10)
}

fn columns(rows: &[(u8, u8, u8)]) -> [Vec<String>; 3] {
    [
        rows.iter().map(|(a, _, _)| format!("a{a}")).collect(),
        rows.iter().map(|(a, b, _)| format!("a{a}b{b}")).collect(),
        rows.iter().map(|(a, b, c)| format!("a{a}b{b}c{c}")).collect(),
    ]
}

fn tree(rows: &[(u8, u8, u8)]) -> Vec<Level> {
    let [a, b, c] = columns(rows);
    let fields = [
        FieldColumn::new("A").values(a),
        FieldColumn::new("B").values(b),
        FieldColumn::new("C").values(c),
    ];
    let refs: Vec<(usize, &FieldColumn)> = fields.iter().enumerate().collect();
    build_hierarchy(&refs, rows.len(), &RowIdentity).0
}

fn first_occurrence(values: &[String]) -> Vec<String> {
    values.iter().cloned().collect::<IndexSet<_>>().into_iter().collect()
}

fn apply_toggles(levels: &mut [Level], toggles: &[(usize, usize)]) {
    for &(depth, pick) in toggles {
        let len = levels[depth].len();
        selection::toggle(levels, depth, pick % len);
    }
}

fn descendants(levels: &[Level], depth: usize, index: usize) -> Vec<&ValueNode> {
    let mut found = Vec::new();
    let mut pending: Vec<(usize, usize)> = levels[depth]
        .node(index)
        .map(|node| node.children().iter().map(|&child| (depth + 1, child)).collect())
        .unwrap_or_default();
    while let Some((depth, index)) = pending.pop() {
        if let Some(node) = levels.get(depth).and_then(|level| level.node(index)) {
            found.push(node);
            pending.extend(node.children().iter().map(|&child| (depth + 1, child)));
        }
    }
    found
}

/// Keys of parents whose state disagrees with their immediate children.
fn inconsistent_parents(levels: &[Level]) -> Vec<String> {
    levels
        .windows(2)
        .flat_map(|pair| {
            let (parents, children) = (&pair[0], &pair[1]);
            parents
                .nodes()
                .filter(|node| node.has_children())
                .filter(move |node| {
                    let derived = SelectionState::from_children(
                        node.children()
                            .iter()
                            .filter_map(|&child| children.node(child))
                            .map(ValueNode::state),
                    );
                    node.state() != derived
                })
                .map(|node| node.key().to_string())
        })
        .collect()
}

proptest! {
    #[test]
    fn standalone_dedups_in_first_occurrence_order(
        values in prop::collection::vec(prop::sample::select(vec!["S", "M", "L", "XL"]), 0..24)
    ) {
        let column = FieldColumn::new("Size").values(values.clone());
        let level = build_standalone(0, &column, values.len(), &RowIdentity);

        let owned: Vec<String> = values.iter().map(|value| value.to_string()).collect();
        let keys: Vec<String> = level.keys().map(str::to_string).collect();
        prop_assert_eq!(keys, first_occurrence(&owned));
    }

    #[test]
    fn hierarchy_levels_dedup_in_first_occurrence_order(rows in arb_rows()) {
        let levels = tree(&rows);

        for (level, column) in levels.iter().zip(columns(&rows)) {
            let keys: Vec<String> = level.keys().map(str::to_string).collect();
            prop_assert_eq!(keys, first_occurrence(&column));
        }
    }

    #[test]
    fn selecting_cascades_to_every_descendant(
        rows in arb_rows(),
        toggles in arb_toggles(),
        depth in 0..3usize,
        pick in any::<usize>(),
    ) {
        let mut levels = tree(&rows);
        apply_toggles(&mut levels, &toggles);
        let index = pick % levels[depth].len();

        let state = selection::toggle(&mut levels, depth, index);

        if let Some(state) = state {
            for node in descendants(&levels, depth, index) {
                prop_assert_eq!(node.state(), state);
            }
        }
    }

    #[test]
    fn parents_always_agree_with_children(rows in arb_rows(), toggles in arb_toggles()) {
        let mut levels = tree(&rows);

        apply_toggles(&mut levels, &toggles);

        let offenders = inconsistent_parents(&levels);
        prop_assert!(offenders.is_empty(), "inconsistent parents: {:?}", offenders);
    }

    #[test]
    fn double_toggle_restores_settled_nodes(
        rows in arb_rows(),
        toggles in arb_toggles(),
        depth in 0..3usize,
        pick in any::<usize>(),
    ) {
        let mut levels = tree(&rows);
        apply_toggles(&mut levels, &toggles);
        let index = pick % levels[depth].len();
        prop_assume!(!levels[depth].node(index).is_some_and(ValueNode::is_indeterminate));
        let before = levels.clone();

        selection::toggle(&mut levels, depth, index);
        selection::toggle(&mut levels, depth, index);

        prop_assert_eq!(levels, before);
    }

    #[test]
    fn matching_child_implies_matching_parent(
        rows in arb_rows(),
        needle in prop::sample::select(vec!["a0", "b1", "c2", "a1b", "0c", "B2C", "zz"]),
    ) {
        let levels = tree(&rows);
        let term = SearchTerm::new(needle);

        for depth in 0..levels.len() - 1 {
            for (index, node) in levels[depth].nodes().enumerate() {
                for &child in node.children() {
                    if matches(&levels, depth + 1, child, &term) {
                        prop_assert!(matches(&levels, depth, index, &term));
                    }
                }
            }
        }
    }
}
