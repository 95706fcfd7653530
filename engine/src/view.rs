//! Read-only projection for the presentation layer.
//!
//! Flattens each group into the rows a tree/list widget draws, depth-first in
//! child order. A collapsed group has no rows; children appear only under an
//! expanded node and, while a search is active, only when they match.

use crate::node::{FilterGroup, GroupKind, SelectionState};
use crate::search::{MatchTable, SearchTerm};
use crate::session::SessionState;
use serde::Serialize;
use shared::expansion_key;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleRow {
    pub depth: usize,
    pub key: String,
    pub state: SelectionState,
    pub has_children: bool,
    pub expanded: bool,
    pub expansion_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub name: String,
    pub order: usize,
    pub kind: GroupKind,
    pub collapsed: bool,
    pub selected_count: usize,
    pub rows: Vec<VisibleRow>,
}

/// What the presentation layer should show instead of (or above) the groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// No groups, or groups without a single value.
    NoData,
    /// A search is active and nothing matches it.
    NoResults,
    Ready,
}

pub fn project(groups: &[FilterGroup], session: &SessionState, term: &SearchTerm) -> Vec<GroupView> {
    groups
        .iter()
        .map(|group| {
            let collapsed = session.is_collapsed(group.name());
            GroupView {
                name: group.name().to_string(),
                order: group.order(),
                kind: group.kind(),
                collapsed,
                selected_count: group.selected_count(),
                rows: if collapsed {
                    Vec::new()
                } else {
                    visible_rows(group, session, term)
                },
            }
        })
        .collect()
}

pub fn view_state(groups: &[FilterGroup], term: &SearchTerm) -> ViewState {
    if groups.iter().all(FilterGroup::is_empty) {
        return ViewState::NoData;
    }
    let any_match = !term.is_active()
        || groups
            .iter()
            .any(|group| MatchTable::compute(group.levels(), term).any_root());
    if any_match {
        ViewState::Ready
    } else {
        ViewState::NoResults
    }
}

fn visible_rows(group: &FilterGroup, session: &SessionState, term: &SearchTerm) -> Vec<VisibleRow> {
    let levels = group.levels();
    let table = MatchTable::compute(levels, term);
    let mut rows = Vec::new();

    let root_count = levels.first().map_or(0, |roots| roots.len());
    let mut pending: Vec<(usize, usize)> = (0..root_count)
        .rev()
        .filter(|&index| table.matches(0, index))
        .map(|index| (0, index))
        .collect();

    while let Some((depth, index)) = pending.pop() {
        let Some(node) = levels.get(depth).and_then(|level| level.node(index)) else {
            continue;
        };
        let expanded = node.has_children() && session.is_expanded(group.name(), depth, node.key());

        rows.push(VisibleRow {
            depth,
            key: node.key().to_string(),
            state: node.state(),
            has_children: node.has_children(),
            expanded,
            expansion_key: expansion_key(group.name(), depth, node.key()),
        });

        if expanded {
            pending.extend(
                node.children()
                    .iter()
                    .rev()
                    .filter(|&&child| table.matches(depth + 1, child))
                    .map(|&child| (depth + 1, child)),
            );
        }
    }

    rows
}
