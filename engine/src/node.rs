//! Value nodes, levels and filter groups.
//!
//! Nodes live in per-level `IndexMap`s keyed by canonical key, which both
//! enforces one node per (level, key) and keeps first-seen order. Parent to
//! child edges are indices into the next level of the same group; the upward
//! edge is the parent's key, never an ownership pointer.

use crate::host::IdentityToken;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Tri-state selection status of a value node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Selected,
    Indeterminate,
    Unselected,
}

impl SelectionState {
    /// Derives a parent's state from its immediate children.
    pub fn from_children<I>(children: I) -> Self
    where
        I: IntoIterator<Item = SelectionState>,
    {
        let mut all_selected = true;
        let mut any_marked = false;
        for state in children {
            match state {
                SelectionState::Selected => any_marked = true,
                SelectionState::Indeterminate => {
                    all_selected = false;
                    any_marked = true;
                }
                SelectionState::Unselected => all_selected = false,
            }
        }

        if all_selected {
            SelectionState::Selected
        } else if any_marked {
            SelectionState::Indeterminate
        } else {
            SelectionState::Unselected
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    key: String,
    identity: IdentityToken,
    selected: bool,
    indeterminate: bool,
    children: IndexSet<usize>,
    parent_key: Option<String>,
}

impl ValueNode {
    pub(crate) fn new(key: String, identity: IdentityToken) -> Self {
        Self {
            key,
            identity,
            selected: false,
            indeterminate: false,
            children: IndexSet::new(),
            parent_key: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn identity(&self) -> &IdentityToken {
        &self.identity
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    pub fn state(&self) -> SelectionState {
        if self.selected {
            SelectionState::Selected
        } else if self.indeterminate {
            SelectionState::Indeterminate
        } else {
            SelectionState::Unselected
        }
    }

    /// Indices into the next level of the same group, in link order.
    pub fn children(&self) -> &IndexSet<usize> {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Key of the most recently linked parent; `None` for roots.
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_key.as_deref()
    }

    pub(crate) fn set_state(&mut self, state: SelectionState) {
        self.selected = state == SelectionState::Selected;
        self.indeterminate = state == SelectionState::Indeterminate;
    }

    /// Appends a child edge; returns `false` when it already existed.
    pub(crate) fn link_child(&mut self, child: usize) -> bool {
        self.children.insert(child)
    }

    /// Overwrites the parent key; returns the previous one when it differed.
    pub(crate) fn relink_parent(&mut self, parent_key: &str) -> Option<String> {
        match &self.parent_key {
            Some(previous) if previous == parent_key => None,
            _ => self.parent_key.replace(parent_key.to_string()),
        }
    }
}

/// One column's worth of distinct values within a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    name: String,
    depth: usize,
    nodes: IndexMap<String, ValueNode>,
}

impl Level {
    pub(crate) fn new(name: impl Into<String>, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            nodes: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ValueNode> {
        self.nodes.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&ValueNode> {
        self.nodes.get(key)
    }

    pub fn node(&self, index: usize) -> Option<&ValueNode> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.nodes.get_index_of(key)
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub(crate) fn insert(&mut self, node: ValueNode) {
        self.nodes.insert(node.key.clone(), node);
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut ValueNode> {
        self.nodes.get_index_mut(index).map(|(_, node)| node)
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut ValueNode> {
        self.nodes.values_mut()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Hierarchy,
    Standalone,
}

/// A hierarchy (levels ordered root first) or a standalone filter (exactly one level).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    name: String,
    order: usize,
    kind: GroupKind,
    levels: Vec<Level>,
}

impl FilterGroup {
    pub(crate) fn new(name: String, order: usize, kind: GroupKind, levels: Vec<Level>) -> Self {
        Self {
            name,
            order,
            kind,
            levels,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position among all groups, taken from the source field order.
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn is_hierarchy(&self) -> bool {
        self.kind == GroupKind::Hierarchy
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, depth: usize) -> Option<&Level> {
        self.levels.get(depth)
    }

    /// Level-0 nodes: tree roots for a hierarchy, the value list for a standalone filter.
    pub fn roots(&self) -> impl Iterator<Item = &ValueNode> {
        self.levels.first().into_iter().flat_map(Level::nodes)
    }

    pub fn node_count(&self) -> usize {
        self.levels.iter().map(Level::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    pub fn selected_count(&self) -> usize {
        self.levels
            .iter()
            .flat_map(Level::nodes)
            .filter(|node| node.is_selected())
            .count()
    }

    pub(crate) fn levels_mut(&mut self) -> &mut [Level] {
        &mut self.levels
    }
}
