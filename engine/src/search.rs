use crate::node::{FilterGroup, Level};
use shared::expansion_key;

/// Case-insensitive containment term. An empty term matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    needle: String,
}

impl SearchTerm {
    pub fn new(term: impl Into<String>) -> Self {
        let raw = term.into();
        let needle = raw.to_lowercase();
        Self { raw, needle }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_active(&self) -> bool {
        !self.needle.is_empty()
    }

    /// Match on the key alone, ignoring descendants.
    pub fn key_matches(&self, key: &str) -> bool {
        !self.is_active() || key.to_lowercase().contains(&self.needle)
    }
}

/// True when the node's key or any descendant's key contains the term.
pub fn matches(levels: &[Level], depth: usize, index: usize, term: &SearchTerm) -> bool {
    if !term.is_active() {
        return true;
    }

    let mut pending = vec![(depth, index)];
    while let Some((depth, index)) = pending.pop() {
        let Some(node) = levels.get(depth).and_then(|level| level.node(index)) else {
            continue;
        };
        if term.key_matches(node.key()) {
            return true;
        }
        pending.extend(node.children().iter().rev().map(|&child| (depth + 1, child)));
    }
    false
}

/// [`matches`] evaluated for every node of a group at once, bottom-up.
///
/// Each level is decided from the level below it, so a whole group costs one
/// pass over nodes and edges instead of one descent per node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTable {
    levels: Vec<Vec<bool>>,
}

impl MatchTable {
    pub fn compute(levels: &[Level], term: &SearchTerm) -> Self {
        let mut table: Vec<Vec<bool>> = vec![Vec::new(); levels.len()];
        for depth in (0..levels.len()).rev() {
            let below = table.get(depth + 1);
            let row: Vec<bool> = levels[depth]
                .nodes()
                .map(|node| {
                    term.key_matches(node.key())
                        || node.children().iter().any(|&child| {
                            below
                                .and_then(|flags| flags.get(child))
                                .copied()
                                .unwrap_or(false)
                        })
                })
                .collect();
            table[depth] = row;
        }
        Self { levels: table }
    }

    pub fn matches(&self, depth: usize, index: usize) -> bool {
        self.levels
            .get(depth)
            .and_then(|flags| flags.get(index))
            .copied()
            .unwrap_or(false)
    }

    pub fn any_root(&self) -> bool {
        self.levels.first().is_some_and(|roots| roots.iter().any(|&flag| flag))
    }
}

/// Expansion keys of every matching node that has children: the ancestors a
/// search has to open so each matching descendant becomes visible.
pub fn auto_expansion_keys(group: &FilterGroup, term: &SearchTerm) -> Vec<String> {
    if !term.is_active() {
        return Vec::new();
    }

    let table = MatchTable::compute(group.levels(), term);
    let table = &table;
    group
        .levels()
        .iter()
        .enumerate()
        .flat_map(move |(depth, level)| {
            level
                .nodes()
                .enumerate()
                .filter(move |(index, node)| node.has_children() && table.matches(depth, *index))
                .map(move |(_, node)| expansion_key(group.name(), depth, node.key()))
        })
        .collect()
}
