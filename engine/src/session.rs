//! Filter chrome that outlives a rebuild: group collapse flags and node
//! expansion keys. Keys are structural (`group|level|key`), so they keep
//! pointing at the same value after the tree is rebuilt from fresh data.

use indexmap::{IndexMap, IndexSet};
use shared::{SessionSection, expansion_key};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    collapsed: IndexMap<String, bool>,
    expanded: IndexMap<String, IndexSet<String>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, group: &str) -> bool {
        self.collapsed.get(group).copied().unwrap_or(false)
    }

    pub fn set_collapsed(&mut self, group: &str, collapsed: bool) {
        self.collapsed.insert(group.to_string(), collapsed);
    }

    /// Returns the new collapsed flag.
    pub fn toggle_collapsed(&mut self, group: &str) -> bool {
        let collapsed = !self.is_collapsed(group);
        self.set_collapsed(group, collapsed);
        collapsed
    }

    pub fn is_expanded(&self, group: &str, level: usize, key: &str) -> bool {
        self.expanded
            .get(group)
            .is_some_and(|keys| keys.contains(&expansion_key(group, level, key)))
    }

    pub fn set_expanded(&mut self, group: &str, level: usize, key: &str, expanded: bool) {
        let node_key = expansion_key(group, level, key);
        if expanded {
            self.expanded
                .entry(group.to_string())
                .or_default()
                .insert(node_key);
        } else if let Some(keys) = self.expanded.get_mut(group) {
            keys.shift_remove(&node_key);
        }
    }

    /// Returns the new expansion flag.
    pub fn toggle_expanded(&mut self, group: &str, level: usize, key: &str) -> bool {
        let expanded = !self.is_expanded(group, level, key);
        self.set_expanded(group, level, key, expanded);
        expanded
    }

    /// Adds already formatted expansion keys (used by search auto-expansion).
    pub fn expand_keys<I>(&mut self, group: &str, keys: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.expanded
            .entry(group.to_string())
            .or_default()
            .extend(keys);
    }

    /// Drops every expansion key of the group.
    pub fn collapse_nodes(&mut self, group: &str) {
        if let Some(keys) = self.expanded.get_mut(group) {
            keys.clear();
        }
    }

    pub fn expanded_keys(&self, group: &str) -> impl Iterator<Item = &str> {
        self.expanded
            .get(group)
            .into_iter()
            .flat_map(|keys| keys.iter().map(String::as_str))
    }

    pub fn from_section(section: &SessionSection) -> Self {
        let collapsed = section
            .collapsed_groups
            .iter()
            .map(|(group, &flag)| (group.clone(), flag))
            .collect();
        let expanded = section
            .expanded_nodes
            .iter()
            .map(|(group, keys)| (group.clone(), keys.iter().cloned().collect()))
            .collect();
        Self { collapsed, expanded }
    }

    pub fn to_section(&self) -> SessionSection {
        SessionSection {
            collapsed_groups: self
                .collapsed
                .iter()
                .filter(|&(_, &flag)| flag)
                .map(|(group, &flag)| (group.clone(), flag))
                .collect(),
            expanded_nodes: self
                .expanded
                .iter()
                .filter(|(_, keys)| !keys.is_empty())
                .map(|(group, keys)| (group.clone(), keys.iter().cloned().collect()))
                .collect(),
        }
    }
}
