//! The filter store: owns the rebuildable groups, the session chrome that
//! survives rebuilds, the active search term and the selection sink.

use crate::error::{EngineError, Result};
use crate::grouping::group_fields;
use crate::hierarchy::build_hierarchy;
use crate::host::{IdentitySource, IdentityToken, NullSink, SelectionCommit, SelectionSink};
use crate::node::{FilterGroup, GroupKind, Level};
use crate::search::{SearchTerm, auto_expansion_keys};
use crate::selection;
use crate::session::SessionState;
use crate::standalone::build_standalone;
use crate::view::{self, GroupView, ViewState};
use indexmap::IndexSet;
use serde::Serialize;
use shared::{DataSet, FieldColumn, expansion_key};

/// Counters gathered by one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub rows: usize,
    pub groups: usize,
    pub hierarchies: usize,
    pub standalone: usize,
    pub nodes: usize,
    /// Links dropped because the parent or child key was missing from its level.
    pub skipped_edges: usize,
    /// Links that moved a shared child to a different parent.
    pub reparented_nodes: usize,
    /// Fields with fewer values than the dataset has rows.
    pub ragged_fields: usize,
}

pub struct FilterStore<S: SelectionSink = NullSink> {
    groups: Vec<FilterGroup>,
    session: SessionState,
    search: SearchTerm,
    report: BuildReport,
    sink: S,
}

impl Default for FilterStore<NullSink> {
    fn default() -> Self {
        Self::new(NullSink)
    }
}

impl<S: SelectionSink> FilterStore<S> {
    pub fn new(sink: S) -> Self {
        Self::with_session(SessionState::default(), sink)
    }

    /// Starts from restored session chrome (collapse flags, expansion keys).
    pub fn with_session(session: SessionState, sink: S) -> Self {
        Self {
            groups: Vec::new(),
            session,
            search: SearchTerm::default(),
            report: BuildReport::default(),
            sink,
        }
    }

    /// Replaces every group with ones built from `data`.
    ///
    /// Selection starts empty; session chrome is kept and the active search
    /// term re-applies its auto-expansion to the new groups.
    pub fn rebuild(&mut self, data: &DataSet, identities: &dyn IdentitySource) -> &BuildReport {
        let row_count = data.row_count();
        let mut report = BuildReport {
            rows: row_count,
            ragged_fields: data
                .fields
                .iter()
                .filter(|field| field.values.len() < row_count)
                .count(),
            ..BuildReport::default()
        };

        self.groups.clear();
        for plan in group_fields(&data.fields) {
            let levels = match plan.kind {
                GroupKind::Hierarchy => {
                    let columns: Vec<(usize, &FieldColumn)> = plan
                        .fields
                        .iter()
                        .map(|&field| (field, &data.fields[field]))
                        .collect();
                    let (levels, stats) = build_hierarchy(&columns, row_count, identities);
                    report.hierarchies += 1;
                    report.skipped_edges += stats.skipped_edges;
                    report.reparented_nodes += stats.reparented_nodes;
                    levels
                }
                GroupKind::Standalone => {
                    report.standalone += 1;
                    plan.fields
                        .first()
                        .map(|&field| {
                            build_standalone(field, &data.fields[field], row_count, identities)
                        })
                        .into_iter()
                        .collect()
                }
            };
            let group = FilterGroup::new(plan.name, plan.order, plan.kind, levels);
            report.nodes += group.node_count();
            self.groups.push(group);
        }
        report.groups = self.groups.len();

        log::info!(
            "rebuilt {} filter groups ({} hierarchies, {} standalone, {} values) from {} rows",
            report.groups,
            report.hierarchies,
            report.standalone,
            report.nodes,
            report.rows
        );

        self.report = report;
        self.apply_auto_expansion();
        &self.report
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&FilterGroup> {
        self.groups.iter().find(|group| group.name() == name)
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn search(&self) -> &SearchTerm {
        &self.search
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Flips one value and commits the resulting selection across all groups.
    pub fn toggle(&mut self, group: &str, level: usize, key: &str) -> Result<SelectionCommit> {
        let (position, index) = self.locate(group, level, key)?;
        if let Some(state) = selection::toggle(self.groups[position].levels_mut(), level, index) {
            log::debug!("toggled '{}' at level {} of '{}' -> {:?}", key, level, group, state);
        }
        Ok(self.commit())
    }

    /// Deselects every value of one group and commits what the others still select.
    pub fn clear_group(&mut self, group: &str) -> Result<SelectionCommit> {
        let position = self.position(group)?;
        selection::clear(self.groups[position].levels_mut());
        log::debug!("cleared filter group '{}'", group);
        Ok(self.commit())
    }

    pub fn clear_all(&mut self) -> SelectionCommit {
        for group in &mut self.groups {
            selection::clear(group.levels_mut());
        }
        log::debug!("cleared all {} filter groups", self.groups.len());
        self.commit()
    }

    /// Identities of every selected value, group by group in group order.
    pub fn selected_identities(&self) -> IndexSet<IdentityToken> {
        let mut identities = IndexSet::new();
        for group in &self.groups {
            selection::collect_selected(group.levels(), &mut identities);
        }
        identities
    }

    pub fn selected_count(&self, group: &str) -> Result<usize> {
        Ok(self.groups[self.position(group)?].selected_count())
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = SearchTerm::new(term);
        log::debug!("search term set to '{}'", self.search.as_str());
        self.apply_auto_expansion();
    }

    /// Drops the term. Nodes opened by the search stay expanded.
    pub fn clear_search(&mut self) {
        self.search = SearchTerm::default();
    }

    /// Returns the new collapsed flag.
    pub fn toggle_collapsed(&mut self, group: &str) -> Result<bool> {
        self.position(group)?;
        Ok(self.session.toggle_collapsed(group))
    }

    pub fn set_collapsed(&mut self, group: &str, collapsed: bool) -> Result<()> {
        self.position(group)?;
        self.session.set_collapsed(group, collapsed);
        Ok(())
    }

    /// Returns the new expansion flag.
    pub fn toggle_expanded(&mut self, group: &str, level: usize, key: &str) -> Result<bool> {
        self.locate(group, level, key)?;
        Ok(self.session.toggle_expanded(group, level, key))
    }

    /// Expands every node of the group that has children; returns how many.
    pub fn expand_all(&mut self, group: &str) -> Result<usize> {
        let position = self.position(group)?;
        let keys: Vec<String> = self.groups[position]
            .levels()
            .iter()
            .enumerate()
            .flat_map(|(depth, level)| {
                level
                    .nodes()
                    .filter(|node| node.has_children())
                    .map(move |node| expansion_key(group, depth, node.key()))
            })
            .collect();
        let count = keys.len();
        self.session.expand_keys(group, keys);
        Ok(count)
    }

    pub fn collapse_all(&mut self, group: &str) -> Result<()> {
        self.position(group)?;
        self.session.collapse_nodes(group);
        Ok(())
    }

    pub fn view(&self) -> Vec<GroupView> {
        view::project(&self.groups, &self.session, &self.search)
    }

    pub fn view_state(&self) -> ViewState {
        view::view_state(&self.groups, &self.search)
    }

    fn commit(&mut self) -> SelectionCommit {
        let commit = SelectionCommit::from_identities(self.selected_identities());
        self.sink.commit(&commit);
        commit
    }

    fn apply_auto_expansion(&mut self) {
        if !self.search.is_active() {
            return;
        }
        for group in &self.groups {
            let keys = auto_expansion_keys(group, &self.search);
            if !keys.is_empty() {
                self.session.expand_keys(group.name(), keys);
            }
        }
    }

    fn position(&self, group: &str) -> Result<usize> {
        self.groups
            .iter()
            .position(|candidate| candidate.name() == group)
            .ok_or_else(|| EngineError::UnknownGroup(group.to_string()))
    }

    fn locate(&self, group: &str, level: usize, key: &str) -> Result<(usize, usize)> {
        let position = self.position(group)?;
        let found: &Level = self.groups[position]
            .level(level)
            .ok_or_else(|| EngineError::UnknownLevel {
                group: group.to_string(),
                level,
            })?;
        let index = found.index_of(key).ok_or_else(|| EngineError::UnknownValue {
            group: group.to_string(),
            level,
            key: key.to_string(),
        })?;
        Ok((position, index))
    }
}
