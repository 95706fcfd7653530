use crate::dataset::load_dataset;
use crate::render::{Snapshot, TextView, render_json};
use crate::session_file::{load_session, save_session};
use anyhow::{Context, Result, anyhow};
use engine::{FilterStore, RecordingSink, RowIdentity, SelectionCommit, SessionState};
use shared::parse_expansion_key;
use std::path::{Path, PathBuf};

pub struct ShowOptions {
    pub dataset: PathBuf,
    pub session: Option<PathBuf>,
    pub search: Option<String>,
    /// `group|level|key` targets, applied in order.
    pub toggles: Vec<String>,
    /// Groups cleared after the toggles.
    pub clears: Vec<String>,
    pub json: bool,
}

/// Value addressed by a `group|level|key` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleTarget {
    pub group: String,
    pub level: usize,
    pub key: String,
}

impl ToggleTarget {
    pub fn parse(target: &str) -> Result<Self> {
        let (group, level, key) = parse_expansion_key(target)
            .ok_or_else(|| anyhow!("Invalid toggle target '{target}', expected GROUP|LEVEL|KEY"))?;
        Ok(Self {
            group: group.to_string(),
            level,
            key: key.to_string(),
        })
    }
}

pub fn run_show(options: ShowOptions) -> Result<String> {
    let mut store = open_store(&options.dataset, options.session.as_deref())?;

    let mut selection = SelectionCommit::Clear;
    for target in &options.toggles {
        let target = ToggleTarget::parse(target)?;
        selection = store
            .toggle(&target.group, target.level, &target.key)
            .with_context(|| format!("Failed to toggle '{}'", target.key))?;
    }
    for group in &options.clears {
        selection = store
            .clear_group(group)
            .with_context(|| format!("Failed to clear '{group}'"))?;
    }
    if let Some(term) = &options.search {
        store.set_search(term);
    }

    if let Some(path) = &options.session {
        save_session(path, store.session())?;
    }

    let groups = store.view();
    if options.json {
        render_json(&Snapshot {
            state: store.view_state(),
            report: store.report(),
            selection,
            groups: &groups,
        })
    } else {
        Ok(TextView {
            state: store.view_state(),
            groups: &groups,
        }
        .to_string())
    }
}

/// Flips one node's expansion flag and saves the session.
pub fn run_expand(dataset: &Path, session: &Path, group: &str, level: usize, key: &str) -> Result<String> {
    let mut store = open_store(dataset, Some(session))?;
    let expanded = store
        .toggle_expanded(group, level, key)
        .with_context(|| format!("Failed to expand '{key}'"))?;
    save_session(session, store.session())?;

    let state = if expanded { "expanded" } else { "folded" };
    Ok(format!("{}: {}", shared::expansion_key(group, level, key), state))
}

/// Flips a group's collapsed flag and saves the session.
pub fn run_collapse(dataset: &Path, session: &Path, group: &str) -> Result<String> {
    let mut store = open_store(dataset, Some(session))?;
    let collapsed = store
        .toggle_collapsed(group)
        .with_context(|| format!("Failed to collapse '{group}'"))?;
    save_session(session, store.session())?;

    let state = if collapsed { "collapsed" } else { "open" };
    Ok(format!("{group}: {state}"))
}

fn open_store(dataset: &Path, session: Option<&Path>) -> Result<FilterStore<RecordingSink>> {
    let data = load_dataset(dataset)?;
    let session = match session {
        Some(path) => load_session(path)?,
        None => SessionState::default(),
    };

    let mut store = FilterStore::with_session(session, RecordingSink::default());
    let report = store.rebuild(&data, &RowIdentity);
    if report.skipped_edges > 0 || report.reparented_nodes > 0 {
        log::info!(
            "{} skipped edges, {} reparented values",
            report.skipped_edges,
            report.reparented_nodes
        );
    }
    Ok(store)
}
