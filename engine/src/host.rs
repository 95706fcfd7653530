use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use shared::FieldColumn;
use std::fmt;

/// Opaque identity the host hands out for the first row a value occurred in.
///
/// Only equality matters: it is the membership key of the committed selection set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token minting implemented by the host data source.
///
/// Called at most once per distinct value, with the row of its first occurrence.
/// `field` is the column's position in the dataset; display names need not be unique.
pub trait IdentitySource {
    fn mint(&self, field: usize, column: &FieldColumn, row: usize) -> IdentityToken;
}

/// Deterministic tokens of the form `<field>:<display name>#<row>`, used by
/// tooling and tests that have no host to ask.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowIdentity;

impl IdentitySource for RowIdentity {
    fn mint(&self, field: usize, column: &FieldColumn, row: usize) -> IdentityToken {
        IdentityToken(format!("{}:{}#{}", field, column.display_name, row))
    }
}

/// What gets handed to the selection-commit collaborator after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "identities", rename_all = "snake_case")]
pub enum SelectionCommit {
    /// Replace the external selection with exactly these identities (never empty).
    Apply(IndexSet<IdentityToken>),
    /// Nothing is selected anywhere.
    Clear,
}

impl SelectionCommit {
    pub fn from_identities(identities: IndexSet<IdentityToken>) -> Self {
        if identities.is_empty() {
            SelectionCommit::Clear
        } else {
            SelectionCommit::Apply(identities)
        }
    }

    pub fn identities(&self) -> Option<&IndexSet<IdentityToken>> {
        match self {
            SelectionCommit::Apply(identities) => Some(identities),
            SelectionCommit::Clear => None,
        }
    }

    pub fn len(&self) -> usize {
        self.identities().map_or(0, IndexSet::len)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, SelectionCommit::Clear)
    }
}

/// Selection-commit collaborator. Delivery failures are the sink's own concern.
pub trait SelectionSink {
    fn commit(&mut self, commit: &SelectionCommit);
}

/// Sink for callers that only read the model back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SelectionSink for NullSink {
    fn commit(&mut self, commit: &SelectionCommit) {
        log::debug!("selection commit dropped ({} identities)", commit.len());
    }
}

/// Keeps every commit in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commits: Vec<SelectionCommit>,
}

impl RecordingSink {
    pub fn commits(&self) -> &[SelectionCommit] {
        &self.commits
    }

    pub fn last(&self) -> Option<&SelectionCommit> {
        self.commits.last()
    }
}

impl SelectionSink for RecordingSink {
    fn commit(&mut self, commit: &SelectionCommit) {
        self.commits.push(commit.clone());
    }
}
