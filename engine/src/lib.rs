//! Filter model for a slicer panel: groups fields into hierarchies and
//! standalone filters, builds deduplicated value trees from tabular columns,
//! keeps tri-state selection consistent across levels and projects the result
//! for rendering.
//!
//! [`FilterStore`] is the entry point; everything else is reachable from it.

mod error;
pub mod grouping;
pub mod hierarchy;
pub mod host;
pub mod node;
pub mod normalize;
pub mod search;
mod selection;
pub mod session;
pub mod standalone;
mod store;
pub mod view;

#[cfg(test)]
mod proptests;

pub use error::{EngineError, Result};
pub use host::{
    IdentitySource, IdentityToken, NullSink, RecordingSink, RowIdentity, SelectionCommit,
    SelectionSink,
};
pub use node::{FilterGroup, GroupKind, Level, SelectionState, ValueNode};
pub use search::SearchTerm;
pub use session::SessionState;
pub use store::{BuildReport, FilterStore};
pub use view::{GroupView, ViewState, VisibleRow};
