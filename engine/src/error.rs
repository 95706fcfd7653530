/// Result alias for fallible store operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Addressing errors raised when a caller names a group, level or value that
/// the current filter model does not contain.
///
/// Data anomalies (ragged rows, lookup misses while linking, stale parents)
/// are never reported here; they are absorbed and counted in
/// [`BuildReport`](crate::BuildReport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown filter group '{0}'")]
    UnknownGroup(String),
    #[error("filter group '{group}' has no level {level}")]
    UnknownLevel { group: String, level: usize },
    #[error("no value '{key}' at level {level} of filter group '{group}'")]
    UnknownValue {
        group: String,
        level: usize,
        key: String,
    },
}
