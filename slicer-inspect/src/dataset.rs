use anyhow::{Context, Result};
use shared::DataSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// `null` cells are blank.
    Json,
    /// TOML has no null: a blank cell can only come from a column shorter
    /// than the longest one.
    Toml,
}

impl DataFormat {
    /// `.toml` files are TOML, everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("toml") => DataFormat::Toml,
            _ => DataFormat::Json,
        }
    }
}

pub fn load_dataset(path: &Path) -> Result<DataSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

    parse_dataset(&content, DataFormat::from_path(path))
        .with_context(|| format!("Failed to parse dataset file: {}", path.display()))
}

pub fn parse_dataset(content: &str, format: DataFormat) -> Result<DataSet> {
    let dataset: DataSet = match format {
        DataFormat::Json => serde_json::from_str(content)?,
        DataFormat::Toml => toml::from_str(content)?,
    };
    Ok(dataset)
}
