use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::fmt;

// ===== INPUT DATA TYPES =====

/// One raw cell as delivered by the host.
///
/// Untagged so that plain JSON/TOML scalars deserialize directly:
/// `true`, `42`, `1.5` and `"Apple"` are all valid cells.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(value) => write!(f, "{}", value),
            CellValue::Integer(value) => write!(f, "{}", value),
            // f64's Display already drops the fractional part of integral values ("3", not "3.0")
            CellValue::Float(value) => write!(f, "{}", value),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// A single source field: display name, optional lineage key and its column of cells.
///
/// Fields that share a lineage key belong to the same hierarchy.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FieldColumn {
    pub display_name: String,
    #[serde(default)]
    pub lineage: Option<String>,
    #[serde(default)]
    pub values: Vec<Option<CellValue>>,
}

impl FieldColumn {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            lineage: None,
            values: Vec::new(),
        }
    }

    pub fn lineage(mut self, lineage: impl Into<String>) -> Self {
        self.lineage = Some(lineage.into());
        self
    }

    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.values = values.into_iter().map(|value| Some(value.into())).collect();
        self
    }

    pub fn optional_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<CellValue>,
    {
        self.values = values.into_iter().map(|value| value.map(Into::into)).collect();
        self
    }

    pub fn cell(&self, row: usize) -> Option<&CellValue> {
        self.values.get(row).and_then(Option::as_ref)
    }
}

/// Ordered fields whose columns are aligned by row index.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    #[serde(default)]
    pub fields: Vec<FieldColumn>,
}

impl DataSet {
    pub fn new(fields: Vec<FieldColumn>) -> Self {
        Self { fields }
    }

    /// Number of rows, taken from the longest column.
    pub fn row_count(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.values.len())
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() || self.row_count() == 0
    }
}

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SlicerConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub session: SessionSection,
}

impl SlicerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

// AppSection carries the config format version so a session file written by an
// older build can be migrated or recreated instead of failing to load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    /// Current configuration format version
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    /// Check if this config version is supported
    pub fn is_supported_version(&self) -> bool {
        matches!(self.version.as_str(), "1.0.0")
    }

    /// Check if this config needs migration to current version
    pub fn needs_migration(&self) -> bool {
        self.version != Self::CURRENT_VERSION
    }

    /// Get migration path for unsupported versions
    pub fn get_migration_strategy(&self) -> MigrationStrategy {
        match self.version.as_str() {
            "1.0.0" => MigrationStrategy::None,
            // No upgrade paths exist yet. When CURRENT_VERSION moves to "1.1.0", add:
            // "1.0.0" => MigrationStrategy::Upgrade("1.0.0 -> 1.1.0".to_string()),
            _ => MigrationStrategy::Recreate,
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationStrategy {
    None,                    // No migration needed
    Upgrade(String),         // Automatic upgrade with description
    Recreate,                // Unknown version, create new config
}

/// Persisted filter chrome: per-group collapse flags and per-group expansion keys.
///
/// Only these two maps survive a data refresh; selection state never does.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SessionSection {
    #[serde(default)]
    pub collapsed_groups: BTreeMap<String, bool>,
    #[serde(default)]
    pub expanded_nodes: BTreeMap<String, Vec<String>>,
}

// ===== UTILITY FUNCTIONS =====

pub const EXPANSION_KEY_SEPARATOR: char = '|';

/// Structural key of one node: `group|level|key`.
pub fn expansion_key(group: &str, level: usize, key: &str) -> String {
    format!(
        "{group}{sep}{level}{sep}{key}",
        sep = EXPANSION_KEY_SEPARATOR
    )
}

/// Inverse of [`expansion_key`]. The value key may itself contain separators.
pub fn parse_expansion_key(expansion_key: &str) -> Option<(&str, usize, &str)> {
    let mut parts = expansion_key.splitn(3, EXPANSION_KEY_SEPARATOR);
    let group = parts.next()?;
    let level = parts.next()?.parse().ok()?;
    let key = parts.next()?;
    Some((group, level, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_deserialize_from_plain_json_scalars() {
        let json = r#"{
            "fields": [
                { "display_name": "Month", "lineage": "date", "values": ["Jan", null, 3, 2.5, true] }
            ]
        }"#;

        let data: DataSet = serde_json::from_str(json).unwrap();
        let field = &data.fields[0];

        assert_eq!(field.lineage.as_deref(), Some("date"));
        assert_eq!(field.values[0], Some(CellValue::Text("Jan".into())));
        assert_eq!(field.values[1], None);
        assert_eq!(field.values[2], Some(CellValue::Integer(3)));
        assert_eq!(field.values[3], Some(CellValue::Float(2.5)));
        assert_eq!(field.values[4], Some(CellValue::Bool(true)));
    }

    #[test]
    fn integral_floats_display_without_fraction() {
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
        assert_eq!(CellValue::Float(0.25).to_string(), "0.25");
        assert_eq!(CellValue::Integer(-7).to_string(), "-7");
    }

    #[test]
    fn row_count_follows_longest_column() {
        let data = DataSet::new(vec![
            FieldColumn::new("A").values(["x", "y"]),
            FieldColumn::new("B").values(["x", "y", "z"]),
        ]);

        assert_eq!(data.row_count(), 3);
        assert_eq!(data.fields[0].cell(2), None);
        assert!(!data.is_empty());
        assert!(DataSet::default().is_empty());
    }

    #[test]
    fn expansion_keys_round_trip_with_separator_in_value() {
        let key = expansion_key("Region", 1, "North|East");
        assert_eq!(key, "Region|1|North|East");
        assert_eq!(parse_expansion_key(&key), Some(("Region", 1, "North|East")));
        assert_eq!(parse_expansion_key("Region|x|North"), None);
        assert_eq!(parse_expansion_key("Region"), None);
    }

    #[test]
    fn unknown_config_version_is_recreated() {
        let app = AppSection { version: "0.3.0".to_string() };
        assert!(!app.is_supported_version());
        assert!(app.needs_migration());
        assert_eq!(app.get_migration_strategy(), MigrationStrategy::Recreate);
        assert_eq!(AppSection::default().get_migration_strategy(), MigrationStrategy::None);
    }

    #[test]
    fn session_config_survives_toml() {
        let mut config = SlicerConfig::default();
        config.session.collapsed_groups.insert("Product".into(), true);
        config
            .session
            .expanded_nodes
            .insert("Product".into(), vec![expansion_key("Product", 0, "Fruit")]);

        let text = config.to_toml_string().unwrap();
        let restored = SlicerConfig::from_toml_str(&text).unwrap();

        assert_eq!(restored, config);
    }

    #[test]
    fn empty_config_file_uses_defaults() {
        let config = SlicerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SlicerConfig::default());
    }
}
