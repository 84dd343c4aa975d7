use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Widest accepted indentation step.
pub const MAX_INDENT_WIDTH: usize = 16;

/// Configuration for the diff engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Field used to pair array elements across snapshots.
    pub identity_key: String,
    /// Per-field overrides of `identity_key`, keyed by change-record field name.
    pub identity_keys: BTreeMap<String, String>,
    /// Spaces per nesting level in rendered output.
    pub indent_width: usize,
    /// When `true`, differing scalars and type mismatches are marked as
    /// wholly removed/added instead of shown plain.
    pub highlight_replaced_values: bool,
    /// Prefix of every card title.
    pub field_label: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            identity_key: "attachmentContentId".into(),
            identity_keys: BTreeMap::new(),
            indent_width: 5,
            highlight_replaced_values: false,
            field_label: "Field Name".into(),
        }
    }
}

impl DiffConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> DiffResult<()> {
        if self.indent_width > MAX_INDENT_WIDTH {
            return Err(DiffError::Config(format!(
                "indent_width {} exceeds the maximum of {}",
                self.indent_width, MAX_INDENT_WIDTH
            )));
        }
        if self.identity_key.is_empty() {
            return Err(DiffError::Config("identity_key must not be empty".into()));
        }
        Ok(())
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> DiffResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DiffError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The identity key to use for arrays under the given field.
    pub fn identity_key_for(&self, field_name: &str) -> &str {
        self.identity_keys
            .get(field_name)
            .map(String::as_str)
            .unwrap_or(self.identity_key.as_str())
    }

    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = DiffConfig::default();
        assert_eq!(c.identity_key, "attachmentContentId");
        assert_eq!(c.indent_width, 5);
        assert!(!c.highlight_replaced_values);
        assert_eq!(c.field_label, "Field Name");
        assert!(c.identity_keys.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = DiffConfig::from_toml_str("indent_width = 2\n").unwrap();
        assert_eq!(c.indent_width, 2);
        assert_eq!(c.identity_key, "attachmentContentId");
    }

    #[test]
    fn per_field_identity_keys() {
        let c = DiffConfig::from_toml_str(
            r#"
identity_key = "id"

[identity_keys]
releaseIdToUsage = "releaseId"
"#,
        )
        .unwrap();
        assert_eq!(c.identity_key_for("releaseIdToUsage"), "releaseId");
        assert_eq!(c.identity_key_for("attachments"), "id");
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = DiffConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, DiffError::Config(_)));
    }

    #[test]
    fn oversized_indent_rejected() {
        let err = DiffConfig::from_toml_str("indent_width = 9223372036854775807").unwrap_err();
        assert!(matches!(err, DiffError::Config(ref msg) if msg.contains("indent_width")));

        let c = DiffConfig::from_toml_str(&format!("indent_width = {MAX_INDENT_WIDTH}")).unwrap();
        assert_eq!(c.indent_width, MAX_INDENT_WIDTH);
        assert!(DiffConfig::from_toml_str("indent_width = 17").is_err());
    }

    #[test]
    fn empty_identity_key_rejected() {
        assert!(matches!(
            DiffConfig::from_toml_str("identity_key = \"\"").unwrap_err(),
            DiffError::Config(_)
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "highlight_replaced_values = true").unwrap();
        writeln!(file, "field_label = \"Feld\"").unwrap();

        let c = DiffConfig::from_toml_file(file.path()).unwrap();
        assert!(c.highlight_replaced_values);
        assert_eq!(c.field_label, "Feld");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiffConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, DiffError::Io { .. }));
    }

    #[test]
    fn builders() {
        let c = DiffConfig::default().with_identity_key("id").with_indent_width(2);
        assert_eq!(c.identity_key, "id");
        assert_eq!(c.indent_width, 2);
    }
}
