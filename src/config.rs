//! File-based configuration.
//!
//! An [`ImportConfig`] is the serializable subset of [`ImportOptions`] plus the enumeration
//! catalogs. Every key is optional; missing keys take their defaults.
//!
//! ```toml
//! email_case = "lower"
//! duplicate_policy = "report"
//! alert_at_or_above = "error"
//!
//! [catalogs]
//! document_types = ["CC", "CE", "TI", "PP"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ImportResult;
use crate::observability::ImportSeverity;
use crate::pipeline::{DuplicatePolicy, EmailCase, ImportOptions};
use crate::schema::Catalogs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub catalogs: Catalogs,
    pub email_case: EmailCase,
    pub duplicate_policy: DuplicatePolicy,
    pub alert_at_or_above: ImportSeverity,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let options = ImportOptions::default();
        Self {
            catalogs: Catalogs::default(),
            email_case: options.email_case,
            duplicate_policy: options.duplicate_policy,
            alert_at_or_above: options.alert_at_or_above,
        }
    }
}

impl ImportConfig {
    /// Parse a TOML document. Catalog entries are trimmed and upper-cased.
    pub fn from_toml_str(input: &str) -> ImportResult<Self> {
        let mut config: Self = toml::from_str(input)?;
        config.catalogs = config.catalogs.canonicalized();
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> ImportResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Runtime options carrying this configuration. No observer is set.
    pub fn to_options(&self) -> ImportOptions {
        ImportOptions {
            email_case: self.email_case,
            duplicate_policy: self.duplicate_policy,
            alert_at_or_above: self.alert_at_or_above,
            ..Default::default()
        }
    }
}
