//! # Ledger Configuration
//!
//! Optional YAML file read at startup; every key may be omitted.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_directory: "/home/me/Documents/Chore Ledger"
//! ledger_file_name: "ledger.json"
//! enforce_family_exists: true
//! ```
//!
//! ## Environment Overrides
//!
//! - `CHORE_LEDGER_DATA_DIR`
//! - `CHORE_LEDGER_FILE`
//! - `CHORE_LEDGER_ENFORCE_FAMILY` (`true` / `false`)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::transactions::FamilyPolicy;

pub const DATA_DIR_ENV: &str = "CHORE_LEDGER_DATA_DIR";
pub const LEDGER_FILE_ENV: &str = "CHORE_LEDGER_FILE";
pub const ENFORCE_FAMILY_ENV: &str = "CHORE_LEDGER_ENFORCE_FAMILY";

const DEFAULT_LEDGER_FILE: &str = "ledger.json";
const DEFAULT_DIRECTORY_NAME: &str = "Chore Ledger";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub data_directory: PathBuf,
    pub ledger_file_name: String,
    /// Reject children whose family has no registered parent
    pub enforce_family_exists: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            ledger_file_name: DEFAULT_LEDGER_FILE.to_string(),
            enforce_family_exists: true,
        }
    }
}

impl LedgerConfig {
    /// Read `path` if it exists, otherwise start from defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: LedgerConfig =
            serde_yaml::from_str(&yaml_content).with_context(|| format!("Invalid config file {:?}", path))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_directory = PathBuf::from(dir);
        }
        if let Some(file) = lookup(LEDGER_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            self.ledger_file_name = file;
        }
        if let Some(flag) = lookup(ENFORCE_FAMILY_ENV) {
            self.enforce_family_exists = match flag.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => bail!("{} must be true or false, got '{}'", ENFORCE_FAMILY_ENV, other),
            };
        }
        Ok(self)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_directory.join(&self.ledger_file_name)
    }

    pub fn family_policy(&self) -> FamilyPolicy {
        if self.enforce_family_exists {
            FamilyPolicy::RequireExisting
        } else {
            FamilyPolicy::AcceptAny
        }
    }
}

/// `~/Documents/Chore Ledger`, or the working directory when there is no
/// documents directory
fn default_data_directory() -> PathBuf {
    match dirs::document_dir() {
        Some(documents) => documents.join(DEFAULT_DIRECTORY_NAME),
        None => PathBuf::from(DEFAULT_DIRECTORY_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = LedgerConfig::load(temp_dir.path().join("missing.yaml")).unwrap();

        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.ledger_file_name, "ledger.json");
        assert!(config.data_directory.ends_with("Chore Ledger"));
        assert_eq!(config.family_policy(), FamilyPolicy::RequireExisting);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger_config.yaml");
        fs::write(&path, "data_directory: /srv/chores\nenforce_family_exists: false\n").unwrap();

        let config = LedgerConfig::load(&path).unwrap();
        assert_eq!(config.ledger_path(), PathBuf::from("/srv/chores/ledger.json"));
        assert_eq!(config.family_policy(), FamilyPolicy::AcceptAny);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger_config.yaml");
        fs::write(&path, "enforce_family_exists: [not, a, bool]\n").unwrap();

        assert!(LedgerConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = LedgerConfig::default()
            .apply_overrides(lookup(&[
                (DATA_DIR_ENV, "/var/lib/chores"),
                (LEDGER_FILE_ENV, "household.json"),
                (ENFORCE_FAMILY_ENV, "FALSE"),
            ]))
            .unwrap();

        assert_eq!(config.ledger_path(), PathBuf::from("/var/lib/chores/household.json"));
        assert!(!config.enforce_family_exists);
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let config = LedgerConfig::default()
            .apply_overrides(lookup(&[(DATA_DIR_ENV, "  "), (LEDGER_FILE_ENV, "")]))
            .unwrap();

        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_bad_enforce_flag_is_rejected() {
        let result = LedgerConfig::default().apply_overrides(lookup(&[(ENFORCE_FAMILY_ENV, "maybe")]));
        assert!(result.is_err());
    }
}
