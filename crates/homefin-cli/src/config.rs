//! CLI configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Settings read from `hfc.toml`, `$HFC_CONFIG` and `HFC__*` variables.
/// Command-line flags take precedence over all of them.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Output format when `--output` is not given.
    #[serde(default)]
    pub output: Option<OutputFormat>,
    /// File that holds saved scenarios.
    #[serde(default = "default_scenario_store")]
    pub scenario_store: PathBuf,
    /// State code whose tax and insurance defaults fill in missing mortgage inputs.
    #[serde(default)]
    pub region: Option<String>,
}

fn default_scenario_store() -> PathBuf {
    PathBuf::from("hfc-scenarios.json")
}

impl CliConfig {
    /// Loads configuration from the working directory, `$HFC_CONFIG` and
    /// the environment, in increasing order of precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is malformed or `$HFC_CONFIG`
    /// names a missing file.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(std::env::var_os("HFC_CONFIG").map(PathBuf::from).as_deref())
    }

    /// Same layering as [`CliConfig::load`] with `explicit` in place of
    /// `$HFC_CONFIG`.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("hfc").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("HFC").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_file_sets_output_and_region() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hfc-test.toml");
        fs::write(&path, "output = \"table\"\nregion = \"TX\"\n").unwrap();

        let config = CliConfig::load_from(Some(&path)).unwrap();
        assert!(matches!(config.output, Some(OutputFormat::Table)));
        assert_eq!(config.region.as_deref(), Some("TX"));
        assert_eq!(config.scenario_store, PathBuf::from("hfc-scenarios.json"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(CliConfig::load_from(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
