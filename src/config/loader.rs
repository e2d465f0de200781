// src/config/loader.rs
//! Layered TOML configuration loader
//!
//! Defaults are serialized first, then every configured file is merged on top in
//! order, then `SYNERGY__SECTION__KEY` environment variables are applied.

use crate::config::SynergyConfig;
use crate::error::{SynergyError, SynergyResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides (`SYNERGY__SEARCH__MAX_COMPONENTS=6`)
pub const ENV_PREFIX: &str = "SYNERGY__";

/// Configuration loader merging defaults, files and environment overrides
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
}

impl ConfigLoader {
    /// Loader with no files; yields defaults plus environment overrides
    pub fn new() -> Self {
        Self {
            config_paths: Vec::new(),
            use_environment: true,
        }
    }

    /// Create loader with custom paths, later files overriding earlier ones
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: true,
        }
    }

    /// Ignore `SYNERGY__*` environment variables
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// Load, merge and validate the configuration
    pub fn load(&self) -> SynergyResult<SynergyConfig> {
        let mut merged = toml::Value::try_from(SynergyConfig::default())
            .map_err(|e| SynergyError::configuration("config_loader", "serialize_defaults", e.to_string()))?;

        for path in &self.config_paths {
            let overlay = Self::load_config_file(path)?;
            debug!(path = %path.display(), "merging configuration file");
            merge_toml_values(&mut merged, overlay);
        }

        if self.use_environment {
            apply_environment_overrides(&mut merged, std::env::vars());
        }

        let config: SynergyConfig = merged.try_into().map_err(|e: toml::de::Error| {
            SynergyError::configuration("config_loader", "deserialize", e.to_string())
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Export a configuration as pretty TOML
    pub fn export_config<P: AsRef<Path>>(config: &SynergyConfig, path: P) -> SynergyResult<()> {
        let content = Self::to_toml(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(config: &SynergyConfig) -> SynergyResult<String> {
        toml::to_string_pretty(config)
            .map_err(|e| SynergyError::configuration("config_loader", "export", e.to_string()))
    }

    fn load_config_file(path: &Path) -> SynergyResult<toml::Value> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e: toml::de::Error| SynergyError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively overlay tables; non-table values replace
fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_environment_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(stripped) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<String> = stripped.split("__").map(|part| part.to_lowercase()).collect();
        if path.iter().any(|part| part.is_empty()) {
            continue;
        }
        debug!(variable = %key, "applying environment override");
        set_nested_value(config, &path, parse_env_value(&value));
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_nested_value(config: &mut toml::Value, path: &[String], value: toml::Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = config;
    for part in parents {
        let toml::Value::Table(table) = current else {
            return;
        };
        current = table
            .entry(part.clone())
            .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
    }

    if let toml::Value::Table(table) = current {
        // Integers given for float fields would otherwise fail to deserialize
        let value = match (table.get(last), value) {
            (Some(toml::Value::Float(_)), toml::Value::Integer(i)) => toml::Value::Float(i as f64),
            (_, value) => value,
        };
        table.insert(last.clone(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_default_config() {
        let config = ConfigLoader::new().without_environment().load().unwrap();
        assert_eq!(config, SynergyConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[filter]
bandpass_high_hz = 400.0

[search]
max_components = 5
        "#
        )
        .unwrap();

        let config = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()])
            .without_environment()
            .load()
            .unwrap();

        assert_eq!(config.filter.bandpass_high_hz, 400.0);
        assert_eq!(config.filter.bandpass_low_hz, 20.0);
        assert_eq!(config.search.max_components, 5);
    }

    #[test]
    fn test_later_files_win() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "[redundancy]\ncorrelation_threshold = 0.8").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "[redundancy]\ncorrelation_threshold = 0.95").unwrap();

        let config = ConfigLoader::with_paths(vec![first.path().into(), second.path().into()])
            .without_environment()
            .load()
            .unwrap();

        assert_eq!(config.redundancy.correlation_threshold, 0.95);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[search]\nmax_components = 0").unwrap();

        let result = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()])
            .without_environment()
            .load();

        assert!(matches!(result, Err(SynergyError::Configuration { .. })));
    }

    #[test]
    fn test_malformed_toml_reports_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[search\nmax_components = ").unwrap();

        match ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()]).load() {
            Err(SynergyError::ConfigParse { path, .. }) => assert_eq!(path, temp_file.path()),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_override_parsing() {
        let mut value = toml::Value::try_from(SynergyConfig::default()).unwrap();
        apply_environment_overrides(
            &mut value,
            vec![
                ("SYNERGY__SEARCH__MAX_COMPONENTS".to_string(), "6".to_string()),
                ("SYNERGY__FILTER__ENVELOPE_CUTOFF_HZ".to_string(), "10".to_string()),
                ("UNRELATED".to_string(), "1".to_string()),
            ],
        );

        let config: SynergyConfig = value.try_into().unwrap();
        assert_eq!(config.search.max_components, 6);
        assert_eq!(config.filter.envelope_cutoff_hz, 10.0);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        std::env::set_var("SYNERGY__QUALITY__CRITICAL_NOISE_UV", "20.5");

        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.quality.critical_noise_uv, 20.5);

        std::env::remove_var("SYNERGY__QUALITY__CRITICAL_NOISE_UV");
    }

    #[test]
    fn test_config_export() {
        let temp_file = NamedTempFile::new().unwrap();
        ConfigLoader::export_config(&SynergyConfig::default(), temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("[search]"));
        assert!(content.contains("[[channel_map]]"));
    }
}
