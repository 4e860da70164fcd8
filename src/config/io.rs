use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            AppConfig::default()
        }
    }
}

/// Parse either the sectioned layout or a flat list of keys.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let raw: toml::Table = toml::from_str(contents).context("config is not valid TOML")?;
    if ConfigTables::is_tabular(&raw) {
        let tables: ConfigTables = toml::Value::Table(raw)
            .try_into()
            .context("config tables do not match the expected layout")?;
        Ok(tables.into())
    } else {
        toml::Value::Table(raw)
            .try_into()
            .context("flat config does not match the expected layout")
    }
}

/// Serialize configuration using the sectioned layout.
pub fn serialize_config(config: &AppConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("failed to serialize config")
}
