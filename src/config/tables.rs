use super::defaults;
use super::models::{AppConfig, LogLevel};
use serde::Deserialize;

/// On-disk layout: settings grouped into `[viewer]`, `[logging]` and `[paths]`.
#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    viewer: ViewerConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    paths: PathsConfig,
}

impl ConfigTables {
    /// True when the document uses at least one known table.
    pub(super) fn is_tabular(raw: &toml::Table) -> bool {
        ["viewer", "logging", "paths"]
            .iter()
            .any(|key| raw.get(*key).is_some_and(toml::Value::is_table))
    }
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            log_level: tables.logging.log_level,
            show_pagination: tables.viewer.show_pagination,
            fade_out_ms: tables.viewer.fade_out_ms,
            fade_in_ms: tables.viewer.fade_in_ms,
            keyboard_navigation: tables.viewer.keyboard_navigation,
            normalizer_path: tables.paths.normalizer_path,
            profile_dir: tables.paths.profile_dir,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            viewer: ViewerConfig {
                show_pagination: config.show_pagination,
                fade_out_ms: config.fade_out_ms,
                fade_in_ms: config.fade_in_ms,
                keyboard_navigation: config.keyboard_navigation,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            paths: PathsConfig {
                normalizer_path: config.normalizer_path.clone(),
                profile_dir: config.profile_dir.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ViewerConfig {
    #[serde(default = "defaults::default_show_pagination")]
    show_pagination: bool,
    #[serde(default = "defaults::default_fade_out_ms")]
    fade_out_ms: u64,
    #[serde(default = "defaults::default_fade_in_ms")]
    fade_in_ms: u64,
    #[serde(default = "defaults::default_keyboard_navigation")]
    keyboard_navigation: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            show_pagination: defaults::default_show_pagination(),
            fade_out_ms: defaults::default_fade_out_ms(),
            fade_in_ms: defaults::default_fade_in_ms(),
            keyboard_navigation: defaults::default_keyboard_navigation(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct PathsConfig {
    #[serde(default = "defaults::default_normalizer_path")]
    normalizer_path: String,
    #[serde(default = "defaults::default_profile_dir")]
    profile_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            normalizer_path: defaults::default_normalizer_path(),
            profile_dir: defaults::default_profile_dir(),
        }
    }
}
