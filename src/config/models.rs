use serde::Deserialize;
use std::time::Duration;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_show_pagination")]
    pub show_pagination: bool,
    #[serde(default = "crate::config::defaults::default_fade_out_ms")]
    pub fade_out_ms: u64,
    #[serde(default = "crate::config::defaults::default_fade_in_ms")]
    pub fade_in_ms: u64,
    #[serde(default = "crate::config::defaults::default_keyboard_navigation")]
    pub keyboard_navigation: bool,
    #[serde(default = "crate::config::defaults::default_normalizer_path")]
    pub normalizer_path: String,
    #[serde(default = "crate::config::defaults::default_profile_dir")]
    pub profile_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: crate::config::defaults::default_log_level(),
            show_pagination: crate::config::defaults::default_show_pagination(),
            fade_out_ms: crate::config::defaults::default_fade_out_ms(),
            fade_in_ms: crate::config::defaults::default_fade_in_ms(),
            keyboard_navigation: crate::config::defaults::default_keyboard_navigation(),
            normalizer_path: crate::config::defaults::default_normalizer_path(),
            profile_dir: crate::config::defaults::default_profile_dir(),
        }
    }
}

impl AppConfig {
    pub fn viewer_settings(&self) -> ViewerSettings {
        ViewerSettings {
            show_pagination: self.show_pagination,
            fade_out_ms: self.fade_out_ms,
            fade_in_ms: self.fade_in_ms,
            keyboard_navigation: self.keyboard_navigation,
        }
    }
}

/// Display options for one viewer instance.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
pub struct ViewerSettings {
    #[serde(default = "crate::config::defaults::default_show_pagination")]
    pub show_pagination: bool,
    #[serde(default = "crate::config::defaults::default_fade_out_ms")]
    pub fade_out_ms: u64,
    #[serde(default = "crate::config::defaults::default_fade_in_ms")]
    pub fade_in_ms: u64,
    #[serde(default = "crate::config::defaults::default_keyboard_navigation")]
    pub keyboard_navigation: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        AppConfig::default().viewer_settings()
    }
}

impl ViewerSettings {
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
