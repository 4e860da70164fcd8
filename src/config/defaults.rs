pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_show_pagination() -> bool {
    true
}

pub(crate) fn default_fade_out_ms() -> u64 {
    300
}

pub(crate) fn default_fade_in_ms() -> u64 {
    300
}

pub(crate) fn default_keyboard_navigation() -> bool {
    true
}

pub(crate) fn default_normalizer_path() -> String {
    crate::normalizer::DEFAULT_NORMALIZER_PATH.to_string()
}

pub(crate) fn default_profile_dir() -> String {
    "conf/profiles".to_string()
}
