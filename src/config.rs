use chrono::format::{Item, StrftimeItems};
use eyre::Context;

/// Capacity of each sink collection unless configured otherwise.
pub const DEFAULT_MAX_SINKS: usize = 8;

pub const DEFAULT_CONSOLE_TIME_FORMAT: &str = "%H:%M:%S";
pub const DEFAULT_FILE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct Config {
    pub enabled: bool,
    pub console_time_format: String,
    pub file_time_format: String,
    pub use_ansi: bool,
    pub max_sinks: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            enabled: true,
            console_time_format: DEFAULT_CONSOLE_TIME_FORMAT.to_string(),
            file_time_format: DEFAULT_FILE_TIME_FORMAT.to_string(),
            use_ansi: false,
            max_sinks: DEFAULT_MAX_SINKS,
        }
    }

    /// Defaults overridden by `CORELOG_*` environment variables and `NO_COLOR`.
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(value) = lookup("CORELOG_ENABLED") {
            config.enabled = parse_flag("CORELOG_ENABLED", &value)?;
        }

        if let Some(value) = lookup("CORELOG_ANSI") {
            config.use_ansi = parse_flag("CORELOG_ANSI", &value)?;
        }

        // https://no-color.org: any non-empty value disables colour.
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.use_ansi = false;
        }

        if let Some(value) = lookup("CORELOG_MAX_SINKS") {
            config.max_sinks = value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("CORELOG_MAX_SINKS is not a valid count: {}", value))?;
        }

        Ok(config)
    }

    /// Fails if either time format is not a valid strftime string.
    pub fn validate(&self) -> eyre::Result<()> {
        for (field, format) in [
            ("console_time_format", &self.console_time_format),
            ("file_time_format", &self.file_time_format),
        ] {
            if !is_valid_time_format(format) {
                return Err(eyre::eyre!("{} is not a valid time format: '{}'", field, format));
            }
        }

        Ok(())
    }

    /// Replaces invalid time formats with their defaults.
    pub(crate) fn with_valid_time_formats(mut self) -> Self {
        if !is_valid_time_format(&self.console_time_format) {
            self.console_time_format = DEFAULT_CONSOLE_TIME_FORMAT.to_string();
        }
        if !is_valid_time_format(&self.file_time_format) {
            self.file_time_format = DEFAULT_FILE_TIME_FORMAT.to_string();
        }
        self
    }
}

pub(crate) fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(key: &str, value: &str) -> eyre::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(eyre::eyre!("{} must be a boolean, got '{}'", key, value)),
    }
}
