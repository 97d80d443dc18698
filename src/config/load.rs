use std::{env, path::PathBuf};

use super::schema::Settings;

impl Settings {
    /// Load settings from environment and optional config file.
    ///
    /// Environment variables (prefix `CADENZA__`) override the file, which
    /// overrides struct defaults.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Reject settings the player can't run with.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.audio.initial_volume) {
            return Err("audio.initial_volume must be within 0.0..=1.0".to_string());
        }
        if !(self.audio.volume_step > 0.0 && self.audio.volume_step <= 1.0) {
            return Err("audio.volume_step must be within (0.0, 1.0]".to_string());
        }
        if self.audio.load_timeout_ms == 0 {
            return Err("audio.load_timeout_ms must be >= 1".to_string());
        }
        if self.progress.tick_ms == 0 || self.progress.visualizer_tick_ms == 0 {
            return Err("progress tick intervals must be >= 1ms".to_string());
        }
        Ok(())
    }

    /// Render the settings as TOML, as accepted by `load`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("CADENZA_CONFIG_PATH")
        .map(PathBuf::from)
        .or_else(default_config_path)
}

fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        return Some(PathBuf::from(dir));
    }
    env::var_os("HOME").map(|home| {
        home_fallback
            .iter()
            .fold(PathBuf::from(home), |p, part| p.join(part))
    })
}

/// `$XDG_CONFIG_HOME/cadenza/config.toml`, or `~/.config/cadenza/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("cadenza").join("config.toml"))
}

/// `$XDG_STATE_HOME/cadenza/cadenza.log`, or `~/.local/state/cadenza/cadenza.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", &[".local", "state"]).map(|d| d.join("cadenza").join("cadenza.log"))
}
