use crate::config;

/// Load settings, falling back to defaults when the file is unreadable or
/// fails validation. Runs before logging exists, so it reports on stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => s,
            Err(msg) => {
                eprintln!("cadenza: invalid config, using defaults: {msg}");
                config::Settings::default()
            }
        },
        Err(e) => {
            eprintln!("cadenza: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
