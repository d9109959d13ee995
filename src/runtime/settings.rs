use crate::config;

/// Load and validate settings, falling back to defaults.
///
/// Runs before logging is up, so problems go to stderr.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(e) = s.validate() {
                eprintln!("sonicflow: {e}, using defaults");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("sonicflow: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
