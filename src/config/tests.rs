use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_explicit_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SONICFLOW_CONFIG_PATH", "/tmp/sonicflow-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/sonicflow-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("sonicflow")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("sonicflow")
            .join("config.toml")
    );
}

#[test]
fn defaults_cover_every_supported_extension() {
    let s = Settings::default();
    assert_eq!(
        s.library.extensions,
        vec!["mp3", "wav", "ogg", "flac", "m4a", "aac", "webm"]
    );
    assert!(matches!(s.playback.repeat, RepeatSetting::None));
    assert!(!s.playback.shuffle);
    assert_eq!(s.audio.initial_volume, 1.0);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_repeat_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = "repeat-one"

[audio]
initial_volume = 0.25

[controls]
scrub_seconds = 9
volume_step = 0.05

[ui]
header_text = "hello"

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3

[enrichment]
workers = 4
max_art_bytes = 1024

[logging]
level = "debug"
file = "/tmp/sonicflow-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SONICFLOW_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SONICFLOW__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(matches!(s.playback.repeat, RepeatSetting::One));
    assert_eq!(s.audio.initial_volume, 0.25);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.05);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.enrichment.workers, 4);
    assert_eq!(s.enrichment.max_art_bytes, 1024);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/sonicflow-test.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 10
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SONICFLOW_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SONICFLOW__CONTROLS__SCRUB_SECONDS", "2");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 2);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.enrichment.workers = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" ".to_string()];
    assert!(s.validate().is_err());
}
