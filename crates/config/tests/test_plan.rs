//! Test plan for the `shelfmark-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, and environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use shelfmark_config::{load, AppConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "SHELFMARK_CONFIG",
    "SHELFMARK__AUTH__SESSION_TTL_SECONDS",
    "SHELFMARK__DATABASE__MAX_CONNECTIONS",
    "SHELFMARK__DATABASE__URL",
    "SHELFMARK__HTTP__ADDRESS",
    "SHELFMARK__HTTP__PORT",
    "SHELFMARK__MAIL__ENABLED",
    "SHELFMARK__MAIL__SMTP_HOST",
    "SHELFMARK__MAIL__SMTP_PORT",
    "SHELFMARK__MAIL__FROM_ADDRESS",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(path, contents).expect("failed to write config file");
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(
        config.database.max_connections,
        defaults.database.max_connections
    );
    assert_eq!(
        config.auth.session_ttl_seconds,
        defaults.auth.session_ttl_seconds
    );
    assert!(!config.mail.enabled);
    assert_eq!(config.mail.smtp_host, defaults.mail.smtp_host);
    assert_eq!(config.mail.from_address, defaults.mail.from_address);
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "shelfmark.toml",
        r#"
        [http]
        port = 4242
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/shelfmark.toml",
        r#"
        [http]
        port = 5151
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "shelfmark.toml",
        r#"
        [http]
        port = 8181

        [mail]
        enabled = true
        smtp_host = "mail.example.com"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.http.port, 8181);
    assert_eq!(config.http.address, defaults.http.address);
    assert!(config.mail.enabled);
    assert_eq!(config.mail.smtp_host, "mail.example.com");
    assert_eq!(config.mail.smtp_port, defaults.mail.smtp_port);
    assert_eq!(config.database.url, defaults.database.url);
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "shelfmark.toml",
        r#"
        [database]
        url = "sqlite://from-file.db"
        "#,
    );

    ctx.set_var("SHELFMARK__DATABASE__URL", "sqlite://from-env.db");
    ctx.set_var("SHELFMARK__HTTP__PORT", "9090");

    let config = load().expect("configuration load should succeed");

    assert_eq!(config.database.url, "sqlite://from-env.db");
    assert_eq!(config.http.port, 9090);
}

#[test]
#[serial]
fn load_honors_explicit_config_path() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [auth]
        session_ttl_seconds = 120
        "#,
    );

    let explicit = temp_dir.path().join("elsewhere/custom.toml");
    ctx.set_var("SHELFMARK_CONFIG", explicit.to_string_lossy());

    let config = load().expect("configuration load should succeed");
    assert_eq!(config.auth.session_ttl_seconds, 120);
}
