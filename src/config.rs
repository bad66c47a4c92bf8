//! Suite configuration.
//!
//! Configuration values can be constructed from defaults or loaded from
//! environment variables (with optional `.env` support). Every knob has a
//! fixed fallback so the suite runs against the public site with no setup
//! beyond a Chrome binary.

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

use crate::wait::WaitSettings;

/// Default base URL of the site under test.
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// A username/password tuple used to attempt authentication.
///
/// Two instances exist for the lifetime of the process: a pair the site
/// accepts and a pair it rejects. Both are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub username: String,
    pub password: String,
}

impl CredentialPair {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Verbosity level for suite logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Minimal,
    Medium,
    Detailed,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Medium
    }
}

impl Verbosity {
    pub fn as_u8(self) -> u8 {
        match self {
            Verbosity::Minimal => 0,
            Verbosity::Medium => 1,
            Verbosity::Detailed => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Verbosity::Minimal),
            1 => Some(Verbosity::Medium),
            2 => Some(Verbosity::Detailed),
            _ => None,
        }
    }
}

/// Configuration values for the suite.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Root URL of the storefront; every scenario starts here.
    pub base_url: String,
    /// Credentials the site accepts.
    pub valid: CredentialPair,
    /// Credentials the site rejects.
    pub invalid: CredentialPair,
    /// Explicit Chrome/Chromium executable; system lookup when unset.
    pub chrome_executable: Option<PathBuf>,
    /// Attach to an already-running browser over CDP instead of launching.
    pub cdp_url: Option<String>,
    /// Persistent profile directory; a throwaway one when unset.
    pub user_data_dir: Option<PathBuf>,
    pub headless: bool,
    /// Upper bound for every bounded-wait expectation.
    pub wait_timeout_ms: u64,
    /// Interval between expectation probes.
    pub poll_interval_ms: u64,
    pub verbose: Verbosity,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        SuiteConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            valid: CredentialPair::new("standard_user", "secret_sauce"),
            invalid: CredentialPair::new("standard_user", "secret_sauc"),
            chrome_executable: None,
            cdp_url: None,
            user_data_dir: None,
            headless: true,
            wait_timeout_ms: 4_000,
            poll_interval_ms: 100,
            verbose: Verbosity::default(),
        }
    }
}

impl SuiteConfig {
    /// Construct a configuration by reading relevant environment variables,
    /// after loading a `.env` file if present.
    pub fn from_env() -> Result<Self, SuiteConfigError> {
        let _ = dotenv();
        let mut config = SuiteConfig::default();

        if let Some(value) = env_var("SAUCEDEMO_BASE_URL") {
            config.base_url = value;
        }
        if let Some(value) = env_var("SAUCEDEMO_USERNAME") {
            config.valid.username = value;
        }
        if let Some(value) = env_var("SAUCEDEMO_PASSWORD") {
            config.valid.password = value;
        }
        if let Some(value) = env_var("SAUCEDEMO_BAD_USERNAME") {
            config.invalid.username = value;
        }
        if let Some(value) = env_var("SAUCEDEMO_BAD_PASSWORD") {
            config.invalid.password = value;
        }
        if let Some(value) = env_var("SAUCEDEMO_CHROME_BIN") {
            config.chrome_executable = Some(PathBuf::from(value));
        }
        if let Some(value) = env_var("SAUCEDEMO_CDP_URL") {
            config.cdp_url = Some(value);
        }
        if let Some(value) = env_var("SAUCEDEMO_USER_DATA_DIR") {
            config.user_data_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = env_var("SAUCEDEMO_HEADLESS") {
            config.headless = parse_bool("SAUCEDEMO_HEADLESS", &value)?;
        }
        if let Some(value) = env_var("SAUCEDEMO_WAIT_TIMEOUT_MS") {
            config.wait_timeout_ms = parse_u64("SAUCEDEMO_WAIT_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = env_var("SAUCEDEMO_POLL_INTERVAL_MS") {
            config.poll_interval_ms = parse_u64("SAUCEDEMO_POLL_INTERVAL_MS", &value)?;
        }
        if let Some(value) = env_var("SAUCEDEMO_VERBOSE") {
            let parsed = parse_u8("SAUCEDEMO_VERBOSE", &value)?;
            config.verbose = Verbosity::from_u8(parsed)
                .ok_or(SuiteConfigError::InvalidVerbosity { value: parsed })?;
        }

        Ok(config)
    }

    /// Join a site path fragment onto the base URL.
    pub fn page_url(&self, fragment: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            fragment.trim_start_matches('/')
        )
    }

    /// Wait tuning for bounded expectations.
    pub fn wait_settings(&self) -> WaitSettings {
        WaitSettings {
            timeout: Duration::from_millis(self.wait_timeout_ms),
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Errors that can arise while constructing a [`SuiteConfig`].
#[derive(Debug, Error)]
pub enum SuiteConfigError {
    #[error("invalid boolean '{value}' for {field}")]
    InvalidBool { field: &'static str, value: String },
    #[error("invalid number '{value}' for {field}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid verbosity value {value}; expected 0, 1, or 2")]
    InvalidVerbosity { value: u8 },
}

fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, SuiteConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SuiteConfigError::InvalidBool {
            field,
            value: value.to_string(),
        }),
    }
}

fn parse_u8(field: &'static str, value: &str) -> Result<u8, SuiteConfigError> {
    value
        .trim()
        .parse::<u8>()
        .map_err(|source| SuiteConfigError::InvalidNumber {
            field,
            value: value.to_string(),
            source,
        })
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, SuiteConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|source| SuiteConfigError::InvalidNumber {
            field,
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    #[derive(Debug)]
    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(vars: &[(&str, Option<&str>)]) -> Self {
            let saved = vars
                .iter()
                .map(|(key, value)| {
                    let original = env::var(key).ok();
                    match value {
                        Some(v) => env::set_var(key, v),
                        None => env::remove_var(key),
                    };
                    ((*key).to_string(), original)
                })
                .collect();
            EnvGuard { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                match value {
                    Some(v) => env::set_var(&key, v),
                    None => env::remove_var(&key),
                }
            }
        }
    }

    fn with_env<F, T>(vars: &[(&str, Option<&str>)], f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let lock = env_lock().lock().expect("env mutex poisoned");
        let guard = EnvGuard::new(vars);
        let result = f();
        drop(guard);
        drop(lock);
        result
    }

    const ALL_VARS: &[&str] = &[
        "SAUCEDEMO_BASE_URL",
        "SAUCEDEMO_USERNAME",
        "SAUCEDEMO_PASSWORD",
        "SAUCEDEMO_BAD_USERNAME",
        "SAUCEDEMO_BAD_PASSWORD",
        "SAUCEDEMO_CHROME_BIN",
        "SAUCEDEMO_CDP_URL",
        "SAUCEDEMO_USER_DATA_DIR",
        "SAUCEDEMO_HEADLESS",
        "SAUCEDEMO_WAIT_TIMEOUT_MS",
        "SAUCEDEMO_POLL_INTERVAL_MS",
        "SAUCEDEMO_VERBOSE",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|key| (*key, None)).collect()
    }

    #[test]
    fn defaults_target_the_public_site() {
        with_env(&cleared(), || {
            let config = SuiteConfig::default();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.valid.username, "standard_user");
            assert_eq!(config.valid.password, "secret_sauce");
            assert_eq!(config.invalid.password, "secret_sauc");
            assert!(config.chrome_executable.is_none());
            assert!(config.cdp_url.is_none());
            assert!(config.headless);
            assert_eq!(config.wait_timeout_ms, 4_000);
            assert_eq!(config.poll_interval_ms, 100);
            assert_eq!(config.verbose, Verbosity::Medium);
        });
    }

    #[test]
    fn from_env_parses_and_normalises_values() {
        let mut vars = cleared();
        vars.extend([
            ("SAUCEDEMO_BASE_URL", Some("https://staging.example/")),
            ("SAUCEDEMO_USERNAME", Some("visual_user")),
            ("SAUCEDEMO_PASSWORD", Some("hunter2")),
            ("SAUCEDEMO_BAD_USERNAME", Some("nobody")),
            ("SAUCEDEMO_BAD_PASSWORD", Some("wrong")),
            ("SAUCEDEMO_CHROME_BIN", Some("/usr/bin/chromium")),
            ("SAUCEDEMO_HEADLESS", Some("false")),
            ("SAUCEDEMO_WAIT_TIMEOUT_MS", Some("9000")),
            ("SAUCEDEMO_POLL_INTERVAL_MS", Some("250")),
            ("SAUCEDEMO_VERBOSE", Some("2")),
        ]);

        with_env(&vars, || {
            let config = SuiteConfig::from_env().expect("config from env");
            assert_eq!(config.base_url, "https://staging.example/");
            assert_eq!(config.valid, CredentialPair::new("visual_user", "hunter2"));
            assert_eq!(config.invalid, CredentialPair::new("nobody", "wrong"));
            assert_eq!(
                config.chrome_executable.as_deref(),
                Some(std::path::Path::new("/usr/bin/chromium"))
            );
            assert!(!config.headless);
            assert_eq!(config.wait_timeout_ms, 9_000);
            assert_eq!(config.poll_interval_ms, 250);
            assert_eq!(config.verbose, Verbosity::Detailed);
        });
    }

    #[test]
    fn blank_overrides_fall_back_to_defaults() {
        let mut vars = cleared();
        vars.extend([
            ("SAUCEDEMO_USERNAME", Some("   ")),
            ("SAUCEDEMO_BASE_URL", Some("")),
        ]);

        with_env(&vars, || {
            let config = SuiteConfig::from_env().expect("config from env");
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.valid.username, "standard_user");
        });
    }

    #[test]
    fn malformed_values_are_rejected() {
        let mut vars = cleared();
        vars.push(("SAUCEDEMO_HEADLESS", Some("maybe")));
        with_env(&vars, || {
            let err = SuiteConfig::from_env().expect_err("invalid bool");
            assert!(matches!(err, SuiteConfigError::InvalidBool { .. }));
        });

        let mut vars = cleared();
        vars.push(("SAUCEDEMO_WAIT_TIMEOUT_MS", Some("soon")));
        with_env(&vars, || {
            let err = SuiteConfig::from_env().expect_err("invalid number");
            assert!(matches!(err, SuiteConfigError::InvalidNumber { .. }));
        });

        let mut vars = cleared();
        vars.push(("SAUCEDEMO_VERBOSE", Some("7")));
        with_env(&vars, || {
            let err = SuiteConfig::from_env().expect_err("invalid verbosity");
            assert!(matches!(
                err,
                SuiteConfigError::InvalidVerbosity { value: 7 }
            ));
        });
    }

    #[test]
    fn page_url_joins_fragments_without_doubled_slashes() {
        let config = SuiteConfig::default();
        assert_eq!(
            config.page_url("/inventory.html"),
            "https://www.saucedemo.com/inventory.html"
        );
        assert_eq!(
            config.page_url("cart.html"),
            "https://www.saucedemo.com/cart.html"
        );
    }
}
