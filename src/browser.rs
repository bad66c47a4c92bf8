//! Browser connection planning.
//!
//! This module transforms the suite configuration into a strongly-typed
//! launch plan and defines the [`BrowserRuntime`] seam through which the
//! rest of the suite talks to a browser. The chromiumoxide-backed
//! implementation lives in [`crate::runtime`]; unit tests substitute
//! recording mocks.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::config::SuiteConfig;

/// Viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280,
            height: 800,
        }
    }
}

/// Launch options applied when this process owns the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub headless: bool,
    pub viewport: Viewport,
    pub args: Vec<String>,
    pub chrome_executable: Option<PathBuf>,
    pub user_data_dir: Option<PathBuf>,
}

/// How the browser session is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchStrategy {
    /// Attach to an already-running browser over its CDP endpoint.
    AttachCdp { url: String },
    /// Launch a fresh browser process.
    Launch,
}

/// Normalised execution plan derived from a [`SuiteConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserPlan {
    pub strategy: LaunchStrategy,
    pub options: LaunchOptions,
}

impl BrowserPlan {
    pub fn from_config(config: &SuiteConfig) -> Self {
        let strategy = match &config.cdp_url {
            Some(url) => LaunchStrategy::AttachCdp { url: url.clone() },
            None => LaunchStrategy::Launch,
        };

        BrowserPlan {
            strategy,
            options: LaunchOptions {
                headless: config.headless,
                viewport: Viewport::default(),
                args: vec!["--disable-blink-features=AutomationControlled".to_string()],
                chrome_executable: config.chrome_executable.clone(),
                user_data_dir: config.user_data_dir.clone(),
            },
        }
    }
}

/// Errors surfaced by a [`BrowserRuntime`].
#[derive(Debug, Error)]
pub enum BrowserRuntimeError {
    #[error("browser runtime error: {0}")]
    Message(String),
    #[error("browser runtime not initialized")]
    NotInitialized,
    #[error("unknown page '{0}'")]
    UnknownPage(String),
}

/// Identifier of a page/tab within the browser session.
pub type PageId = String;

/// Adapter that bridges the suite to an actual browser.
///
/// The surface is deliberately small: the page layer expresses every DOM
/// interaction as a script evaluated in the page, so a runtime only needs
/// session management, navigation, evaluation, and session-state clearing.
#[async_trait]
pub trait BrowserRuntime: Send + Sync {
    /// Execute the plan; idempotent once a session exists.
    async fn start(&self, plan: &BrowserPlan) -> Result<(), BrowserRuntimeError>;

    /// Tear the session down and release the browser.
    async fn shutdown(&self) -> Result<(), BrowserRuntimeError>;

    /// Open a new page at `url` and return its identifier.
    async fn new_page(&self, url: &str) -> Result<PageId, BrowserRuntimeError>;

    /// Navigate an existing page.
    async fn navigate(&self, page_id: &str, url: &str) -> Result<(), BrowserRuntimeError>;

    /// Evaluate a script in the page and return its JSON value.
    async fn evaluate(&self, page_id: &str, expression: &str)
        -> Result<JsonValue, BrowserRuntimeError>;

    /// Clear cookies plus local and session storage for the page's origin.
    async fn clear_session_state(&self, page_id: &str) -> Result<(), BrowserRuntimeError>;
}

/// Owns the plan and dispatches it to a runtime.
pub struct SuiteBrowser<R: BrowserRuntime> {
    plan: BrowserPlan,
    runtime: R,
}

impl<R: BrowserRuntime> SuiteBrowser<R> {
    pub fn new(config: &SuiteConfig, runtime: R) -> Self {
        Self {
            plan: BrowserPlan::from_config(config),
            runtime,
        }
    }

    pub fn plan(&self) -> &BrowserPlan {
        &self.plan
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub async fn execute(&self) -> Result<(), BrowserRuntimeError> {
        self.runtime.start(&self.plan).await
    }

    pub async fn shutdown(&self) -> Result<(), BrowserRuntimeError> {
        self.runtime.shutdown().await
    }
}

impl<R: BrowserRuntime> fmt::Debug for SuiteBrowser<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteBrowser")
            .field("plan", &self.plan)
            .finish()
    }
}
