//! Suite client.
//!
//! Stitches the planned browser, the logger, and page bookkeeping together.
//! The browser plan is executed lazily, once, on first use; afterwards the
//! client hands out [`SitePage`] handles and remembers which page is
//! active for the scenario.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::browser::{BrowserRuntime, BrowserRuntimeError, PageId, SuiteBrowser};
use crate::config::SuiteConfig;
use crate::logging::SuiteLogger;
use crate::page::SitePage;

/// Errors surfaced by [`SuiteClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Runtime(#[from] BrowserRuntimeError),
    #[error("no active page; open a page first")]
    NoActivePage,
}

/// Orchestrates browser startup and page management for one suite run.
pub struct SuiteClient<R: BrowserRuntime> {
    config: SuiteConfig,
    browser: SuiteBrowser<R>,
    logger: Arc<SuiteLogger>,
    initialized: Mutex<bool>,
    active_page: Mutex<Option<PageId>>,
}

impl<R: BrowserRuntime> SuiteClient<R> {
    pub fn new(config: SuiteConfig, runtime: R) -> Self {
        let browser = SuiteBrowser::new(&config, runtime);
        let logger = Arc::new(SuiteLogger::new(config.verbose));
        Self {
            config,
            browser,
            logger,
            initialized: Mutex::new(false),
            active_page: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn browser(&self) -> &SuiteBrowser<R> {
        &self.browser
    }

    pub fn runtime(&self) -> &R {
        self.browser.runtime()
    }

    pub fn logger(&self) -> Arc<SuiteLogger> {
        Arc::clone(&self.logger)
    }

    /// Execute the browser plan if it has not run yet.
    pub async fn ensure_initialized(&self) -> Result<(), ClientError> {
        let mut guard = self.initialized.lock().await;
        if !*guard {
            self.browser.execute().await?;
            *guard = true;
        }
        Ok(())
    }

    /// Open a page, mark it active, and return a handle to it.
    pub async fn open_page(&self, url: &str) -> Result<SitePage<'_, R>, ClientError> {
        self.ensure_initialized().await?;
        let page_id = self.runtime().new_page(url).await?;
        {
            let mut guard = self.active_page.lock().await;
            *guard = Some(page_id.clone());
        }
        self.logger.debug(
            format!("opened page at {url}"),
            Some("session"),
            None,
        );
        Ok(self.page(page_id))
    }

    /// Handle for a known page id.
    pub fn page(&self, page_id: impl Into<PageId>) -> SitePage<'_, R> {
        SitePage::new(self, page_id)
    }

    /// Handle for the page most recently opened.
    pub async fn active_page(&self) -> Result<SitePage<'_, R>, ClientError> {
        let guard = self.active_page.lock().await;
        match guard.as_ref() {
            Some(id) => Ok(self.page(id.clone())),
            None => Err(ClientError::NoActivePage),
        }
    }

    /// Tear down the browser session.
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        {
            let mut guard = self.active_page.lock().await;
            *guard = None;
        }
        self.browser.shutdown().await?;
        let mut guard = self.initialized.lock().await;
        *guard = false;
        Ok(())
    }
}
