//! High-level suite facade.
//!
//! Wraps [`SuiteClient`] with the handful of operations a scenario needs:
//! initialise the browser once, open the storefront, reset session state
//! between scenarios, and shut everything down.

use std::sync::Arc;

use crate::browser::BrowserRuntime;
use crate::client::{ClientError, SuiteClient};
use crate::config::SuiteConfig;
use crate::page::{PageError, SitePage};
use crate::runtime::ChromiumRuntime;

/// Entry point for a suite run.
pub struct Harness<R: BrowserRuntime> {
    client: SuiteClient<R>,
}

impl Harness<Arc<ChromiumRuntime>> {
    /// Construct a harness backed by the default chromiumoxide runtime.
    pub fn new_local(config: SuiteConfig, runtime: Arc<ChromiumRuntime>) -> Self {
        Self::from_client(SuiteClient::new(config, runtime))
    }
}

impl<R: BrowserRuntime> Harness<R> {
    /// Wrap an existing client in the facade.
    pub fn from_client(client: SuiteClient<R>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SuiteClient<R> {
        &self.client
    }

    pub fn config(&self) -> &SuiteConfig {
        self.client.config()
    }

    /// Ensure the browser session exists.
    pub async fn init(&self) -> Result<(), ClientError> {
        self.client.ensure_initialized().await
    }

    /// Gracefully shut down the browser and release resources.
    pub async fn close(&self) -> Result<(), ClientError> {
        self.client.shutdown().await
    }

    /// Open a page at the storefront root and return its handle.
    pub async fn open_start_page(&self) -> Result<SitePage<'_, R>, ClientError> {
        let url = self.config().base_url.clone();
        self.client.open_page(&url).await
    }

    /// Open a page at an explicit URL.
    pub async fn open_page(&self, url: &str) -> Result<SitePage<'_, R>, ClientError> {
        self.client.open_page(url).await
    }

    /// Retrieve the currently active page.
    pub async fn page(&self) -> Result<SitePage<'_, R>, ClientError> {
        self.client.active_page().await
    }

    /// Open the storefront with a clean slate: cookies and web storage are
    /// cleared and the root is reloaded, so nothing leaks between
    /// scenarios.
    pub async fn open_clean_session(&self) -> Result<SitePage<'_, R>, ClientError> {
        let page = self.open_start_page().await?;
        reset_session(&page).await.map_err(page_to_client_error)?;
        Ok(page)
    }
}

/// Clear session state on an open page and reload the storefront root.
pub async fn reset_session<R: BrowserRuntime>(page: &SitePage<'_, R>) -> Result<(), PageError> {
    page.clear_session_state().await?;
    let base_url = page.client().config().base_url.clone();
    page.goto(&base_url).await?;
    Ok(())
}

fn page_to_client_error(err: PageError) -> ClientError {
    match err {
        PageError::Runtime(inner) => ClientError::Runtime(inner),
        // Session reset performs no waits; anything else is a runtime fault.
        other => ClientError::Runtime(crate::browser::BrowserRuntimeError::Message(
            other.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{BrowserPlan, BrowserRuntimeError, PageId};
    use async_trait::async_trait;
    use serde_json::Value as JsonValue;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRuntime {
        opened: Mutex<Vec<String>>,
        navigated: Mutex<Vec<String>>,
        cleared: Mutex<Vec<PageId>>,
        next_page: Mutex<u32>,
    }

    #[async_trait]
    impl BrowserRuntime for RecordingRuntime {
        async fn start(&self, _plan: &BrowserPlan) -> Result<(), BrowserRuntimeError> {
            Ok(())
        }

        async fn shutdown(&self) -> Result<(), BrowserRuntimeError> {
            Ok(())
        }

        async fn new_page(&self, url: &str) -> Result<PageId, BrowserRuntimeError> {
            let mut next = self.next_page.lock().unwrap();
            let id = format!("page-{}", *next);
            *next += 1;
            self.opened.lock().unwrap().push(url.to_string());
            Ok(id)
        }

        async fn navigate(&self, _page_id: &str, url: &str) -> Result<(), BrowserRuntimeError> {
            self.navigated.lock().unwrap().push(url.to_string());
            Ok(())
        }

        async fn evaluate(
            &self,
            _page_id: &str,
            _expression: &str,
        ) -> Result<JsonValue, BrowserRuntimeError> {
            Ok(JsonValue::Null)
        }

        async fn clear_session_state(&self, page_id: &str) -> Result<(), BrowserRuntimeError> {
            self.cleared.lock().unwrap().push(page_id.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn open_start_page_uses_the_configured_base_url() {
        let harness = Harness::from_client(SuiteClient::new(
            SuiteConfig::default(),
            RecordingRuntime::default(),
        ));

        let page = harness.open_start_page().await.unwrap();
        assert_eq!(page.id(), "page-0");
        assert_eq!(
            harness.client().runtime().opened.lock().unwrap().as_slice(),
            &["https://www.saucedemo.com/".to_string()]
        );

        let active = harness.page().await.unwrap();
        assert_eq!(active.id(), "page-0");
    }

    #[tokio::test]
    async fn clean_session_clears_state_and_reloads_the_root() {
        let harness = Harness::from_client(SuiteClient::new(
            SuiteConfig::default(),
            RecordingRuntime::default(),
        ));

        let page = harness.open_clean_session().await.unwrap();
        assert_eq!(page.id(), "page-0");

        let runtime = harness.client().runtime();
        assert_eq!(
            runtime.cleared.lock().unwrap().as_slice(),
            &["page-0".to_string()]
        );
        assert_eq!(
            runtime.navigated.lock().unwrap().as_slice(),
            &["https://www.saucedemo.com/".to_string()]
        );
    }
}
