//! Chromiumoxide-based browser runtime.
//!
//! Implements [`BrowserRuntime`](crate::browser::BrowserRuntime) with the
//! `chromiumoxide` crate: launching (or attaching to) a Chromium instance,
//! keeping the CDP handler pumped on a background task, and tracking open
//! pages by target id so the page layer can address them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    page::Page as ChromiumPage,
};
use futures_util::StreamExt;
use serde_json::Value as JsonValue;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::browser::{
    BrowserPlan, BrowserRuntime, BrowserRuntimeError, LaunchStrategy, PageId,
};

const CLEAR_WEB_STORAGE_SCRIPT: &str = "(function() {
    try {
        window.localStorage.clear();
        window.sessionStorage.clear();
    } catch (err) {
        return false;
    }
    return true;
})()";

pub struct ChromiumRuntime {
    state: Arc<Mutex<Option<RuntimeState>>>,
}

struct RuntimeState {
    browser: Arc<Browser>,
    handler: JoinHandle<()>,
    pages: HashMap<PageId, ChromiumPage>,
}

impl ChromiumRuntime {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
        }
    }

    async fn browser(&self) -> Result<Arc<Browser>, BrowserRuntimeError> {
        let guard = self.state.lock().await;
        guard
            .as_ref()
            .map(|state| state.browser.clone())
            .ok_or(BrowserRuntimeError::NotInitialized)
    }

    async fn page(&self, page_id: &str) -> Result<ChromiumPage, BrowserRuntimeError> {
        let guard = self.state.lock().await;
        let state = guard.as_ref().ok_or(BrowserRuntimeError::NotInitialized)?;
        state
            .pages
            .get(page_id)
            .cloned()
            .ok_or_else(|| BrowserRuntimeError::UnknownPage(page_id.to_string()))
    }

    async fn install(&self, browser: Browser, handler: chromiumoxide::handler::Handler) {
        let new_state = RuntimeState {
            browser: Arc::new(browser),
            handler: spawn_handler(handler),
            pages: HashMap::new(),
        };

        let old_state = {
            let mut guard = self.state.lock().await;
            guard.replace(new_state)
        };

        if let Some(state) = old_state {
            cleanup_state(state);
        }
    }
}

impl Default for ChromiumRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserRuntime for ChromiumRuntime {
    async fn start(&self, plan: &BrowserPlan) -> Result<(), BrowserRuntimeError> {
        if self.state.lock().await.is_some() {
            return Ok(());
        }

        let (browser, handler) = match &plan.strategy {
            LaunchStrategy::AttachCdp { url } => {
                Browser::connect(url).await.map_err(map_cdp_error)?
            }
            LaunchStrategy::Launch => {
                let config = build_config(plan)?;
                Browser::launch(config).await.map_err(map_cdp_error)?
            }
        };

        self.install(browser, handler).await;
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), BrowserRuntimeError> {
        let state = {
            let mut guard = self.state.lock().await;
            guard.take()
        };

        if let Some(state) = state {
            cleanup_state(state);
        }
        Ok(())
    }

    async fn new_page(&self, url: &str) -> Result<PageId, BrowserRuntimeError> {
        let browser = self.browser().await?;
        let page = browser.new_page(url).await.map_err(map_cdp_error)?;
        let page_id = page.target_id().as_ref().to_string();

        let mut guard = self.state.lock().await;
        if let Some(state) = guard.as_mut() {
            state.pages.insert(page_id.clone(), page);
        }

        Ok(page_id)
    }

    async fn navigate(&self, page_id: &str, url: &str) -> Result<(), BrowserRuntimeError> {
        let page = self.page(page_id).await?;
        page.goto(url).await.map_err(map_cdp_error)?;
        Ok(())
    }

    async fn evaluate(
        &self,
        page_id: &str,
        expression: &str,
    ) -> Result<JsonValue, BrowserRuntimeError> {
        let page = self.page(page_id).await?;
        let result = page.evaluate(expression).await.map_err(map_cdp_error)?;
        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    async fn clear_session_state(&self, page_id: &str) -> Result<(), BrowserRuntimeError> {
        let page = self.page(page_id).await?;
        page.execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(map_cdp_error)?;
        // Web storage is origin-scoped, so it is cleared in the page itself.
        page.evaluate(CLEAR_WEB_STORAGE_SCRIPT)
            .await
            .map_err(map_cdp_error)?;
        Ok(())
    }
}

#[async_trait]
impl BrowserRuntime for Arc<ChromiumRuntime> {
    async fn start(&self, plan: &BrowserPlan) -> Result<(), BrowserRuntimeError> {
        (**self).start(plan).await
    }

    async fn shutdown(&self) -> Result<(), BrowserRuntimeError> {
        (**self).shutdown().await
    }

    async fn new_page(&self, url: &str) -> Result<PageId, BrowserRuntimeError> {
        (**self).new_page(url).await
    }

    async fn navigate(&self, page_id: &str, url: &str) -> Result<(), BrowserRuntimeError> {
        (**self).navigate(page_id, url).await
    }

    async fn evaluate(
        &self,
        page_id: &str,
        expression: &str,
    ) -> Result<JsonValue, BrowserRuntimeError> {
        (**self).evaluate(page_id, expression).await
    }

    async fn clear_session_state(&self, page_id: &str) -> Result<(), BrowserRuntimeError> {
        (**self).clear_session_state(page_id).await
    }
}

fn build_config(plan: &BrowserPlan) -> Result<BrowserConfig, BrowserRuntimeError> {
    let options = &plan.options;

    let viewport = chromiumoxide::handler::viewport::Viewport {
        width: options.viewport.width,
        height: options.viewport.height,
        device_scale_factor: None,
        emulating_mobile: false,
        is_landscape: options.viewport.width >= options.viewport.height,
        has_touch: false,
    };

    let mut builder = BrowserConfig::builder();

    if let Some(path) = &options.chrome_executable {
        builder = builder.chrome_executable(path);
    }

    let builder = builder.viewport(viewport).args(options.args.clone());

    let builder = if options.headless {
        builder
    } else {
        builder.with_head()
    };

    let builder = match &options.user_data_dir {
        Some(dir) => builder.user_data_dir(dir),
        None => builder,
    };

    builder.build().map_err(BrowserRuntimeError::Message)
}

fn map_cdp_error<E: std::fmt::Display>(err: E) -> BrowserRuntimeError {
    BrowserRuntimeError::Message(err.to_string())
}

fn spawn_handler(mut handler: chromiumoxide::handler::Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(result) = handler.next().await {
            if let Err(err) = result {
                eprintln!("chromiumoxide handler error: {err}");
            }
        }
    })
}

fn cleanup_state(mut state: RuntimeState) {
    state.handler.abort();
    state.pages.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn page_lookup_requires_a_started_session() {
        let runtime = ChromiumRuntime::new();
        let err = runtime
            .page("no-such-page")
            .await
            .expect_err("should fail before start");
        assert!(matches!(err, BrowserRuntimeError::NotInitialized));
    }

    #[tokio::test]
    async fn shutdown_without_a_session_is_a_no_op() {
        let runtime = ChromiumRuntime::new();
        runtime.shutdown().await.expect("shutdown");
    }

    #[test]
    fn clear_web_storage_script_targets_both_stores() {
        assert!(CLEAR_WEB_STORAGE_SCRIPT.contains("localStorage.clear()"));
        assert!(CLEAR_WEB_STORAGE_SCRIPT.contains("sessionStorage.clear()"));
    }
}
