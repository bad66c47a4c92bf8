//! Per-page handle: DOM interaction and bounded-wait expectations.
//!
//! Every interaction is expressed as a CSS-selector script evaluated in the
//! page, so the whole surface rides on [`BrowserRuntime::evaluate`] and unit
//! tests can drive it with a scripted runtime. Expectations poll until the
//! condition holds or the configured timeout elapses and then fail with the
//! expected condition alongside what was last observed.

use std::future::Future;

use thiserror::Error;
use tokio::time::{sleep, Instant};

use crate::browser::{BrowserRuntime, BrowserRuntimeError, PageId};
use crate::client::SuiteClient;
use crate::wait::{Probe, WaitTimeout};

/// Errors surfaced by page interactions and expectations.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Runtime(#[from] BrowserRuntimeError),
    #[error(transparent)]
    Timeout(#[from] WaitTimeout),
    #[error("element '{selector}' not found")]
    ElementNotFound { selector: String },
    #[error("failed to encode script argument: {0}")]
    Script(#[from] serde_json::Error),
}

/// Handle to one open page of the site.
pub struct SitePage<'client, R: BrowserRuntime> {
    client: &'client SuiteClient<R>,
    page_id: PageId,
}

impl<'client, R: BrowserRuntime> SitePage<'client, R> {
    pub fn new(client: &'client SuiteClient<R>, page_id: impl Into<PageId>) -> Self {
        Self {
            client,
            page_id: page_id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.page_id
    }

    pub fn client(&self) -> &SuiteClient<R> {
        self.client
    }

    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, PageError> {
        Ok(self
            .client
            .runtime()
            .evaluate(&self.page_id, expression)
            .await?)
    }

    // ---- navigation and session state ----

    pub async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.client.runtime().navigate(&self.page_id, url).await?;
        Ok(())
    }

    /// Clear cookies plus local and session storage for this page's origin.
    pub async fn clear_session_state(&self) -> Result<(), PageError> {
        self.client
            .runtime()
            .clear_session_state(&self.page_id)
            .await?;
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String, PageError> {
        let value = self.evaluate("window.location.href").await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    // ---- single-shot probes ----

    pub async fn exists(&self, selector: &str) -> Result<bool, PageError> {
        let script = selector_script(selector, "return el !== null;")?;
        Ok(self.evaluate(&script).await?.as_bool().unwrap_or(false))
    }

    pub async fn is_visible(&self, selector: &str) -> Result<bool, PageError> {
        let script = selector_script(
            selector,
            "if (!el) { return false; }
            const rect = el.getBoundingClientRect();
            const style = window.getComputedStyle(el);
            return rect.width > 0 && rect.height > 0
                && style.display !== 'none' && style.visibility !== 'hidden';",
        )?;
        Ok(self.evaluate(&script).await?.as_bool().unwrap_or(false))
    }

    /// Text content of the first matching element; `None` when absent.
    pub async fn text_of(&self, selector: &str) -> Result<Option<String>, PageError> {
        let script = selector_script(selector, "return el ? el.textContent : null;")?;
        Ok(self.evaluate(&script).await?.as_str().map(str::to_string))
    }

    /// Attribute value of the first matching element; `None` when the
    /// element or the attribute is absent.
    pub async fn attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, PageError> {
        let name_json = serde_json::to_string(name)?;
        let body = format!("return el ? el.getAttribute({name_json}) : null;");
        let script = selector_script(selector, &body)?;
        Ok(self.evaluate(&script).await?.as_str().map(str::to_string))
    }

    /// Whether the element carries the class; `None` when absent.
    pub async fn has_class(
        &self,
        selector: &str,
        class: &str,
    ) -> Result<Option<bool>, PageError> {
        let class_json = serde_json::to_string(class)?;
        let body = format!("return el ? el.classList.contains({class_json}) : null;");
        let script = selector_script(selector, &body)?;
        Ok(self.evaluate(&script).await?.as_bool())
    }

    /// Whether the control is disabled; `None` when absent.
    pub async fn is_disabled(&self, selector: &str) -> Result<Option<bool>, PageError> {
        let script = selector_script(selector, "return el ? el.disabled === true : null;")?;
        Ok(self.evaluate(&script).await?.as_bool())
    }

    // ---- actions ----

    /// Wait for the element to be visible, then click it.
    pub async fn click(&self, selector: &str) -> Result<(), PageError> {
        self.expect_visible(selector).await?;
        let script = selector_script(
            selector,
            "if (!el) { return false; }
            el.click();
            return true;",
        )?;
        if self.evaluate(&script).await?.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(PageError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    /// Wait for the input to be visible, then replace its value.
    ///
    /// Controlled inputs track their value through the native property
    /// setter; assigning `el.value` directly is invisible to the framework
    /// that renders the site, so the setter is called explicitly before the
    /// input/change events are dispatched.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<(), PageError> {
        self.expect_visible(selector).await?;
        let value_json = serde_json::to_string(value)?;
        let body = format!(
            "if (!el) {{ return false; }}
            el.focus();
            const proto = el instanceof HTMLTextAreaElement
                ? window.HTMLTextAreaElement.prototype
                : window.HTMLInputElement.prototype;
            const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
            setter.call(el, {value_json});
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;"
        );
        let script = selector_script(selector, &body)?;
        if self.evaluate(&script).await?.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(PageError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    /// Focus the element and press a key.
    ///
    /// Synthetic key events are untrusted, so the browser skips the implicit
    /// form submission a real Enter performs; it is mirrored explicitly.
    pub async fn press_key(&self, selector: &str, key: &str) -> Result<(), PageError> {
        self.expect_visible(selector).await?;
        let key_json = serde_json::to_string(key)?;
        let body = format!(
            "if (!el) {{ return false; }}
            el.focus();
            const init = {{ key: {key_json}, bubbles: true, cancelable: true }};
            const proceed = el.dispatchEvent(new KeyboardEvent('keydown', init));
            if (proceed && {key_json} === 'Enter' && el.form) {{
                el.form.requestSubmit();
            }}
            el.dispatchEvent(new KeyboardEvent('keyup', init));
            return true;"
        );
        let script = selector_script(selector, &body)?;
        if self.evaluate(&script).await?.as_bool().unwrap_or(false) {
            Ok(())
        } else {
            Err(PageError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    /// Replace `window.alert` with a counter, for scenarios asserting that
    /// injected markup never executes.
    pub async fn arm_alert_probe(&self) -> Result<(), PageError> {
        self.evaluate(
            "(function() {
                window.__alertInvocations = 0;
                window.alert = function() { window.__alertInvocations += 1; };
                return true;
            })()",
        )
        .await?;
        Ok(())
    }

    pub async fn alert_invocations(&self) -> Result<u64, PageError> {
        let value = self
            .evaluate("(function() { return window.__alertInvocations || 0; })()")
            .await?;
        Ok(value.as_u64().unwrap_or(0))
    }

    // ---- bounded-wait expectations ----

    pub async fn expect_visible(&self, selector: &str) -> Result<(), PageError> {
        let expected = format!("element '{selector}' is visible");
        self.wait_until(&expected, || async move {
            let visible = self.is_visible(selector).await?;
            Ok(Probe::from_bool(visible, "element hidden or absent"))
        })
        .await
    }

    pub async fn expect_exists(&self, selector: &str) -> Result<(), PageError> {
        let expected = format!("element '{selector}' exists");
        self.wait_until(&expected, || async move {
            let present = self.exists(selector).await?;
            Ok(Probe::from_bool(present, "element absent"))
        })
        .await
    }

    pub async fn expect_absent(&self, selector: &str) -> Result<(), PageError> {
        let expected = format!("element '{selector}' is absent");
        self.wait_until(&expected, || async move {
            let present = self.exists(selector).await?;
            Ok(Probe::from_bool(!present, "element still present"))
        })
        .await
    }

    pub async fn expect_text_contains(
        &self,
        selector: &str,
        needle: &str,
    ) -> Result<(), PageError> {
        let expected = format!("element '{selector}' text contains {needle:?}");
        self.wait_until(&expected, || async move {
            match self.text_of(selector).await? {
                Some(text) if text.contains(needle) => Ok(Probe::Satisfied),
                Some(text) => Ok(Probe::Pending(format!("text {text:?}"))),
                None => Ok(Probe::Pending("element absent".to_string())),
            }
        })
        .await
    }

    pub async fn expect_attribute(
        &self,
        selector: &str,
        name: &str,
        value: &str,
    ) -> Result<(), PageError> {
        let expected = format!("element '{selector}' attribute {name}={value:?}");
        self.wait_until(&expected, || async move {
            match self.attribute(selector, name).await? {
                Some(actual) if actual == value => Ok(Probe::Satisfied),
                Some(actual) => Ok(Probe::Pending(format!("{name}={actual:?}"))),
                None => Ok(Probe::Pending(format!("{name} absent"))),
            }
        })
        .await
    }

    pub async fn expect_class(&self, selector: &str, class: &str) -> Result<(), PageError> {
        let expected = format!("element '{selector}' has class {class:?}");
        self.wait_until(&expected, || async move {
            match self.has_class(selector, class).await? {
                Some(true) => Ok(Probe::Satisfied),
                Some(false) => Ok(Probe::Pending("class missing".to_string())),
                None => Ok(Probe::Pending("element absent".to_string())),
            }
        })
        .await
    }

    pub async fn expect_enabled(&self, selector: &str) -> Result<(), PageError> {
        let expected = format!("element '{selector}' is enabled");
        self.wait_until(&expected, || async move {
            match self.is_disabled(selector).await? {
                Some(false) => Ok(Probe::Satisfied),
                Some(true) => Ok(Probe::Pending("element disabled".to_string())),
                None => Ok(Probe::Pending("element absent".to_string())),
            }
        })
        .await
    }

    pub async fn expect_url_contains(&self, fragment: &str) -> Result<(), PageError> {
        let expected = format!("location contains {fragment:?}");
        self.wait_until(&expected, || async move {
            let url = self.current_url().await?;
            if url.contains(fragment) {
                Ok(Probe::Satisfied)
            } else {
                Ok(Probe::Pending(format!("location {url:?}")))
            }
        })
        .await
    }

    /// Poll `probe` until it is satisfied or the configured timeout elapses.
    ///
    /// Evaluation errors while a navigation is in flight (the execution
    /// context is torn down mid-probe) count as pending observations, not
    /// hard failures; only the deadline turns them into one.
    async fn wait_until<F, Fut>(&self, expected: &str, mut probe: F) -> Result<(), PageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Probe, PageError>>,
    {
        let settings = self.client.config().wait_settings();
        let deadline = Instant::now() + settings.timeout;
        let mut last = String::from("nothing observed yet");

        loop {
            match probe().await {
                Ok(Probe::Satisfied) => return Ok(()),
                Ok(Probe::Pending(observed)) => last = observed,
                Err(PageError::Runtime(err)) => last = format!("evaluation error: {err}"),
                Err(other) => return Err(other),
            }

            if Instant::now() >= deadline {
                self.client.logger().debug(
                    format!("expectation timed out: {expected}"),
                    Some("wait"),
                    None,
                );
                return Err(WaitTimeout {
                    expected: expected.to_string(),
                    observed: last,
                    timeout_ms: settings.timeout.as_millis() as u64,
                }
                .into());
            }

            sleep(settings.interval).await;
        }
    }
}

/// Wrap `body` in a function that resolves `el` from a CSS selector.
fn selector_script(selector: &str, body: &str) -> Result<String, PageError> {
    let selector_json = serde_json::to_string(selector)?;
    Ok(format!(
        "(function() {{
            const el = document.querySelector({selector_json});
            {body}
        }})()"
    ))
}
