//! Browser regression suite for the `saucedemo.com` demo storefront.
//!
//! The site under test owns all of the business logic (authentication,
//! catalog, cart persistence, checkout validation); this crate only drives a
//! real Chromium instance over the Chrome DevTools Protocol and asserts on
//! the externally visible effects: element visibility, text content, CSS
//! classes, and URLs.
//!
//! The crate is organised as a small harness plus two integration-test
//! suites (`tests/login.rs` and `tests/checkout.rs`):
//!
//! - [`config`] supplies the base URL, credential pairs, and wait tuning,
//!   with environment-variable overrides over fixed fallbacks.
//! - [`browser`] plans how the browser is obtained (launch vs. attach) and
//!   defines the [`browser::BrowserRuntime`] seam.
//! - [`runtime`] implements that seam with `chromiumoxide`.
//! - [`page`] is the per-page handle: DOM interaction plus bounded-wait
//!   expectations that poll until a condition holds or time out.
//! - [`flows`] holds the reusable action helpers (authenticate, add the
//!   backpack, open the cart, reach checkout information), each ending in a
//!   verified post-condition.
//! - [`harness`] ties the pieces together for a scenario.

pub mod browser;
pub mod client;
pub mod config;
pub mod flows;
pub mod harness;
pub mod logging;
pub mod page;
pub mod runtime;
pub mod site;
pub mod wait;
