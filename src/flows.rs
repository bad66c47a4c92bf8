//! Reusable action helpers.
//!
//! Each helper performs a multi-step UI sequence and asserts the resulting
//! state before returning, so callers can compose them to reach a known
//! point in the store without re-checking preconditions. A helper that
//! returns `Ok` has verified its post-condition; any other outcome aborts
//! the scenario.

use crate::browser::BrowserRuntime;
use crate::page::{PageError, SitePage};
use crate::site::{self, selectors, urls};

/// Load the site root, sign in with the configured valid credentials, and
/// verify the inventory page was reached.
pub async fn authenticate<R: BrowserRuntime>(page: &SitePage<'_, R>) -> Result<(), PageError> {
    let config = page.client().config();
    let base_url = config.base_url.clone();
    let username = config.valid.username.clone();
    let password = config.valid.password.clone();

    page.goto(&base_url).await?;
    page.expect_visible(selectors::USERNAME_INPUT).await?;
    page.expect_visible(selectors::PASSWORD_INPUT).await?;
    page.expect_visible(selectors::LOGIN_BUTTON).await?;

    page.fill(selectors::USERNAME_INPUT, &username).await?;
    page.fill(selectors::PASSWORD_INPUT, &password).await?;
    page.click(selectors::LOGIN_BUTTON).await?;

    page.expect_url_contains(urls::INVENTORY).await?;
    page.client()
        .logger()
        .info(format!("authenticated as {username}"), Some("auth"), None);
    Ok(())
}

/// Add the backpack to the cart and verify its control toggled to remove.
pub async fn add_backpack_to_cart<R: BrowserRuntime>(
    page: &SitePage<'_, R>,
) -> Result<(), PageError> {
    page.click(&site::BACKPACK.add_selector()).await?;
    page.expect_visible(&site::BACKPACK.remove_selector()).await?;
    page.client()
        .logger()
        .info("backpack added to cart", Some("cart"), None);
    Ok(())
}

/// Open the cart via the cart icon and verify the cart page was reached.
pub async fn go_to_cart<R: BrowserRuntime>(page: &SitePage<'_, R>) -> Result<(), PageError> {
    page.click(selectors::CART_LINK).await?;
    page.expect_url_contains(urls::CART).await?;
    Ok(())
}

/// Start checkout from the cart and verify the information step was
/// reached, including its title.
pub async fn go_to_checkout_information<R: BrowserRuntime>(
    page: &SitePage<'_, R>,
) -> Result<(), PageError> {
    page.expect_visible(selectors::CHECKOUT_BUTTON).await?;
    page.click(selectors::CHECKOUT_BUTTON).await?;
    page.expect_url_contains(urls::CHECKOUT_STEP_ONE).await?;
    page.expect_text_contains(selectors::PAGE_TITLE, site::messages::CHECKOUT_INFO_TITLE)
        .await?;
    Ok(())
}
