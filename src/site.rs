//! Stable identifiers of the saucedemo.com UI.
//!
//! Everything the suite selects or compares against lives here: CSS
//! selectors for the controls the site exposes, the URL path fragments of
//! each page, and the literal message texts the site renders. Keeping them
//! in one place means a markup change on the site is a one-file fix.

/// URL path fragments, matched with a contains check against the current
/// location.
pub mod urls {
    pub const INVENTORY: &str = "/inventory.html";
    pub const CART: &str = "/cart.html";
    pub const CHECKOUT_STEP_ONE: &str = "/checkout-step-one.html";
    pub const CHECKOUT_STEP_TWO: &str = "/checkout-step-two.html";
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";
}

/// CSS selectors for the controls the suite interacts with.
pub mod selectors {
    // Login page.
    pub const USERNAME_INPUT: &str = "#user-name";
    pub const PASSWORD_INPUT: &str = "#password";
    pub const LOGIN_BUTTON: &str = "#login-button";
    pub const ERROR_MESSAGE: &str = "[data-test=\"error\"]";
    pub const ERROR_DISMISS: &str = ".error-button";

    // Burger menu.
    pub const MENU_BUTTON: &str = "#react-burger-menu-btn";
    pub const LOGOUT_LINK: &str = "#logout_sidebar_link";

    // Inventory and cart.
    pub const PAGE_TITLE: &str = "span.title[data-test=\"title\"]";
    pub const INVENTORY_ITEM_PRICE: &str =
        "div.inventory_item_price[data-test=\"inventory-item-price\"]";
    pub const CART_LINK: &str = "a.shopping_cart_link[data-test=\"shopping-cart-link\"]";
    pub const CART_BADGE: &str = "span.shopping_cart_badge[data-test=\"shopping-cart-badge\"]";
    pub const CART_ITEM: &str = ".cart_item";
    pub const CHECKOUT_BUTTON: &str = "#checkout";
    pub const CONTINUE_SHOPPING_BUTTON: &str = "#continue-shopping";

    // Checkout information form.
    pub const FIRST_NAME_INPUT: &str = "#first-name";
    pub const LAST_NAME_INPUT: &str = "#last-name";
    pub const POSTAL_CODE_INPUT: &str = "#postal-code";
    pub const CONTINUE_BUTTON: &str = "#continue";
    pub const CANCEL_BUTTON: &str = "#cancel";

    // Checkout overview and completion.
    pub const FINISH_BUTTON: &str = "#finish";
    pub const SUBTOTAL_LABEL: &str = "div.summary_subtotal_label[data-test=\"subtotal-label\"]";
    pub const COMPLETE_HEADER: &str = "h2.complete-header[data-test=\"complete-header\"]";
}

/// CSS class names asserted on (as classes, not selectors).
pub mod classes {
    /// Applied to both login inputs when validation fails.
    pub const INPUT_ERROR: &str = "input_error";
}

/// Literal message texts rendered by the site, compared bit-exact (via a
/// contains check, matching how the site wraps them in markup).
pub mod messages {
    pub const USERNAME_REQUIRED: &str = "Username is required";
    pub const PASSWORD_REQUIRED: &str = "Password is required";
    pub const CREDENTIAL_MISMATCH: &str =
        "Epic sadface: Username and password do not match any user in this service";
    pub const LOCKED_OUT: &str = "Sorry, this user has been locked out";

    pub const FIRST_NAME_REQUIRED: &str = "Error: First Name is required";
    pub const LAST_NAME_REQUIRED: &str = "Error: Last Name is required";
    pub const POSTAL_CODE_REQUIRED: &str = "Error: Postal Code is required";

    pub const PRODUCTS_TITLE: &str = "Products";
    pub const CHECKOUT_INFO_TITLE: &str = "Checkout: Your Information";
    pub const ORDER_COMPLETE: &str = "Thank you for your order!";

    pub const BACKPACK_PRICE: &str = "$29.99";
    pub const BACKPACK_SUBTOTAL: &str = "Item total: $29.99";
}

/// A catalog item with the stable slug the site embeds in its add/remove
/// control ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    slug: &'static str,
}

/// The one item the suite exercises.
pub const BACKPACK: CatalogItem = CatalogItem {
    slug: "sauce-labs-backpack",
};

impl CatalogItem {
    pub fn slug(&self) -> &'static str {
        self.slug
    }

    /// Selector for the "Add to cart" control of this item.
    pub fn add_selector(&self) -> String {
        format!("#add-to-cart-{}", self.slug)
    }

    /// Selector for the "Remove" control the add button toggles into.
    pub fn remove_selector(&self) -> String {
        format!("#remove-{}", self.slug)
    }
}
