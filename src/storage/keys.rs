/// Key names for the secure store.
///
/// Once published, do not rename: these strings are the on-disk identity of
/// every persisted value.
pub struct StorageKeys;

impl StorageKeys {
    // Session
    pub const AUTH_TOKEN: &'static str = "auth_token";
    pub const USER_ID: &'static str = "user_id";
    pub const USER_NAME: &'static str = "user_name";
    pub const USER_EMAIL: &'static str = "user_email";
    pub const IS_LOGGED_IN: &'static str = "is_logged_in";
    pub const LAST_LOGIN_TIMESTAMP: &'static str = "last_login_timestamp";
    pub const LAST_LOGOUT_TIMESTAMP: &'static str = "last_logout_timestamp";
    pub const LAST_LOGGED_IN_EMAIL: &'static str = "last_logged_in_email";
    pub const USER_STATE: &'static str = "user_state";

    // App settings (reserved)
    pub const DARK_MODE: &'static str = "dark_mode";
    pub const NOTIFICATIONS_ENABLED: &'static str = "notifications_enabled";
    pub const APP_LANGUAGE: &'static str = "app_language";

    // User preferences (reserved)
    pub const SELECTED_CURRENCY: &'static str = "selected_currency";
    pub const ADDRESS_PRIMARY: &'static str = "address_primary";

    // Shopping (reserved)
    pub const CART_ITEMS: &'static str = "cart_items";
    pub const WISHLIST_ITEMS: &'static str = "wishlist_items";
    pub const RECENT_SEARCHES: &'static str = "recent_searches";
    pub const RECENT_PRODUCTS: &'static str = "recent_products";

    /// Keys owned by the session manager, in the order they are reported.
    pub const SESSION: [&'static str; 4] = [
        Self::AUTH_TOKEN,
        Self::USER_ID,
        Self::USER_NAME,
        Self::USER_EMAIL,
    ];
}
