//! Fixed protocol values for the webhook and the broker API
//!
//! Anything an operator may want to change lives in `config`; these are the
//! values the relay contract pins down.

use std::time::Duration;

/// Webhook / alert-message constants
pub mod alert {
    /// Asset used when the alert message carries no `ASSET:` token
    pub const DEFAULT_ASSET: &str = "EURUSD";

    /// Every relayed order expires after one minute
    pub const TRADE_DURATION_SECS: u32 = 60;

    pub const KEY_TYPE: &str = "TYPE";
    pub const KEY_AMOUNT: &str = "AMOUNT";
    pub const KEY_ASSET: &str = "ASSET";

    /// Martingale ladder the upstream alert script is expected to emit
    pub const DEFAULT_MARTINGALE_LEVELS: [f64; 5] = [1.0, 3.0, 7.0, 16.0, 35.0];
}

/// Broker API constants
pub mod broker {
    use super::*;

    pub const DEFAULT_BASE_URL: &str = "https://po.trade/api";

    /// Credential value shipped in sample configs; treated as "not configured"
    pub const SSID_PLACEHOLDER: &str = "YOUR_PO_SSID_HERE";

    pub const INSTRUMENTS_PATH: &str = "/spot/instruments";
    pub const OPEN_TRADE_PATH: &str = "/trading/open-trade";

    /// Applies to the catalog fetch and the order submission independently
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    pub const ORDER_TYPE_BINARY: &str = "binary";

    /// Value of `status` in an order response that marks an accepted trade
    pub const SUCCESS_STATUS: &str = "success";

    pub const BALANCE_TYPE_PRACTICE: u8 = 1;
    pub const BALANCE_TYPE_REAL: u8 = 2;
}

/// HTTP server constants
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 5000;
    pub const DEFAULT_WEBHOOK_PATH: &str = "/webhook";
    pub const HEALTH_PATH: &str = "/health";

    pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
}

/// Environment variables read at startup
pub mod env {
    pub const CONFIG_PATH: &str = "RELAY_CONFIG";
    pub const SSID: &str = "PO_SSID";
    pub const ACCOUNT_TYPE: &str = "PO_ACCOUNT_TYPE";
    pub const BASE_URL: &str = "PO_API_BASE_URL";
    pub const HOST: &str = "RELAY_HOST";
    pub const PORT: &str = "RELAY_PORT";
}
