//! Signal Relay - forwards charting-platform webhook alerts to a binary-options broker
//!
//! An alert such as `TYPE:BUY,AMOUNT:3.0,ASSET:GBPUSD` is parsed into a
//! trade intent, the asset is resolved against the broker's live instrument
//! catalog and one order is opened with the configured session credential.

pub mod alert;
pub mod api;
pub mod broker;
pub mod config;
pub mod constants;
pub mod error;

// Re-export commonly used types
pub use alert::TradeIntent;
pub use api::{build_router, run_server, AppState};
pub use broker::{BrokerTransport, HttpBrokerClient, TradeReceipt, TradeRelay};
pub use config::{AccountMode, AppConfig, SessionCredential};
pub use error::{AlertError, ApiError, ConfigError, RelayError};

#[cfg(test)]
mod config_tests;
