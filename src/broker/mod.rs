pub mod http;
pub mod relay;
pub mod traits;
pub mod types;

pub use http::HttpBrokerClient;
pub use relay::{TradeReceipt, TradeRelay};
pub use traits::BrokerTransport;
