use async_trait::async_trait;

use crate::error::RelayResult;

use super::types::{BrokerResponse, InstrumentCatalog, OrderPayload};

/// The two broker calls the relay makes. Each is issued once per trade and
/// never retried.
#[async_trait]
pub trait BrokerTransport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Errors are reported as `RelayError::CatalogFetch`.
    async fn fetch_instruments(&self) -> RelayResult<InstrumentCatalog>;

    /// Returns the decoded body of any 2xx response, whether or not the broker
    /// accepted the trade. Other failures are `RelayError::OrderSubmission`.
    async fn open_trade(&self, payload: &OrderPayload) -> RelayResult<BrokerResponse>;
}
