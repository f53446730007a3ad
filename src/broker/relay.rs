//! Trade relay: credential check → catalog fetch → instrument lookup →
//! payload build → order submission. The first failing step ends the call.

use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use super::{
    traits::BrokerTransport,
    types::{BrokerDirection, InstrumentId, OrderPayload},
};

use crate::alert::TradeIntent;
use crate::config::{AccountMode, BrokerConfig, SessionCredential};
use crate::constants::broker::ORDER_TYPE_BINARY;
use crate::error::{RelayError, RelayResult};

/// What the broker accepted
#[derive(Clone, Debug)]
pub struct TradeReceipt {
    pub asset: String,
    pub instrument_id: InstrumentId,
    pub direction: BrokerDirection,
    pub amount: f64,
    pub response: Value,
}

#[derive(Clone)]
pub struct TradeRelay {
    transport: Arc<dyn BrokerTransport>,
    ssid: SessionCredential,
    account_mode: AccountMode,
}

impl TradeRelay {
    pub fn new(config: &BrokerConfig, transport: Arc<dyn BrokerTransport>) -> Self {
        Self {
            transport,
            ssid: config.ssid.clone(),
            account_mode: config.account_mode,
        }
    }

    pub fn account_mode(&self) -> AccountMode {
        self.account_mode
    }

    pub async fn execute(&self, intent: &TradeIntent) -> RelayResult<TradeReceipt> {
        self.submit(&intent.asset, intent.amount, &intent.direction, intent.duration_secs)
            .await
    }

    /// Opens one binary trade. At most one catalog fetch and one order
    /// submission; nothing is retried or deduplicated.
    pub async fn submit(
        &self,
        asset: &str,
        amount: f64,
        direction: &str,
        duration_secs: u32,
    ) -> RelayResult<TradeReceipt> {
        if !self.ssid.is_configured() {
            error!("❌ SSID not configured, trade cancelled");
            return Err(RelayError::NotConfigured);
        }

        let instrument_id = self.resolve_instrument(asset).await?;

        let payload = self.build_payload(instrument_id, amount, direction, duration_secs);
        info!("📤 Payload to send: {}", serde_json::to_string(&payload).unwrap_or_default());

        let response = match self.transport.open_trade(&payload).await {
            Ok(r) => r,
            Err(e) => {
                error!("❌ Network/API error submitting order: {}", e);
                return Err(e);
            }
        };
        info!("📥 {} response: {}", self.transport.name(), response.raw);

        if !response.is_success() {
            let message = response
                .message()
                .unwrap_or("Unknown error opening trade")
                .to_string();
            error!("❌ Broker rejected order: {}", message);
            return Err(RelayError::BrokerRejected {
                message,
                response: response.raw,
            });
        }

        info!(
            "✅ {} order of ${} sent successfully for {}",
            direction, amount, asset
        );

        Ok(TradeReceipt {
            asset: asset.to_string(),
            instrument_id: payload.instrument_id,
            direction: payload.direction,
            amount,
            response: response.raw,
        })
    }

    async fn resolve_instrument(&self, asset: &str) -> RelayResult<InstrumentId> {
        let catalog = match self.transport.fetch_instruments().await {
            Ok(c) => c,
            Err(e) => {
                error!("❌ Error fetching instrument list: {}", e);
                return Err(e);
            }
        };

        match catalog.resolve(asset) {
            Some(id) => Ok(id.clone()),
            None => {
                error!(
                    "❌ Asset '{}' not found or inactive ({} instruments listed)",
                    asset,
                    catalog.len()
                );
                Err(RelayError::InstrumentNotFound {
                    symbol: asset.to_string(),
                })
            }
        }
    }

    pub fn build_payload(
        &self,
        instrument_id: InstrumentId,
        amount: f64,
        direction: &str,
        duration_secs: u32,
    ) -> OrderPayload {
        OrderPayload {
            instrument_id,
            period: duration_secs,
            amount,
            type_: ORDER_TYPE_BINARY.to_string(),
            direction: BrokerDirection::from_signal(direction),
            balance_type: self.account_mode.balance_type(),
        }
    }
}
