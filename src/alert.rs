//! Alert-message parsing
//!
//! The charting platform posts `{"alert_message": "TYPE:BUY,AMOUNT:3.0,ASSET:GBPUSD"}`.
//! This module turns that body into a typed [`TradeIntent`] or an [`AlertError`].

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::constants::alert::{KEY_AMOUNT, KEY_ASSET, KEY_TYPE, TRADE_DURATION_SECS};
use crate::error::AlertError;

/// One trade derived from one alert. Lives for the duration of a request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TradeIntent {
    pub asset: String,
    /// Upper-cased `TYPE` value; expected BUY or SELL but not restricted
    pub direction: String,
    pub amount: f64,
    pub duration_secs: u32,
}

impl TradeIntent {
    pub fn is_known_direction(&self) -> bool {
        matches!(self.direction.as_str(), "BUY" | "SELL")
    }
}

impl fmt::Display for TradeIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type={}, Amount={}, Asset={}, Duration={}s",
            self.direction, self.amount, self.asset, self.duration_secs
        )
    }
}

/// Extracts `alert_message` from a raw webhook body. The body is parsed as
/// JSON whatever its content type.
pub fn extract_alert_message(body: &[u8]) -> Result<String, AlertError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| AlertError::InvalidJson(e.to_string()))?;

    let object = value.as_object().ok_or(AlertError::NotAnObject)?;

    match object.get("alert_message") {
        Some(Value::String(msg)) if !msg.trim().is_empty() => Ok(msg.clone()),
        _ => Err(AlertError::MissingAlertMessage),
    }
}

/// Parses `KEY:VALUE` tokens separated by commas.
///
/// Recognized keys are `TYPE`, `AMOUNT` and `ASSET`; anything else is ignored
/// and a repeated key overrides the earlier one. Segments without a colon are
/// skipped. An unparsable `AMOUNT` fails immediately.
pub fn parse_alert_message(message: &str, default_asset: &str) -> Result<TradeIntent, AlertError> {
    let mut direction: Option<String> = None;
    let mut amount: Option<f64> = None;
    let mut asset = default_asset.to_string();

    for segment in message.split(',') {
        let Some((key, value)) = segment.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            KEY_TYPE => direction = Some(value.to_uppercase()).filter(|d| !d.is_empty()),
            KEY_AMOUNT => amount = Some(parse_amount(value)?),
            KEY_ASSET if !value.is_empty() => asset = value.to_uppercase(),
            _ => {}
        }
    }

    let direction = direction.ok_or_else(|| AlertError::MissingField {
        field: KEY_TYPE,
        message: message.to_string(),
    })?;
    let amount = amount.ok_or_else(|| AlertError::MissingField {
        field: KEY_AMOUNT,
        message: message.to_string(),
    })?;

    Ok(TradeIntent {
        asset,
        direction,
        amount,
        duration_secs: TRADE_DURATION_SECS,
    })
}

fn parse_amount(raw: &str) -> Result<f64, AlertError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(AlertError::InvalidAmount(raw.to_string())),
    }
}
