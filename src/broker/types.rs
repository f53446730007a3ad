use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::constants::broker::SUCCESS_STATUS;

/// Broker-side instrument id. Numeric on the wire today; any other JSON value
/// is kept as-is and echoed back to the broker unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstrumentId {
    Numeric(i64),
    Text(String),
    Other(Value),
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentId::Numeric(n) => write!(f, "{}", n),
            InstrumentId::Text(s) => f.write_str(s),
            InstrumentId::Other(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Instrument {
    #[serde(default)]
    pub id: Option<InstrumentId>,
    /// A non-string name never matches a symbol
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
}

/// `GET /spot/instruments` response body
///
/// Entries are decoded one by one: a malformed entry is dropped instead of
/// failing the whole catalog.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InstrumentCatalog {
    #[serde(default, deserialize_with = "lenient_instruments")]
    pub instruments: Vec<Instrument>,
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_instruments<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Instrument>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let entries = match value {
        Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

impl InstrumentCatalog {
    /// Exact, case-sensitive match on the instrument name. The first entry
    /// with that name wins; an entry without an id resolves to nothing.
    pub fn resolve(&self, symbol: &str) -> Option<&InstrumentId> {
        self.instruments
            .iter()
            .find(|i| i.name.as_deref() == Some(symbol))
            .and_then(|i| i.id.as_ref())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerDirection {
    Up,
    Down,
}

impl BrokerDirection {
    /// Exactly "BUY" maps to up; every other value maps to down.
    pub fn from_signal(direction: &str) -> Self {
        if direction == "BUY" {
            BrokerDirection::Up
        } else {
            BrokerDirection::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerDirection::Up => "up",
            BrokerDirection::Down => "down",
        }
    }
}

/// `POST /trading/open-trade` request body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub instrument_id: InstrumentId,
    pub period: u32,
    pub amount: f64,
    #[serde(rename = "type")]
    pub type_: String,
    pub direction: BrokerDirection,
    pub balance_type: u8,
}

/// Order response; only `status` and `message` are interpreted.
#[derive(Clone, Debug)]
pub struct BrokerResponse {
    pub raw: Value,
}

impl BrokerResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn is_success(&self) -> bool {
        self.raw.get("status").and_then(|v| v.as_str()) == Some(SUCCESS_STATUS)
    }

    pub fn message(&self) -> Option<&str> {
        self.raw.get("message").and_then(|v| v.as_str())
    }
}
