//! reqwest-backed broker transport.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE},
    Client, RequestBuilder,
};
use serde_json::Value;

use super::{
    traits::BrokerTransport,
    types::{BrokerResponse, InstrumentCatalog, OrderPayload},
};

use crate::config::{BrokerConfig, SessionCredential};
use crate::constants::broker::{INSTRUMENTS_PATH, OPEN_TRADE_PATH, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::{RelayError, RelayResult};

#[derive(Clone)]
pub struct HttpBrokerClient {
    client: Client,
    instruments_url: String,
    open_trade_url: String,
    ssid: SessionCredential,
}

impl HttpBrokerClient {
    pub fn new(config: &BrokerConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            instruments_url: config.endpoint(INSTRUMENTS_PATH),
            open_trade_url: config.endpoint(OPEN_TRADE_PATH),
            ssid: config.ssid.clone(),
        })
    }

    fn with_session(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(COOKIE, format!("ssid={}", self.ssid.expose()))
    }
}

#[async_trait]
impl BrokerTransport for HttpBrokerClient {
    fn name(&self) -> &'static str {
        "pocket_option"
    }

    async fn fetch_instruments(&self) -> RelayResult<InstrumentCatalog> {
        let fail = |e: String| RelayError::CatalogFetch(e);

        let resp = self
            .with_session(self.client.get(&self.instruments_url))
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| fail(e.to_string()))?;
        if !status.is_success() {
            return Err(fail(format!("HTTP {}: {}", status, text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| fail(format!("decode failed: {} (body: {})", e, text)))
    }

    async fn open_trade(&self, payload: &OrderPayload) -> RelayResult<BrokerResponse> {
        let fail = |e: String| RelayError::OrderSubmission(e);

        let resp = self
            .with_session(self.client.post(&self.open_trade_url))
            .json(payload)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| fail(e.to_string()))?;
        if !status.is_success() {
            return Err(fail(format!("HTTP {}: {}", status, text)));
        }

        let raw: Value = serde_json::from_str(&text)
            .map_err(|e| fail(format!("decode failed: {} (body: {})", e, text)))?;
        Ok(BrokerResponse::new(raw))
    }
}
