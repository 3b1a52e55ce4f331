#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use cotacao::market_data::CoinGeckoPriceSource;
use cotacao::quote::QuoteService;
use cotacao::volume::FixedRandomSource;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PRICE_PATH: &str = "/simple/price";

/// Mock server answering every simple price request with `body`.
pub async fn price_server(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRICE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

pub fn price_source(server: &MockServer) -> CoinGeckoPriceSource {
    CoinGeckoPriceSource::new()
        .with_base_url(format!("{}{}", server.uri(), PRICE_PATH))
        .with_timeout(Duration::from_millis(500))
}

pub fn quote_service(server: &MockServer, volumes: &[i64]) -> QuoteService {
    QuoteService::new(
        Arc::new(price_source(server)),
        Arc::new(FixedRandomSource::new(volumes.to_vec())),
    )
}
