//! Helper functions for integration tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use uptime_monitor::{
    Endpoint, MetricsStore, Prober, TargetRegistry,
    api::{ApiConfig, ApiState, spawn_api_server},
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running API server and the store behind it
pub struct TestMonitor {
    pub addr: SocketAddr,
    pub metrics: Arc<MetricsStore>,
    pub registry: TargetRegistry,
    pub prober: Prober,
}

impl TestMonitor {
    pub fn url(&self, route: &str) -> String {
        format!("http://{}{}", self.addr, route)
    }
}

pub async fn spawn_test_monitor(targets: Vec<Endpoint>, timeout: Duration) -> TestMonitor {
    let metrics = Arc::new(MetricsStore::new().unwrap());
    let prober = Prober::new(timeout, metrics.clone()).unwrap();
    let registry = TargetRegistry::new(targets);

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(), // Random port
    };
    let addr = spawn_api_server(config, ApiState::new(registry.clone(), prober.clone()))
        .await
        .unwrap();

    TestMonitor {
        addr,
        metrics,
        registry,
        prober,
    }
}

/// Mount a GET route on the mock server answering with `status`
pub async fn mount_status(server: &MockServer, route: &str, status: u16) -> Endpoint {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;

    Endpoint::new(format!("{}{}", server.uri(), route))
}

/// Mount a GET route that answers only after `delay`
pub async fn mount_slow(server: &MockServer, route: &str, delay: Duration) -> Endpoint {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .mount(server)
        .await;

    Endpoint::new(format!("{}{}", server.uri(), route))
}

/// An endpoint nothing listens on
pub fn unreachable_endpoint() -> Endpoint {
    Endpoint::new("http://127.0.0.1:1/unreachable")
}

pub async fn get_json(url: &str) -> serde_json::Value {
    let response = reqwest::get(url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.unwrap()
}

pub async fn get_text(url: &str) -> String {
    let response = reqwest::get(url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.text().await.unwrap()
}
