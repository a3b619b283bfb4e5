#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Aircraft lookups over HTTP, including the fallback and the breaker.

use flights::config::{AircraftConfig, CircuitBreakerSettings};
use flights::domain::ports::{AircraftCatalog, FALLBACK_AIRCRAFT_TYPE};
use flights::infra::aircraft::HttpAircraftCatalog;
use flights::infra::resilience::CircuitState;
use httpmock::prelude::*;
use uuid::Uuid;

const AIRCRAFT_ID: Uuid = Uuid::from_u128(1);

fn catalog(server: &MockServer, breaker: CircuitBreakerSettings) -> HttpAircraftCatalog {
    let cfg = AircraftConfig {
        base_url: format!("http://localhost:{}/aircraft", server.port()),
        circuit_breaker: breaker,
        ..AircraftConfig::default()
    };
    HttpAircraftCatalog::new(reqwest::Client::new(), &cfg).unwrap()
}

#[tokio::test]
async fn resolves_type_with_basic_credentials() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/aircraft/{AIRCRAFT_ID}"))
            // admin:p
            .header("authorization", "Basic YWRtaW46cA==");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"00000000-0000-0000-0000-000000000001","type":"A380"}"#);
    });

    let aircraft = catalog(&server, CircuitBreakerSettings::default());
    assert_eq!(aircraft.aircraft_type(AIRCRAFT_ID).await, "A380");
    mock.assert_calls(1);
    assert_eq!(aircraft.breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn server_error_falls_back() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(format!("/aircraft/{AIRCRAFT_ID}"));
        then.status(500);
    });

    let aircraft = catalog(&server, CircuitBreakerSettings::default());
    assert_eq!(aircraft.aircraft_type(AIRCRAFT_ID).await, FALLBACK_AIRCRAFT_TYPE);
    mock.assert_calls(1);
}

#[tokio::test]
async fn unexpected_body_falls_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/aircraft/{AIRCRAFT_ID}"));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"model":"A380"}"#);
    });

    let aircraft = catalog(&server, CircuitBreakerSettings::default());
    assert_eq!(aircraft.aircraft_type(AIRCRAFT_ID).await, FALLBACK_AIRCRAFT_TYPE);
}

#[tokio::test]
async fn open_circuit_stops_calling_downstream() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(format!("/aircraft/{AIRCRAFT_ID}"));
        then.status(503);
    });

    let settings = CircuitBreakerSettings {
        failure_threshold: 2,
        ..CircuitBreakerSettings::default()
    };
    let aircraft = catalog(&server, settings);

    for _ in 0..4 {
        assert_eq!(aircraft.aircraft_type(AIRCRAFT_ID).await, FALLBACK_AIRCRAFT_TYPE);
    }

    mock.assert_calls(2);
    let stats = aircraft.breaker().stats();
    assert_eq!(stats.state, CircuitState::Open);
    assert_eq!(stats.rejected_calls, 2);
}
