#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Deletion notices posted to the mail gateway.

mod support;

use flights::config::NotificationsConfig;
use flights::domain::ports::Notifier;
use flights::infra::notify::HttpMailNotifier;
use flights_sdk::Flight;
use httpmock::prelude::*;
use time::macros::datetime;
use uuid::Uuid;

fn flight() -> Flight {
    Flight::from_new(
        Uuid::from_u128(42),
        2,
        support::sample_flight("AB0D2"),
        datetime!(2099-01-01 0:00 UTC),
    )
}

fn notifier(server: &MockServer) -> HttpMailNotifier {
    HttpMailNotifier::new(
        reqwest::Client::new(),
        &format!("http://localhost:{}/mail", server.port()),
        &NotificationsConfig::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn posts_json_mail() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/mail")
            .header("content-type", "application/json");
        then.status(202);
    });

    notifier(&server).flight_deleted(&flight()).await.unwrap();
    mock.assert_calls(1);
}

#[tokio::test]
async fn gateway_errors_are_reported() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/mail");
        then.status(500);
    });

    let err = notifier(&server).flight_deleted(&flight()).await.unwrap_err();
    assert!(err.to_string().contains("mail delivery failed"));
    mock.assert_calls(1);
}

#[test]
fn rejects_invalid_endpoint() {
    assert!(
        HttpMailNotifier::new(
            reqwest::Client::new(),
            "not a url",
            &NotificationsConfig::default()
        )
        .is_err()
    );
}
