#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Domain service behavior against a real `SQLite` database.

mod support;

use std::collections::HashSet;

use flights::FlightsModule;
use flights::domain::criteria::build_criteria;
use flights::domain::error::DomainError;
use flights::domain::repo::FlightsRepository;
use flights::infra::storage::FlightsSeaRepo;
use flights::infra::storage::seed::seed_demo_flights;
use flights_sdk::{FlightsApi, FlightsError, QueryParams};
use futures::TryStreamExt;
use support::{TestContext, inmem_db, los_angeles, sample_flight};
use uuid::Uuid;

fn query(pairs: &[(&str, &str)]) -> QueryParams {
    let mut params = QueryParams::new();
    for (k, v) in pairs {
        params
            .entry((*k).to_owned())
            .or_default()
            .push((*v).to_owned());
    }
    params
}

#[tokio::test]
async fn create_assigns_id_and_version_zero() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();

    let created = svc.create(sample_flight("AB0D2")).await.unwrap();
    assert_eq!(created.version, 0);
    assert_eq!(created.aircraft_type.as_deref(), Some(support::AIRCRAFT_TYPE));

    let fetched = svc.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.status, created.status);

    let again = svc.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(again.version, fetched.version);
}

#[tokio::test]
async fn create_rejects_invalid_flight_without_storing() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();

    let mut data = sample_flight("AB0D2");
    data.gate = 0;
    data.departure_airport.iata_code = "atl".to_owned();

    let err = svc.create(data).await.unwrap_err();
    let DomainError::Validation { violations } = err else {
        panic!("expected validation error, got {err:?}");
    };
    let props: HashSet<_> = violations.iter().map(|v| v.property.as_str()).collect();
    assert!(props.contains("gate"));
    assert!(props.contains("departureAirport.iataCode"));

    assert!(svc.find(&QueryParams::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn criteria_filter_flights() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();

    let mut lax = sample_flight("NL0D2");
    lax.arrival_airport = los_angeles();
    lax.airline = "Lufthansa".to_owned();
    lax.gate = 7;
    svc.create(sample_flight("AB0D2")).await.unwrap();
    svc.create(lax).await.unwrap();

    assert_eq!(svc.find(&QueryParams::new()).await.unwrap().len(), 2);

    let found = svc.find(&query(&[("flightNumber", "ab0d")])).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].flight_number, "AB0D2");

    let found = svc
        .find(&query(&[("arrivalAirportIata", "LAX"), ("gate", "7")]))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].arrival_airport, los_angeles());

    let found = svc
        .find(&query(&[("arrivalAirportIata", "FRA"), ("airline", "lufthansa")]))
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn malformed_criteria_match_nothing() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();
    svc.create(sample_flight("AB0D2")).await.unwrap();

    assert!(svc.find(&query(&[("gate", "four")])).await.unwrap().is_empty());
    assert!(
        svc.find(&query(&[("airline", "Easy"), ("airline", "Jet")]))
            .await
            .unwrap()
            .is_empty()
    );
    // Unknown keys are ignored.
    assert_eq!(svc.find(&query(&[("color", "red")])).await.unwrap().len(), 1);
}

#[tokio::test]
async fn like_wildcards_are_literal() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();
    svc.create(sample_flight("AB0D2")).await.unwrap();

    assert!(svc.find(&query(&[("flightNumber", "%")])).await.unwrap().is_empty());
    assert!(svc.find(&query(&[("flightNumber", "A_0")])).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_bumps_version_and_rejects_stale_token() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();
    let created = svc.create(sample_flight("AB0D2")).await.unwrap();
    let stored = svc.find_by_id(created.id).await.unwrap().unwrap();

    let mut data = sample_flight("AB0D2");
    data.gate = 9;
    let updated = svc.update(created.id, "0", data.clone()).await.unwrap();
    assert_eq!(updated.version, 1);
    assert_eq!(updated.gate, 9);
    assert_eq!(updated.created_at, stored.created_at);

    let err = svc.update(created.id, "0", data.clone()).await.unwrap_err();
    assert!(matches!(err, DomainError::VersionConflict { expected: 0, .. }));

    let again = svc.update(created.id, "1", data).await.unwrap();
    assert_eq!(again.version, 2);
}

#[tokio::test]
async fn update_checks_run_in_order() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();
    let created = svc.create(sample_flight("AB0D2")).await.unwrap();

    // Validation comes before everything else.
    let mut invalid = sample_flight("AB0D2");
    invalid.gate = -1;
    let err = svc.update(Uuid::now_v7(), "x", invalid).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    // Existence comes before version parsing.
    let err = svc
        .update(Uuid::now_v7(), "x", sample_flight("AB0D2"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = svc
        .update(created.id, "x", sample_flight("AB0D2"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidVersion { ref version } if version == "x"));
}

#[tokio::test]
async fn concurrent_updates_with_same_version_have_one_winner() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();
    let created = svc.create(sample_flight("AB0D2")).await.unwrap();

    let mut a = sample_flight("AB0D2");
    a.gate = 1;
    let mut b = sample_flight("AB0D2");
    b.gate = 2;

    let (ra, rb) = tokio::join!(
        svc.update(created.id, "0", a),
        svc.update(created.id, "0", b)
    );
    let wins = [ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(wins, 1);

    let stored = svc.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn delete_notifies_only_when_something_was_removed() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();
    let created = svc.create(sample_flight("AB0D2")).await.unwrap();

    let outcome = svc.delete_by_id(created.id).await.unwrap();
    assert_eq!(outcome.deleted_count, 1);
    assert_eq!(*ctx.notifier.deleted.lock(), vec![created.id]);

    let outcome = svc.delete_by_id(created.id).await.unwrap();
    assert_eq!(outcome.deleted_count, 0);
    assert_eq!(ctx.notifier.deleted.lock().len(), 1);
    assert!(svc.find_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn failing_notifier_does_not_fail_delete() {
    let db = support::inmem_db().await;
    let module = flights::FlightsModule::with_ports(
        db,
        &flights::FlightsConfig::default(),
        std::sync::Arc::new(support::FixedAircraft::default()),
        std::sync::Arc::new(support::FailingNotifier),
    )
    .await
    .unwrap();
    let svc = module.service();

    let created = svc.create(sample_flight("AB0D2")).await.unwrap();
    let outcome = svc.delete_by_id(created.id).await.unwrap();
    assert_eq!(outcome.deleted_count, 1);
}

#[tokio::test]
async fn stream_all_crosses_chunk_boundaries() {
    let cfg = flights::FlightsConfig {
        stream_chunk_size: 2,
        ..flights::FlightsConfig::default()
    };
    let ctx = TestContext::with_config(cfg).await;
    let svc = ctx.module.service();

    let mut ids = HashSet::new();
    for n in 0..5 {
        ids.insert(svc.create(sample_flight(&format!("LH{n}"))).await.unwrap().id);
    }

    let streamed: Vec<_> = svc.stream_all().try_collect().await.unwrap();
    assert_eq!(streamed.len(), 5);
    assert_eq!(streamed.iter().map(|f| f.id).collect::<HashSet<_>>(), ids);
    assert!(streamed.iter().all(|f| f.aircraft_type.is_some()));
}

#[tokio::test]
async fn aircraft_is_looked_up_once_per_distinct_id() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();
    svc.create(sample_flight("AB0D2")).await.unwrap();
    svc.create(sample_flight("AB0D3")).await.unwrap();
    ctx.aircraft.lookups.lock().clear();

    let found = svc.find(&QueryParams::new()).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(ctx.aircraft.lookups.lock().len(), 1);
}

#[tokio::test]
async fn seeding_fills_an_empty_table() {
    let cfg = flights::FlightsConfig {
        seed_demo_data: true,
        ..flights::FlightsConfig::default()
    };
    let ctx = TestContext::with_config(cfg).await;
    let svc = ctx.module.service();
    let seeded = svc.find(&QueryParams::new()).await.unwrap();
    assert_eq!(seeded.len(), 5);
    assert!(seeded.iter().all(|f| !f.id.is_nil()));
}

#[tokio::test]
async fn seeding_is_skipped_for_populated_tables() {
    let db = inmem_db().await;
    FlightsModule::migrate(&db).await.unwrap();
    let repo = FlightsSeaRepo::new();

    assert_eq!(seed_demo_flights(&repo, &db).await.unwrap(), 5);
    assert_eq!(seed_demo_flights(&repo, &db).await.unwrap(), 0);
    assert_eq!(repo.count(&db).await.unwrap(), 5);
}

#[tokio::test]
async fn stream_all_survives_deletes_between_chunks() {
    let cfg = flights::FlightsConfig {
        stream_chunk_size: 2,
        ..flights::FlightsConfig::default()
    };
    let ctx = TestContext::with_config(cfg).await;
    let svc = ctx.module.service();

    let mut created = Vec::new();
    for n in 0..5 {
        created.push(svc.create(sample_flight(&format!("LH{n}"))).await.unwrap().id);
    }
    created.sort();

    let mut stream = svc.stream_all();
    let first = stream.try_next().await.unwrap().unwrap();
    let second = stream.try_next().await.unwrap().unwrap();
    assert_eq!([first.id, second.id], [created[0], created[1]]);

    svc.delete_by_id(created[0]).await.unwrap();

    let rest: Vec<_> = stream.try_collect().await.unwrap();
    let rest: Vec<Uuid> = rest.into_iter().map(|f| f.id).collect();
    assert_eq!(rest, created[2..].to_vec());
}

#[tokio::test]
async fn non_ascii_text_filters_ignore_case() {
    let ctx = TestContext::new().await;
    let svc = ctx.module.service();

    let mut flight = sample_flight("OS0D1");
    flight.airline = "\u{d6}STERREICHISCHE".to_owned();
    let created = svc.create(flight).await.unwrap();
    svc.create(sample_flight("AB0D2")).await.unwrap();

    let found = svc
        .find(&query(&[("airline", "\u{f6}sterreich")]))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);

    let criteria = build_criteria(&query(&[("airline", "\u{f6}sterreich")]));
    assert!(criteria.matches(&found[0]));
}

#[tokio::test]
async fn local_client_maps_errors_to_sdk() {
    let ctx = TestContext::new().await;
    let client = ctx.module.client();

    let missing = Uuid::now_v7();
    let err = client.get_flight(missing).await.unwrap_err();
    assert!(matches!(err, FlightsError::NotFound { id } if id == missing));

    let created = client.create_flight(sample_flight("AB0D2")).await.unwrap();
    let err = client
        .update_flight(created.id, "7", sample_flight("AB0D2"))
        .await
        .unwrap_err();
    assert!(matches!(err, FlightsError::VersionConflict { .. }));

    let err = client
        .update_flight(created.id, "seven", sample_flight("AB0D2"))
        .await
        .unwrap_err();
    assert!(matches!(err, FlightsError::InvalidVersion { .. }));

    let outcome = client.delete_flight(created.id).await.unwrap();
    assert_eq!(outcome.deleted_count, 1);
}
