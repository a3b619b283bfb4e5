//! Demo data for development setups.

use flights_sdk::{Airport, Flight, FlightStatus, NewFlight};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repo::FlightsRepository;

/// Insert the demo flights unless the table already holds data.
///
/// Returns the number of inserted flights.
///
/// # Errors
/// Returns a database error if counting or inserting fails.
pub async fn seed_demo_flights<R, C>(repo: &R, conn: &C) -> Result<u64, DomainError>
where
    R: FlightsRepository,
    C: ConnectionTrait + Send + Sync,
{
    if repo.count(conn).await? > 0 {
        tracing::debug!("Flights table not empty, skipping demo data");
        return Ok(0);
    }

    let now = OffsetDateTime::now_utc();
    let mut inserted = 0;
    for (n, data) in (1_u128..).zip(demo_flights()) {
        repo.insert(conn, Flight::from_new(Uuid::from_u128(n), 0, data, now))
            .await?;
        inserted += 1;
    }

    tracing::info!(inserted, "Seeded demo flights");
    Ok(inserted)
}

fn atlanta() -> Airport {
    Airport::new(
        "ATL",
        "Hartsfield-Jackson Atlanta International Airport",
        "United States of America",
    )
}

fn frankfurt() -> Airport {
    Airport::new("FRA", "Frankfurt Airport", "Germany")
}

fn los_angeles() -> Airport {
    Airport::new(
        "LAX",
        "Los Angeles International Airport",
        "United States of America",
    )
}

fn demo_flights() -> Vec<NewFlight> {
    let aircraft = Uuid::from_u128(1);
    vec![
        NewFlight {
            flight_number: "AB0D2".to_owned(),
            departure_airport: atlanta(),
            arrival_airport: frankfurt(),
            departure_time: datetime!(2030-02-27 14:48 UTC),
            arrival_time: datetime!(2030-02-28 05:48 UTC),
            gate: 4,
            aircraft_id: aircraft,
            airline: "Easy Jet".to_owned(),
            status: Some(FlightStatus::GateOpen),
        },
        NewFlight {
            flight_number: "CG201".to_owned(),
            departure_airport: Airport::new("PEK", "Beijing Capital International Airport", "China"),
            arrival_airport: frankfurt(),
            departure_time: datetime!(2030-06-27 22:48 UTC),
            arrival_time: datetime!(2030-06-28 05:20 UTC),
            gate: 4,
            aircraft_id: aircraft,
            airline: "Turkish Airlines".to_owned(),
            status: Some(FlightStatus::GateOpen),
        },
        NewFlight {
            flight_number: "NL0D2".to_owned(),
            departure_airport: atlanta(),
            arrival_airport: los_angeles(),
            departure_time: datetime!(2030-02-27 14:48 UTC),
            arrival_time: datetime!(2030-02-27 19:48 UTC),
            gate: 4,
            aircraft_id: aircraft,
            airline: "Lufthansa".to_owned(),
            status: Some(FlightStatus::GateOpen),
        },
        NewFlight {
            flight_number: "NL0D2".to_owned(),
            departure_airport: Airport::new(
                "DXB",
                "Dubai International Airport",
                "United Arab Emirates",
            ),
            arrival_airport: los_angeles(),
            departure_time: datetime!(2030-05-01 09:48 UTC),
            arrival_time: datetime!(2030-05-01 23:48 UTC),
            gate: 3,
            aircraft_id: aircraft,
            airline: "Lufthansa".to_owned(),
            status: Some(FlightStatus::GateOpen),
        },
        NewFlight {
            flight_number: "AB0D2".to_owned(),
            departure_airport: atlanta(),
            arrival_airport: frankfurt(),
            departure_time: datetime!(2030-03-03 14:48 UTC),
            arrival_time: datetime!(2030-03-03 23:15 UTC),
            gate: 4,
            aircraft_id: aircraft,
            airline: "Easy Jet".to_owned(),
            status: Some(FlightStatus::Departed),
        },
    ]
}
