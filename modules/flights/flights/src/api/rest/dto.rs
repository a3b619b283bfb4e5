//! Wire representations of flights.
//!
//! Field names are camelCase. Neither `id` nor `version` appear in bodies:
//! the id travels in links and the version in the `ETag` header.

use flights_sdk::{Airport, Flight, FlightStatus, NewFlight, Violation};
use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AirportDto {
    pub iata_code: String,
    pub name: String,
    pub country: String,
}

impl From<AirportDto> for Airport {
    fn from(a: AirportDto) -> Self {
        Self {
            iata_code: a.iata_code,
            name: a.name,
            country: a.country,
        }
    }
}

impl From<Airport> for AirportDto {
    fn from(a: Airport) -> Self {
        Self {
            iata_code: a.iata_code,
            name: a.name,
            country: a.country,
        }
    }
}

/// REST DTO for creating or replacing a flight.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightReq {
    pub flight_number: String,
    pub departure_airport: AirportDto,
    pub arrival_airport: AirportDto,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub departure_time: OffsetDateTime,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub arrival_time: OffsetDateTime,
    pub gate: i32,
    pub aircraft_id: Uuid,
    pub airline: String,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: Option<FlightStatus>,
}

impl From<FlightReq> for NewFlight {
    fn from(req: FlightReq) -> Self {
        Self {
            flight_number: req.flight_number,
            departure_airport: req.departure_airport.into(),
            arrival_airport: req.arrival_airport.into(),
            departure_time: req.departure_time,
            arrival_time: req.arrival_time,
            gate: req.gate,
            aircraft_id: req.aircraft_id,
            airline: req.airline,
            status: req.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkDto {
    pub href: String,
}

/// HAL-style `_links` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinksDto {
    #[serde(rename = "self")]
    pub self_link: Option<LinkDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<LinkDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<LinkDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<LinkDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<LinkDto>,
}

/// REST DTO for a flight in responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDto {
    pub flight_number: String,
    pub departure_airport: AirportDto,
    pub arrival_airport: AirportDto,
    #[serde(with = "time::serde::rfc3339")]
    pub departure_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub arrival_time: OffsetDateTime,
    pub gate: i32,
    pub aircraft_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft_type: Option<String>,
    pub airline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(rename = "_links")]
    pub links: LinksDto,
}

impl FlightDto {
    #[must_use]
    pub fn new(flight: Flight, links: LinksDto) -> Self {
        Self {
            flight_number: flight.flight_number,
            departure_airport: flight.departure_airport.into(),
            arrival_airport: flight.arrival_airport.into(),
            departure_time: flight.departure_time,
            arrival_time: flight.arrival_time,
            gate: flight.gate,
            aircraft_id: flight.aircraft_id,
            aircraft_type: flight.aircraft_type,
            airline: flight.airline,
            status: flight.status.map(FlightStatus::code),
            links,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViolationDto {
    pub property: String,
    pub message: String,
}

impl From<&Violation> for ViolationDto {
    fn from(v: &Violation) -> Self {
        Self {
            property: v.property.clone(),
            message: v.message.clone(),
        }
    }
}

/// Parse RFC 3339, or a local date-time without offset taken as UTC.
///
/// # Errors
/// Returns the last parse error when no accepted format matches.
pub fn parse_datetime(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }
    let with_seconds =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, with_seconds) {
        return Ok(dt.assume_utc());
    }
    let minutes_only = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    PrimitiveDateTime::parse(s, minutes_only).map(PrimitiveDateTime::assume_utc)
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .map_err(|e| serde::de::Error::custom(format!("invalid date-time '{raw}': {e}")))
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<FlightStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.parse::<FlightStatus>().map_err(serde::de::Error::custom))
        .transpose()
}
