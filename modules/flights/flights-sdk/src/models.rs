use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Raw query-string parameters: every name maps to all of its values in
/// request order.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// An airport embedded in a flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Airport {
    /// Three uppercase letters, e.g. `FRA`.
    pub iata_code: String,
    pub name: String,
    pub country: String,
}

impl Airport {
    pub fn new(
        iata_code: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            iata_code: iata_code.into(),
            name: name.into(),
            country: country.into(),
        }
    }
}

/// Operational status of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightStatus {
    Canceled,
    GateOpen,
    GateClosed,
    Boarding,
    Boarded,
    Departed,
    Landed,
}

impl FlightStatus {
    pub const ALL: [Self; 7] = [
        Self::Canceled,
        Self::GateOpen,
        Self::GateClosed,
        Self::Boarding,
        Self::Boarded,
        Self::Departed,
        Self::Landed,
    ];

    /// Two-letter wire code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Canceled => "CC",
            Self::GateOpen => "GO",
            Self::GateClosed => "GC",
            Self::Boarding => "BG",
            Self::Boarded => "BD",
            Self::Departed => "DP",
            Self::Landed => "LD",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Canceled => "CANCELED",
            Self::GateOpen => "GATE_OPEN",
            Self::GateClosed => "GATE_CLOSED",
            Self::Boarding => "BOARDING",
            Self::Boarded => "BOARDED",
            Self::Departed => "DEPARTED",
            Self::Landed => "LANDED",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Accepted spellings: code, lowercase code, name, lowercase name.
static STATUS_LOOKUP: LazyLock<HashMap<String, FlightStatus>> = LazyLock::new(|| {
    let mut lookup = HashMap::with_capacity(FlightStatus::ALL.len() * 4);
    for status in FlightStatus::ALL {
        lookup.insert(status.code().to_owned(), status);
        lookup.insert(status.code().to_lowercase(), status);
        lookup.insert(status.name().to_owned(), status);
        lookup.insert(status.name().to_lowercase(), status);
    }
    lookup
});

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{value}' is not a valid flight status")]
pub struct StatusParseError {
    pub value: String,
}

impl FromStr for FlightStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUS_LOOKUP
            .get(s)
            .copied()
            .ok_or_else(|| StatusParseError {
                value: s.to_owned(),
            })
    }
}

/// Client-supplied flight data. Carries neither id nor version; storage
/// assigns both.
#[derive(Debug, Clone)]
pub struct NewFlight {
    pub flight_number: String,
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    pub departure_time: OffsetDateTime,
    pub arrival_time: OffsetDateTime,
    pub gate: i32,
    pub aircraft_id: Uuid,
    pub airline: String,
    pub status: Option<FlightStatus>,
}

/// A persisted flight.
///
/// Equality and hashing only look at `flight_number` and `departure_time`:
/// two values describing the same scheduled departure are the same flight
/// regardless of id or version.
#[derive(Debug, Clone)]
pub struct Flight {
    pub id: Uuid,
    pub version: i32,
    pub flight_number: String,
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    pub departure_time: OffsetDateTime,
    pub arrival_time: OffsetDateTime,
    pub gate: i32,
    pub aircraft_id: Uuid,
    /// Resolved from the aircraft service on read, never stored.
    pub aircraft_type: Option<String>,
    pub airline: String,
    pub status: Option<FlightStatus>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Flight {
    /// Build a stored flight from client data.
    #[must_use]
    pub fn from_new(id: Uuid, version: i32, data: NewFlight, now: OffsetDateTime) -> Self {
        Self {
            id,
            version,
            flight_number: data.flight_number,
            departure_airport: data.departure_airport,
            arrival_airport: data.arrival_airport,
            departure_time: data.departure_time,
            arrival_time: data.arrival_time,
            gate: data.gate,
            aircraft_id: data.aircraft_id,
            aircraft_type: None,
            airline: data.airline,
            status: data.status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl PartialEq for Flight {
    fn eq(&self, other: &Self) -> bool {
        self.flight_number == other.flight_number && self.departure_time == other.departure_time
    }
}

impl Eq for Flight {}

impl Hash for Flight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.flight_number.hash(state);
        self.departure_time.hash(state);
    }
}

/// Outcome of a delete: how many records were removed (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionOutcome {
    pub deleted_count: u64,
}

/// A single failed constraint, reported as property path plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub property: String,
    pub message: String,
}

impl Violation {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}
