//! Translation of raw query-string parameters into flight filters.
//!
//! Recognized parameters each take exactly one value. A recognized parameter
//! with zero or several values, or a `gate` that is not an integer, makes the
//! whole query unsatisfiable: the caller returns an empty result without
//! touching storage. Unknown parameters are ignored.

use flights_sdk::{Flight, QueryParams};

pub const FLIGHT_NUMBER: &str = "flightNumber";
pub const DEPARTURE_AIRPORT_IATA: &str = "departureAirportIata";
pub const ARRIVAL_AIRPORT_IATA: &str = "arrivalAirportIata";
pub const AIRLINE: &str = "airline";
pub const GATE: &str = "gate";

/// A single filter. String filters match case-insensitively as substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightPredicate {
    FlightNumber(String),
    DepartureIata(String),
    ArrivalIata(String),
    Airline(String),
    Gate(i32),
}

impl FlightPredicate {
    #[must_use]
    pub fn matches(&self, flight: &Flight) -> bool {
        match self {
            Self::FlightNumber(needle) => contains_ignore_case(&flight.flight_number, needle),
            Self::DepartureIata(needle) => {
                contains_ignore_case(&flight.departure_airport.iata_code, needle)
            }
            Self::ArrivalIata(needle) => {
                contains_ignore_case(&flight.arrival_airport.iata_code, needle)
            }
            Self::Airline(needle) => contains_ignore_case(&flight.airline, needle),
            Self::Gate(gate) => flight.gate == *gate,
        }
    }
}

/// Result of translating a parameter map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    /// No usable filter; every record qualifies.
    MatchAll,
    /// Conjunction of predicates, never empty.
    Filter(Vec<FlightPredicate>),
    /// At least one parameter was malformed; nothing qualifies.
    NoMatch,
}

impl Criteria {
    #[must_use]
    pub fn matches(&self, flight: &Flight) -> bool {
        match self {
            Self::MatchAll => true,
            Self::Filter(predicates) => predicates.iter().all(|p| p.matches(flight)),
            Self::NoMatch => false,
        }
    }
}

/// Build criteria from a multi-valued parameter map.
#[must_use]
pub fn build_criteria(params: &QueryParams) -> Criteria {
    let mut predicates = Vec::new();

    for (name, values) in params {
        let Some(kind) = ParamKind::parse(name) else {
            tracing::debug!(param = %name, "Ignoring unknown query parameter");
            continue;
        };

        let [value] = values.as_slice() else {
            tracing::debug!(
                param = %name,
                count = values.len(),
                "Query parameter must have exactly one value"
            );
            return Criteria::NoMatch;
        };

        match kind.predicate(value) {
            Some(predicate) => predicates.push(predicate),
            None => {
                tracing::debug!(param = %name, value = %value, "Malformed query parameter");
                return Criteria::NoMatch;
            }
        }
    }

    if predicates.is_empty() {
        Criteria::MatchAll
    } else {
        Criteria::Filter(predicates)
    }
}

#[derive(Debug, Clone, Copy)]
enum ParamKind {
    FlightNumber,
    DepartureIata,
    ArrivalIata,
    Airline,
    Gate,
}

impl ParamKind {
    fn parse(name: &str) -> Option<Self> {
        match name {
            FLIGHT_NUMBER => Some(Self::FlightNumber),
            DEPARTURE_AIRPORT_IATA => Some(Self::DepartureIata),
            ARRIVAL_AIRPORT_IATA => Some(Self::ArrivalIata),
            AIRLINE => Some(Self::Airline),
            GATE => Some(Self::Gate),
            _ => None,
        }
    }

    fn predicate(self, value: &str) -> Option<FlightPredicate> {
        let predicate = match self {
            Self::FlightNumber => FlightPredicate::FlightNumber(value.to_owned()),
            Self::DepartureIata => FlightPredicate::DepartureIata(value.to_owned()),
            Self::ArrivalIata => FlightPredicate::ArrivalIata(value.to_owned()),
            Self::Airline => FlightPredicate::Airline(value.to_owned()),
            Self::Gate => FlightPredicate::Gate(value.parse().ok()?),
        };
        Some(predicate)
    }
}

/// Case folding shared by in-memory matching and the stored search columns.
#[must_use]
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}
