use flights_sdk::{Airport, NewFlight, Violation};
use time::OffsetDateTime;

/// Column widths of the `flights` table.
pub const MAX_FLIGHT_NUMBER_LEN: usize = 32;
pub const MAX_TEXT_LEN: usize = 255;

/// Check client-supplied flight data against its constraints.
///
/// Returns every violated constraint; an empty vector means the data is
/// valid. `now` is the reference point for the temporal rules.
#[must_use]
pub fn validate(
    flight: &NewFlight,
    now: OffsetDateTime,
    require_arrival_after_departure: bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    text(
        &mut violations,
        "flightNumber",
        &flight.flight_number,
        MAX_FLIGHT_NUMBER_LEN,
    );
    airport(&mut violations, "departureAirport", &flight.departure_airport);
    airport(&mut violations, "arrivalAirport", &flight.arrival_airport);

    if flight.departure_time < now {
        violations.push(Violation::new(
            "departureTime",
            "must be in the present or in the future",
        ));
    }
    if flight.arrival_time <= now {
        violations.push(Violation::new("arrivalTime", "must be in the future"));
    }
    if require_arrival_after_departure && flight.arrival_time <= flight.departure_time {
        violations.push(Violation::new(
            "arrivalTime",
            "must be after the departure time",
        ));
    }

    if flight.gate <= 0 {
        violations.push(Violation::new("gate", "must be greater than 0"));
    }
    text(&mut violations, "airline", &flight.airline, MAX_TEXT_LEN);

    violations
}

/// Exactly three uppercase ASCII letters.
#[must_use]
pub fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

fn airport(violations: &mut Vec<Violation>, prefix: &str, airport: &Airport) {
    let iata_property = format!("{prefix}.iataCode");
    if airport.iata_code.is_empty() {
        violations.push(Violation::new(iata_property, "must not be empty"));
    } else if !is_iata_code(&airport.iata_code) {
        violations.push(Violation::new(
            iata_property,
            "must consist of exactly 3 uppercase letters",
        ));
    }
    text(violations, &format!("{prefix}.name"), &airport.name, MAX_TEXT_LEN);
    text(violations, &format!("{prefix}.country"), &airport.country, MAX_TEXT_LEN);
}

/// Non-empty and at most `max` characters.
fn text(violations: &mut Vec<Violation>, property: &str, value: &str, max: usize) {
    if value.is_empty() {
        violations.push(Violation::new(property, "must not be empty"));
    } else if value.chars().count() > max {
        violations.push(Violation::new(
            property,
            format!("length must be at most {max} characters"),
        ));
    }
}
