use flights_sdk::{Airport, Flight, FlightStatus};
use sea_orm::Set;

use crate::domain::criteria::fold_case;
use crate::infra::storage::entity::{ActiveModel, Model};

impl From<Model> for Flight {
    fn from(m: Model) -> Self {
        let status = m.status.as_deref().and_then(|code| {
            code.parse::<FlightStatus>()
                .inspect_err(|e| tracing::warn!(id = %m.id, "Ignoring stored status: {e}"))
                .ok()
        });

        Self {
            id: m.id,
            version: m.version,
            flight_number: m.flight_number,
            departure_airport: Airport {
                iata_code: m.departure_iata,
                name: m.departure_name,
                country: m.departure_country,
            },
            arrival_airport: Airport {
                iata_code: m.arrival_iata,
                name: m.arrival_name,
                country: m.arrival_country,
            },
            departure_time: m.departure_time,
            arrival_time: m.arrival_time,
            gate: m.gate,
            aircraft_id: m.aircraft_id,
            aircraft_type: None,
            airline: m.airline,
            status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<&Flight> for ActiveModel {
    fn from(f: &Flight) -> Self {
        Self {
            id: Set(f.id),
            version: Set(f.version),
            flight_number: Set(f.flight_number.clone()),
            departure_iata: Set(f.departure_airport.iata_code.clone()),
            departure_name: Set(f.departure_airport.name.clone()),
            departure_country: Set(f.departure_airport.country.clone()),
            arrival_iata: Set(f.arrival_airport.iata_code.clone()),
            arrival_name: Set(f.arrival_airport.name.clone()),
            arrival_country: Set(f.arrival_airport.country.clone()),
            departure_time: Set(f.departure_time),
            arrival_time: Set(f.arrival_time),
            gate: Set(f.gate),
            aircraft_id: Set(f.aircraft_id),
            airline: Set(f.airline.clone()),
            status: Set(f.status.map(|s| s.code().to_owned())),
            flight_number_lc: Set(fold_case(&f.flight_number)),
            departure_iata_lc: Set(fold_case(&f.departure_airport.iata_code)),
            arrival_iata_lc: Set(fold_case(&f.arrival_airport.iata_code)),
            airline_lc: Set(fold_case(&f.airline)),
            created_at: Set(f.created_at),
            updated_at: Set(f.updated_at),
        }
    }
}
