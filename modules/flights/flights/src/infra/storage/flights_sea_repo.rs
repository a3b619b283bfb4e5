use async_trait::async_trait;
use flights_sdk::Flight;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::domain::criteria::{FlightPredicate, fold_case};
use crate::domain::error::DomainError;
use crate::domain::repo::FlightsRepository;
use crate::infra::storage::criteria_mapper::to_condition;
use crate::infra::storage::entity::{ActiveModel as FlightAM, Column, Entity as FlightEntity};

/// ORM-based implementation of the `FlightsRepository` trait.
#[derive(Clone, Default)]
pub struct FlightsSeaRepo;

impl FlightsSeaRepo {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FlightsRepository for FlightsSeaRepo {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Flight>, DomainError> {
        let found = FlightEntity::find_by_id(id).one(conn).await?;
        Ok(found.map(Into::into))
    }

    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        predicates: &[FlightPredicate],
    ) -> Result<Vec<Flight>, DomainError> {
        let rows = FlightEntity::find()
            .filter(to_condition(predicates))
            .order_by_asc(Column::Id)
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_after<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        after: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<Flight>, DomainError> {
        let mut query = FlightEntity::find();
        if let Some(after) = after {
            query = query.filter(Column::Id.gt(after));
        }
        let rows = query
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        flight: Flight,
    ) -> Result<Flight, DomainError> {
        let m = FlightAM::from(&flight);
        let _ = m.insert(conn).await?;
        Ok(flight)
    }

    async fn replace_if_version<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        flight: &Flight,
        expected_version: i32,
    ) -> Result<bool, DomainError> {
        let result = FlightEntity::update_many()
            .col_expr(Column::FlightNumber, Expr::value(flight.flight_number.clone()))
            .col_expr(
                Column::DepartureIata,
                Expr::value(flight.departure_airport.iata_code.clone()),
            )
            .col_expr(
                Column::DepartureName,
                Expr::value(flight.departure_airport.name.clone()),
            )
            .col_expr(
                Column::DepartureCountry,
                Expr::value(flight.departure_airport.country.clone()),
            )
            .col_expr(
                Column::ArrivalIata,
                Expr::value(flight.arrival_airport.iata_code.clone()),
            )
            .col_expr(
                Column::ArrivalName,
                Expr::value(flight.arrival_airport.name.clone()),
            )
            .col_expr(
                Column::ArrivalCountry,
                Expr::value(flight.arrival_airport.country.clone()),
            )
            .col_expr(Column::DepartureTime, Expr::value(flight.departure_time))
            .col_expr(Column::ArrivalTime, Expr::value(flight.arrival_time))
            .col_expr(Column::Gate, Expr::value(flight.gate))
            .col_expr(Column::AircraftId, Expr::value(flight.aircraft_id))
            .col_expr(Column::Airline, Expr::value(flight.airline.clone()))
            .col_expr(
                Column::Status,
                Expr::value(flight.status.map(|s| s.code().to_owned())),
            )
            .col_expr(
                Column::FlightNumberLc,
                Expr::value(fold_case(&flight.flight_number)),
            )
            .col_expr(
                Column::DepartureIataLc,
                Expr::value(fold_case(&flight.departure_airport.iata_code)),
            )
            .col_expr(
                Column::ArrivalIataLc,
                Expr::value(fold_case(&flight.arrival_airport.iata_code)),
            )
            .col_expr(Column::AirlineLc, Expr::value(fold_case(&flight.airline)))
            .col_expr(Column::UpdatedAt, Expr::value(flight.updated_at))
            .col_expr(Column::Version, Expr::col(Column::Version).add(1))
            .filter(Column::Id.eq(flight.id))
            .filter(Column::Version.eq(expected_version))
            .exec(conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<u64, DomainError> {
        let result = FlightEntity::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected)
    }

    async fn exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let count = FlightEntity::find()
            .filter(Column::Id.eq(id))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn count<C: ConnectionTrait + Send + Sync>(&self, conn: &C) -> Result<u64, DomainError> {
        Ok(FlightEntity::find().count(conn).await?)
    }
}
