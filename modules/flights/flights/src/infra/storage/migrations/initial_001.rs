use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => {
                r"
CREATE TABLE IF NOT EXISTS flights (
    id UUID PRIMARY KEY NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    flight_number VARCHAR(32) NOT NULL,
    departure_iata CHAR(3) NOT NULL,
    departure_name VARCHAR(255) NOT NULL,
    departure_country VARCHAR(255) NOT NULL,
    arrival_iata CHAR(3) NOT NULL,
    arrival_name VARCHAR(255) NOT NULL,
    arrival_country VARCHAR(255) NOT NULL,
    departure_time TIMESTAMPTZ NOT NULL,
    arrival_time TIMESTAMPTZ NOT NULL,
    gate INTEGER NOT NULL,
    aircraft_id UUID NOT NULL,
    airline VARCHAR(255) NOT NULL,
    status CHAR(2),
    flight_number_lc TEXT NOT NULL,
    departure_iata_lc TEXT NOT NULL,
    arrival_iata_lc TEXT NOT NULL,
    airline_lc TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_flights_flight_number ON flights(flight_number);
                "
            }
            sea_orm::DatabaseBackend::MySql => {
                r"
CREATE TABLE IF NOT EXISTS flights (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    version INT NOT NULL DEFAULT 0,
    flight_number VARCHAR(32) NOT NULL,
    departure_iata CHAR(3) NOT NULL,
    departure_name VARCHAR(255) NOT NULL,
    departure_country VARCHAR(255) NOT NULL,
    arrival_iata CHAR(3) NOT NULL,
    arrival_name VARCHAR(255) NOT NULL,
    arrival_country VARCHAR(255) NOT NULL,
    departure_time TIMESTAMP NOT NULL,
    arrival_time TIMESTAMP NOT NULL,
    gate INT NOT NULL,
    aircraft_id VARCHAR(36) NOT NULL,
    airline VARCHAR(255) NOT NULL,
    status CHAR(2),
    flight_number_lc TEXT NOT NULL,
    departure_iata_lc TEXT NOT NULL,
    arrival_iata_lc TEXT NOT NULL,
    airline_lc TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    KEY idx_flights_flight_number (flight_number)
);
                "
            }
            sea_orm::DatabaseBackend::Sqlite => {
                r"
CREATE TABLE IF NOT EXISTS flights (
    id TEXT PRIMARY KEY NOT NULL,
    version INTEGER NOT NULL DEFAULT 0,
    flight_number TEXT NOT NULL,
    departure_iata TEXT NOT NULL,
    departure_name TEXT NOT NULL,
    departure_country TEXT NOT NULL,
    arrival_iata TEXT NOT NULL,
    arrival_name TEXT NOT NULL,
    arrival_country TEXT NOT NULL,
    departure_time TEXT NOT NULL,
    arrival_time TEXT NOT NULL,
    gate INTEGER NOT NULL,
    aircraft_id TEXT NOT NULL,
    airline TEXT NOT NULL,
    status TEXT,
    flight_number_lc TEXT NOT NULL,
    departure_iata_lc TEXT NOT NULL,
    arrival_iata_lc TEXT NOT NULL,
    airline_lc TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_flights_flight_number ON flights(flight_number);
                "
            }
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        conn.execute_unprepared("DROP TABLE IF EXISTS flights;")
            .await?;
        Ok(())
    }
}
