use sea_orm::entity::prelude::*;
use time::OffsetDateTime;
use uuid::Uuid;

/// One row per flight. Airports are flattened into prefixed columns and the
/// status is stored as its two-letter code.
///
/// The `*_lc` columns hold case-folded copies of the searchable fields;
/// criteria match against them because `SQLite`'s `LOWER` only folds ASCII.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "flights")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub version: i32,
    pub flight_number: String,
    pub departure_iata: String,
    pub departure_name: String,
    pub departure_country: String,
    pub arrival_iata: String,
    pub arrival_name: String,
    pub arrival_country: String,
    pub departure_time: OffsetDateTime,
    pub arrival_time: OffsetDateTime,
    pub gate: i32,
    pub aircraft_id: Uuid,
    pub airline: String,
    pub status: Option<String>,
    pub flight_number_lc: String,
    pub departure_iata_lc: String,
    pub arrival_iata_lc: String,
    pub airline_lc: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
