pub mod criteria_mapper;
pub mod entity;
pub mod flights_sea_repo;
pub mod mapper;
pub mod migrations;
pub mod seed;

pub use flights_sea_repo::FlightsSeaRepo;
