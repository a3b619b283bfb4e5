pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod hateoas;
pub mod problem;
pub mod routes;
