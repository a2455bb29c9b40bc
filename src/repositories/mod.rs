//! Repositorios de datos

pub mod vehicle_repository;

pub use vehicle_repository::{InMemoryVehicleRepository, PgVehicleRepository, VehicleStore};
