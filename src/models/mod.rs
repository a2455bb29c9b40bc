//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean
//! al schema PostgreSQL y a los formularios de la web.

pub mod inquiry;
pub mod vehicle;

pub use inquiry::ContactInquiry;
pub use vehicle::{LocaleTranslation, Translations, Vehicle, VehicleFields, VehicleFilters, VehicleInput};
