//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Mapea exactamente a la tabla `vehicles` (ver `migrations/`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_not_blank, validate_price};

/// Traducción de un vehículo a un idioma
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleTranslation {
    pub description: String,
}

/// Traducciones por código de idioma ("en", "fr", ...)
pub type Translations = BTreeMap<String, LocaleTranslation>;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub mileage: i64,
    pub fuel: String,
    pub transmission: String,
    pub body_type: String,
    pub color: String,
    pub power_hp: Option<i32>,
    pub description: Option<String>,
    pub featured: bool,
    /// Orden de visualización; la primera es la portada
    pub images: Vec<String>,
    pub translations: Json<Translations>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Descripción en el idioma pedido, o la original si no hay traducción
    pub fn localized_description(&self, locale: &str) -> Option<String> {
        self.translations
            .get(locale)
            .map(|t| t.description.clone())
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.description.clone())
    }
}

/// Campos mutables de un vehículo; un update los sobrescribe todos
#[derive(Debug, Clone)]
pub struct VehicleFields {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub mileage: i64,
    pub fuel: String,
    pub transmission: String,
    pub body_type: String,
    pub color: String,
    pub power_hp: Option<i32>,
    pub description: Option<String>,
    pub featured: bool,
    pub images: Vec<String>,
    pub translations: Translations,
}

/// Datos del formulario de administración (sin imágenes)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VehicleInput {
    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub brand: String,

    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub model: String,

    #[validate(range(min = 1900))]
    pub year: i32,

    #[validate(custom = "validate_price")]
    pub price: Decimal,

    #[validate(range(min = 0))]
    pub mileage: i64,

    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub fuel: String,

    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub transmission: String,

    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub body_type: String,

    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub color: String,

    #[validate(range(min = 0))]
    pub power_hp: Option<i32>,

    pub description: Option<String>,

    #[serde(default)]
    pub featured: bool,
}

impl VehicleInput {
    pub fn into_fields(self, images: Vec<String>, translations: Translations) -> VehicleFields {
        VehicleFields {
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            year: self.year,
            price: self.price,
            mileage: self.mileage,
            fuel: self.fuel.trim().to_string(),
            transmission: self.transmission.trim().to_string(),
            body_type: self.body_type.trim().to_string(),
            color: self.color.trim().to_string(),
            power_hp: self.power_hp,
            description: self.description,
            featured: self.featured,
            images,
            translations,
        }
    }
}

/// Filtros para búsqueda de vehículos
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFilters {
    pub brand: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    #[serde(alias = "maxKm")]
    pub max_mileage: Option<i64>,
    pub body_type: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<i64>,
}

impl VehicleFilters {
    /// Comprobar un vehículo contra los filtros (mismas reglas que la consulta SQL)
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(brand) = self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            if !vehicle.brand.to_lowercase().contains(&brand.to_lowercase()) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| vehicle.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| vehicle.price > max) {
            return false;
        }
        if self.min_year.is_some_and(|min| vehicle.year < min) {
            return false;
        }
        if self.max_year.is_some_and(|max| vehicle.year > max) {
            return false;
        }
        if self.max_mileage.is_some_and(|max| vehicle.mileage > max) {
            return false;
        }
        if let Some(body_type) = self.body_type.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            if !vehicle.body_type.eq_ignore_ascii_case(body_type) {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if vehicle.featured != featured {
                return false;
            }
        }
        true
    }
}
