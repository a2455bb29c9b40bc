//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de los campos de formulario.

use rust_decimal::Decimal;
use std::str::FromStr;
use validator::ValidationError;

use crate::utils::errors::{validation_error, AppResult};

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Mayor precio que cabe en la columna `NUMERIC(12, 2)`
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Validar que un decimal sea no negativo
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un precio: no negativo y sin desbordar la columna una vez redondeado
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative_decimal(value)?;
    if value.round_dp(2) > MAX_PRICE {
        let mut error = ValidationError::new("max_price");
        error.add_param("value".into(), &value.to_string());
        error.add_param("max".into(), &MAX_PRICE.to_string());
        return Err(error);
    }
    Ok(())
}

/// Texto opcional: vacío o solo espacios cuenta como ausente
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parsear un campo numérico obligatorio de un formulario
pub fn parse_required_field<T: FromStr>(field: &'static str, value: Option<&str>) -> AppResult<T> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| validation_error(field, "is required"))?;

    raw.parse::<T>()
        .map_err(|_| validation_error(field, &format!("'{}' is not a valid number", raw)))
}

/// Parsear un campo numérico opcional de un formulario
pub fn parse_optional_field<T: FromStr>(field: &'static str, value: Option<&str>) -> AppResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| validation_error(field, &format!("'{}' is not a valid number", raw))),
    }
}

/// Checkbox de formulario: "true", "on" o "1" se consideran marcados
pub fn parse_checkbox(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("on") | Some("1")
    )
}
