use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::vehicle::{Translations, Vehicle, VehicleInput};
use crate::services::storage_service::FileBlob;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    normalize_optional_text, parse_checkbox, parse_optional_field, parse_required_field,
};

const KEPT_IMAGES_FIELD: &str = "existing_images";
const UPLOADS_FIELD: &str = "image_files";

// Query de la ficha pública
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
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
    /// Descripción en el idioma pedido (o la original)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_description: Option<String>,
    pub featured: bool,
    pub images: Vec<String>,
    pub translations: Translations,
    pub created_at: DateTime<Utc>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, locale: Option<&str>) -> Self {
        let localized_description = locale.and_then(|locale| vehicle.localized_description(locale));

        Self {
            id: vehicle.id,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            price: vehicle.price,
            mileage: vehicle.mileage,
            fuel: vehicle.fuel,
            transmission: vehicle.transmission,
            body_type: vehicle.body_type,
            color: vehicle.color,
            power_hp: vehicle.power_hp,
            description: vehicle.description,
            localized_description,
            featured: vehicle.featured,
            images: vehicle.images,
            translations: vehicle.translations.0,
            created_at: vehicle.created_at,
        }
    }
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self::from_vehicle(vehicle, None)
    }
}

/// Formulario de alta/edición ya separado en sus partes
#[derive(Debug)]
pub struct VehicleSubmission {
    pub input: VehicleInput,
    /// Referencias que el usuario conserva, en el orden enviado
    pub kept_images: Vec<String>,
    /// Ficheros nuevos, en el orden enviado
    pub uploads: Vec<FileBlob>,
}

/// Acumulador de los campos de un formulario multipart
#[derive(Debug, Default)]
pub struct VehicleForm {
    fields: HashMap<String, String>,
    kept_images: Vec<String>,
    uploads: Vec<FileBlob>,
}

impl VehicleForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == UPLOADS_FIELD {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file {}: {}", file_name, e)))?;

                form.push_file(FileBlob {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
                form.push_text(&name, value);
            }
        }

        Ok(form)
    }

    pub fn push_text(&mut self, name: &str, value: String) {
        if name == KEPT_IMAGES_FIELD {
            let reference = value.trim();
            if !reference.is_empty() {
                self.kept_images.push(reference.to_string());
            }
        } else {
            self.fields.insert(name.to_string(), value);
        }
    }

    /// Las partes vacías (input de fichero sin selección) se ignoran
    pub fn push_file(&mut self, file: FileBlob) {
        if !file.bytes.is_empty() {
            self.uploads.push(file);
        }
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn owned_text(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    pub fn into_submission(self) -> AppResult<VehicleSubmission> {
        let input = VehicleInput {
            brand: self.owned_text("brand"),
            model: self.owned_text("model"),
            year: parse_required_field("year", self.text("year"))?,
            price: parse_required_field("price", self.text("price"))?,
            mileage: parse_required_field("mileage", self.text("mileage"))?,
            fuel: self.owned_text("fuel"),
            transmission: self.owned_text("transmission"),
            body_type: self.owned_text("body_type"),
            color: self.owned_text("color"),
            power_hp: parse_optional_field("power_hp", self.text("power_hp"))?,
            description: normalize_optional_text(self.text("description").map(str::to_string)),
            featured: parse_checkbox(self.text("featured")),
        };

        Ok(VehicleSubmission {
            input,
            kept_images: self.kept_images,
            uploads: self.uploads,
        })
    }
}
