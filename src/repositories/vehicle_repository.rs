use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleFields, VehicleFilters};
use crate::utils::errors::{not_found_error, AppError};

/// Acceso a la tabla de vehículos
#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn insert(&self, fields: VehicleFields) -> Result<Vehicle, AppError>;

    /// Sobrescribe todos los campos mutables. `NotFound` si no existe.
    async fn update(&self, id: Uuid, fields: VehicleFields) -> Result<Vehicle, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Vehicle>, AppError>;

    /// `false` si no existía
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Más recientes primero
    async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError>;
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleRepository {
    async fn insert(&self, fields: VehicleFields) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, brand, model, year, price, mileage, fuel, transmission, body_type, color,
                power_hp, description, featured, images, translations, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#
        )
        .bind(Uuid::new_v4())
        .bind(fields.brand)
        .bind(fields.model)
        .bind(fields.year)
        .bind(fields.price)
        .bind(fields.mileage)
        .bind(fields.fuel)
        .bind(fields.transmission)
        .bind(fields.body_type)
        .bind(fields.color)
        .bind(fields.power_hp)
        .bind(fields.description)
        .bind(fields.featured)
        .bind(fields.images)
        .bind(Json(fields.translations))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn update(&self, id: Uuid, fields: VehicleFields) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET brand = $2, model = $3, year = $4, price = $5, mileage = $6, fuel = $7,
                transmission = $8, body_type = $9, color = $10, power_hp = $11,
                description = $12, featured = $13, images = $14, translations = $15
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(fields.brand)
        .bind(fields.model)
        .bind(fields.year)
        .bind(fields.price)
        .bind(fields.mileage)
        .bind(fields.fuel)
        .bind(fields.transmission)
        .bind(fields.body_type)
        .bind(fields.color)
        .bind(fields.power_hp)
        .bind(fields.description)
        .bind(fields.featured)
        .bind(fields.images)
        .bind(Json(fields.translations))
        .fetch_optional(&self.pool)
        .await?;

        vehicle.ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM vehicles WHERE TRUE");

        if let Some(brand) = filters.brand.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            query.push(" AND brand ILIKE ").push_bind(format!("%{}%", brand));
        }
        if let Some(min_price) = filters.min_price {
            query.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filters.max_price {
            query.push(" AND price <= ").push_bind(max_price);
        }
        if let Some(min_year) = filters.min_year {
            query.push(" AND year >= ").push_bind(min_year);
        }
        if let Some(max_year) = filters.max_year {
            query.push(" AND year <= ").push_bind(max_year);
        }
        if let Some(max_mileage) = filters.max_mileage {
            query.push(" AND mileage <= ").push_bind(max_mileage);
        }
        if let Some(body_type) = filters.body_type.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            query.push(" AND LOWER(body_type) = LOWER(").push_bind(body_type.to_string()).push(")");
        }
        if let Some(featured) = filters.featured {
            query.push(" AND featured = ").push_bind(featured);
        }

        query.push(" ORDER BY created_at DESC");
        if let Some(limit) = filters.limit {
            query.push(" LIMIT ").push_bind(limit.max(0));
        }

        let vehicles = query.build_query_as::<Vehicle>().fetch_all(&self.pool).await?;
        Ok(vehicles)
    }
}

/// Almacén en memoria para pruebas y arranque sin `DATABASE_URL`
#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<HashMap<Uuid, Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn build_vehicle(id: Uuid, fields: VehicleFields, created_at: chrono::DateTime<Utc>) -> Vehicle {
    Vehicle {
        id,
        brand: fields.brand,
        model: fields.model,
        year: fields.year,
        price: fields.price,
        mileage: fields.mileage,
        fuel: fields.fuel,
        transmission: fields.transmission,
        body_type: fields.body_type,
        color: fields.color,
        power_hp: fields.power_hp,
        description: fields.description,
        featured: fields.featured,
        images: fields.images,
        translations: Json(fields.translations),
        created_at,
    }
}

#[async_trait]
impl VehicleStore for InMemoryVehicleRepository {
    async fn insert(&self, fields: VehicleFields) -> Result<Vehicle, AppError> {
        let vehicle = build_vehicle(Uuid::new_v4(), fields, Utc::now());
        self.vehicles.write().await.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn update(&self, id: Uuid, fields: VehicleFields) -> Result<Vehicle, AppError> {
        let mut vehicles = self.vehicles.write().await;
        let current = vehicles
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        *current = build_vehicle(id, fields, current.created_at);
        Ok(current.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        Ok(self.vehicles.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.vehicles.write().await.remove(&id).is_some())
    }

    async fn list(&self, filters: &VehicleFilters) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles: Vec<Vehicle> = self
            .vehicles
            .read()
            .await
            .values()
            .filter(|vehicle| filters.matches(vehicle))
            .cloned()
            .collect();

        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filters.limit {
            vehicles.truncate(limit.max(0) as usize);
        }
        Ok(vehicles)
    }
}
