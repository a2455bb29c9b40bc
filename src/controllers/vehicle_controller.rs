//! Orquestación de altas, ediciones y bajas de vehículos
//!
//! Une validación, traducción, reconciliación de imágenes, persistencia y
//! limpieza diferida. Los borrados de ficheros solo se encolan una vez que el
//! registro se ha persistido; si la persistencia falla se encolan en su lugar
//! los ficheros recién guardados.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{VehicleResponse, VehicleSubmission};
use crate::models::vehicle::VehicleFilters;
use crate::repositories::vehicle_repository::VehicleStore;
use crate::services::cleanup_queue::CleanupQueue;
use crate::services::image_reconciler::ImageReconciler;
use crate::services::translation_service::TranslationService;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};

pub const FEATURED_LIMIT: i64 = 3;

pub struct VehicleController {
    store: Arc<dyn VehicleStore>,
    translator: Arc<TranslationService>,
    reconciler: ImageReconciler,
    cleanup: CleanupQueue,
}

impl VehicleController {
    pub fn new(
        store: Arc<dyn VehicleStore>,
        translator: Arc<TranslationService>,
        reconciler: ImageReconciler,
        cleanup: CleanupQueue,
    ) -> Self {
        Self {
            store,
            translator,
            reconciler,
            cleanup,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.store.clone(),
            state.translator.clone(),
            state.reconciler.clone(),
            state.cleanup.clone(),
        )
    }

    pub async fn create(&self, submission: VehicleSubmission) -> AppResult<ApiResponse<VehicleResponse>> {
        let VehicleSubmission { input, uploads, .. } = submission;
        input.validate()?;

        let (translations, reconciliation) = tokio::join!(
            self.translator.translate_all(input.description.as_deref()),
            self.reconciler.reconcile(None, &[], &uploads),
        );
        let reconciliation = reconciliation?;

        let fields = input.into_fields(reconciliation.final_refs, translations);
        let vehicle = match self.store.insert(fields).await {
            Ok(vehicle) => vehicle,
            Err(e) => {
                error!("❌ Error guardando vehículo nuevo: {}", e);
                self.cleanup.schedule(reconciliation.saved);
                return Err(e);
            }
        };

        info!("🚗 Vehículo creado: {} {} ({})", vehicle.brand, vehicle.model, vehicle.id);

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, submission: VehicleSubmission) -> AppResult<ApiResponse<VehicleResponse>> {
        let VehicleSubmission {
            input,
            kept_images,
            uploads,
        } = submission;
        input.validate()?;

        let current = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        let kept = sanitize_kept_images(&kept_images, &current.images);

        let (translations, reconciliation) = tokio::join!(
            self.translator.translate_all(input.description.as_deref()),
            self.reconciler.reconcile(Some(&current.images), &kept, &uploads),
        );
        let reconciliation = reconciliation?;

        let fields = input.into_fields(reconciliation.final_refs, translations);
        match self.store.update(id, fields).await {
            Ok(vehicle) => {
                self.cleanup.schedule(reconciliation.deleted);
                info!("✏️ Vehículo actualizado: {}", vehicle.id);

                Ok(ApiResponse::success_with_message(
                    VehicleResponse::from(vehicle),
                    "Vehicle updated successfully".to_string(),
                ))
            }
            Err(e) => {
                error!("❌ Error actualizando vehículo {}: {}", id, e);
                self.cleanup.schedule(reconciliation.saved);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if !self.store.delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        info!("🗑️ Vehículo eliminado: {} ({} imágenes)", id, current.images.len());
        self.cleanup.schedule(current.images);

        Ok(ApiResponse::message("Vehicle deleted successfully".to_string()))
    }

    pub async fn get(&self, id: Uuid, locale: Option<&str>) -> AppResult<VehicleResponse> {
        let vehicle = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        Ok(VehicleResponse::from_vehicle(vehicle, locale))
    }

    pub async fn list(&self, filters: &VehicleFilters) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.store.list(filters).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn featured(&self) -> AppResult<Vec<VehicleResponse>> {
        self.list(&VehicleFilters {
            featured: Some(true),
            limit: Some(FEATURED_LIMIT),
            ..Default::default()
        })
        .await
    }
}

/// Conservar solo referencias del propio registro, sin duplicados y en orden
fn sanitize_kept_images(kept: &[String], current: &[String]) -> Vec<String> {
    let owned: HashSet<&str> = current.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    kept.iter()
        .filter(|reference| {
            let belongs = owned.contains(reference.as_str());
            if !belongs {
                warn!("⚠️ Imagen ajena al vehículo ignorada: {}", reference);
            }
            belongs
        })
        .filter(|reference| seen.insert(reference.as_str()))
        .cloned()
        .collect()
}
