use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{VehicleForm, VehicleResponse};
use crate::middleware::auth::AuthenticatedAdmin;
use crate::models::vehicle::VehicleFilters;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Gestión del inventario; protegido por `require_admin`
pub fn create_admin_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", put(update_vehicle).delete(delete_vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<ApiResponse<Vec<VehicleResponse>>>, AppError> {
    let controller = VehicleController::from_state(&state);
    let vehicles = controller.list(&filters).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    info!("🚗 Alta de vehículo solicitada por {}", admin.user_id);
    let submission = VehicleForm::from_multipart(multipart).await?.into_submission()?;
    let controller = VehicleController::from_state(&state);
    let response = controller.create(submission).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    info!("✏️ Edición del vehículo {} solicitada por {}", id, admin.user_id);
    let submission = VehicleForm::from_multipart(multipart).await?.into_submission()?;
    let controller = VehicleController::from_state(&state);
    let response = controller.update(id, submission).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    info!("🗑️ Baja del vehículo {} solicitada por {}", id, admin.user_id);
    let controller = VehicleController::from_state(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
