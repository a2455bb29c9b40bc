use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{LocaleQuery, VehicleResponse};
use crate::models::vehicle::VehicleFilters;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Catálogo público
pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/featured", get(featured_vehicles))
        .route("/:id", get(get_vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<ApiResponse<Vec<VehicleResponse>>>, AppError> {
    let controller = VehicleController::from_state(&state);
    let vehicles = controller.list(&filters).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn featured_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VehicleResponse>>>, AppError> {
    let controller = VehicleController::from_state(&state);
    let vehicles = controller.featured().await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::from_state(&state);
    let vehicle = controller.get(id, query.locale.as_deref()).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}
