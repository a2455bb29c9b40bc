use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::contact_controller::ContactController;
use crate::dto::api_response::ApiResponse;
use crate::models::inquiry::ContactInquiry;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_contact_router() -> Router<AppState> {
    Router::new().route("/", post(send_inquiry))
}

async fn send_inquiry(
    State(state): State<AppState>,
    Json(inquiry): Json<ContactInquiry>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ContactController::from_state(&state);
    let response = controller.send_inquiry(inquiry).await?;
    Ok(Json(response))
}
