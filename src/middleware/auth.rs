//! Middleware de autenticación JWT
//!
//! Los tokens los emite el backend de autenticación gestionado (HS256 con
//! `AUTH_JWT_SECRET`). Aquí solo se verifica firma y expiración y se inyecta
//! el administrador autenticado en las extensions.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Administrador autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub user_id: String,
    pub email: Option<String>,
}

/// Middleware para las rutas de administración
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.config.jwt_secret).map_err(|e| {
        warn!("🔒 Token rechazado en {}: {}", request.uri().path(), e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    debug!("🔓 Admin autenticado: {}", claims.sub);

    request.extensions_mut().insert(AuthenticatedAdmin {
        user_id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
