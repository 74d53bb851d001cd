//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::models::user::{Role, User};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

/// Principal autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

/// Middleware de autenticación JWT
///
/// Extrae el Bearer token, lo verifica y re-lee al usuario en la base:
/// el rol vigente en la fila manda sobre el rol embebido en el token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let claims = verify_token(auth_header, &JwtConfig::from(&state.config))?;

    let user_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".to_string()))?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        role: user.role,
    });

    Ok(next.run(request).await)
}
