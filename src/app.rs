//! Ensamblado del router de la aplicación

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::cors_middleware;
use crate::routes;
use crate::state::AppState;

/// Construir el router completo de la API
pub fn build_router(state: AppState) -> Router {
    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest(
            "/api/users",
            routes::user_routes::create_user_router().route_layer(auth.clone()),
        )
        .nest(
            "/api/vehicles",
            routes::vehicle_routes::create_vehicle_router().route_layer(auth.clone()),
        )
        .nest(
            "/api/bookings",
            routes::booking_routes::create_booking_router().route_layer(auth),
        )
        .layer(cors_middleware())
        .with_state(state)
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Vehicle Rental System!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
