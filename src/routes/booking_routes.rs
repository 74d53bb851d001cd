//! Rutas de bookings (requieren autenticación)

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingListItem, CreateBookingRequest, CreatedBookingResponse, UpdateBookingStatusRequest,
    UpdatedBookingResponse,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:id", put(update_booking_status))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(axum::http::StatusCode, Json<ApiResponse<CreatedBookingResponse>>), AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok((axum::http::StatusCode::CREATED, Json(response)))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<BookingListItem>>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list(&user).await?;
    Ok(Json(response))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<UpdatedBookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.update_status(id, &user, request).await?;
    Ok(Json(response))
}
