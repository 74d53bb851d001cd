//! Controller de Bookings
//!
//! Motor del ciclo de vida de reservas: cadena de validación de la
//! solicitud, puerta de permisos por rol y orquestación del repositorio.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::dto::booking_dto::{
    BookedVehicleSnapshot, BookingListItem, CreateBookingRequest, CreatedBookingResponse,
    CustomerSummary, UpdateBookingStatusRequest, UpdatedBookingResponse, VehicleAvailabilityInfo,
    VehicleSummary,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{self, BookingStatus};
use crate::models::user::Role;
use crate::repositories::booking_repository::BookingRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_rent_date;

pub struct BookingController {
    repository: BookingRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool),
        }
    }

    /// Crear una reserva para el principal autenticado.
    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<CreatedBookingResponse>, AppError> {
        let start = parse_rent_date(&request.rent_start_date, "rentStartDate")?;
        let end = parse_rent_date(&request.rent_end_date, "rentEndDate")?;

        let today = Utc::now().date_naive();
        validate_rental_window(start, end, today)?;

        let (booking, vehicle) = self
            .repository
            .create(caller.user_id, request.vehicle_id, start, end)
            .await?;

        let response = CreatedBookingResponse {
            id: booking.id,
            customer_id: booking.customer_id,
            vehicle_id: booking.vehicle_id,
            rent_start_date: booking.rent_start_date,
            rent_end_date: booking.rent_end_date,
            total_price: booking.total_price,
            status: booking.status,
            created_at: booking.created_at,
            vehicle: BookedVehicleSnapshot {
                vehicle_name: vehicle.vehicle_name,
                daily_rent_price: vehicle.daily_rent_price,
            },
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Booking created successfully".to_string(),
        ))
    }

    /// Listar reservas según el rol del principal.
    ///
    /// Un customer ve solo las suyas; un admin ve todas, cada una con el
    /// resumen del cliente. Orden estable por id ascendente.
    pub async fn list(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<ApiResponse<Vec<BookingListItem>>, AppError> {
        let scope = match caller.role {
            Role::Customer => Some(caller.user_id),
            Role::Admin => None,
        };

        let rows = self.repository.list(scope).await?;

        let is_admin = caller.role == Role::Admin;
        let items = rows
            .into_iter()
            .map(|row| BookingListItem {
                id: row.id,
                customer_id: is_admin.then_some(row.customer_id),
                vehicle_id: row.vehicle_id,
                rent_start_date: row.rent_start_date,
                rent_end_date: row.rent_end_date,
                total_price: row.total_price,
                status: row.status,
                vehicle: VehicleSummary {
                    vehicle_name: row.vehicle_name,
                    registration_number: row.registration_number,
                    vehicle_type: row.vehicle_type,
                },
                customer: is_admin.then(|| CustomerSummary {
                    name: row.customer_name,
                    email: row.customer_email,
                }),
            })
            .collect();

        let message = if is_admin {
            "Bookings retrieved successfully"
        } else {
            "Your bookings retrieved successfully"
        };

        Ok(ApiResponse::success_with_message(items, message.to_string()))
    }

    /// Transicionar el estado de una reserva.
    pub async fn update_status(
        &self,
        booking_id: i32,
        caller: &AuthenticatedUser,
        request: UpdateBookingStatusRequest,
    ) -> Result<ApiResponse<UpdatedBookingResponse>, AppError> {
        if !booking::can_request_status(caller.role, request.status) {
            let message = match caller.role {
                Role::Customer => "Customers can only cancel bookings",
                Role::Admin => "Admins can only mark bookings as returned",
            };
            return Err(AppError::Forbidden(message.to_string()));
        }

        let today = Utc::now().date_naive();

        let (updated, availability) = self
            .repository
            .update_status(booking_id, request.status, caller.user_id, caller.role, today)
            .await?;

        let message = match request.status {
            BookingStatus::Cancelled => "Booking cancelled successfully",
            BookingStatus::Returned => "Booking marked as returned. Vehicle is now available",
            BookingStatus::Active => "Booking updated successfully",
        };

        let response = UpdatedBookingResponse {
            booking: updated,
            vehicle: availability.map(|availability_status| VehicleAvailabilityInfo {
                availability_status,
            }),
        };

        Ok(ApiResponse::success_with_message(response, message.to_string()))
    }
}

/// Validar la ventana de alquiler de una solicitud de reserva.
///
/// Orden normativo: fin después de inicio, inicio no en el pasado
/// (comparación solo de fecha, sin hora).
fn validate_rental_window(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }

    if start < today {
        return Err(AppError::BadRequest(
            "Start date cannot be in the past".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_valid_window() {
        assert!(validate_rental_window(d("2025-06-01"), d("2025-06-04"), d("2025-05-20")).is_ok());
    }

    #[test]
    fn test_start_today_is_valid() {
        assert!(validate_rental_window(d("2025-06-01"), d("2025-06-02"), d("2025-06-01")).is_ok());
    }

    #[test]
    fn test_end_before_start() {
        let err =
            validate_rental_window(d("2025-06-04"), d("2025-06-01"), d("2025-05-20")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_start_equals_end() {
        assert!(validate_rental_window(d("2025-06-01"), d("2025-06-01"), d("2025-05-20")).is_err());
    }

    #[test]
    fn test_start_in_past() {
        let err =
            validate_rental_window(d("2025-06-01"), d("2025-06-04"), d("2025-06-02")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
