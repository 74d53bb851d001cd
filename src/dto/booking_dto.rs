//! DTOs de bookings

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::booking::{Booking, BookingStatus};
use crate::models::vehicle::AvailabilityStatus;

/// Request para crear una reserva
///
/// Las fechas llegan como texto YYYY-MM-DD y se validan en el controller,
/// para poder distinguir "fecha ausente" de "fecha malformada".
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: i32,
    pub rent_start_date: String,
    pub rent_end_date: String,
}

/// Request para transicionar el estado de una reserva
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Snapshot del vehículo en el momento de reservar
#[derive(Debug, Serialize)]
pub struct BookedVehicleSnapshot {
    pub vehicle_name: String,
    pub daily_rent_price: Decimal,
}

/// Resumen de vehículo para listados
#[derive(Debug, Serialize)]
pub struct VehicleSummary {
    pub vehicle_name: Option<String>,
    pub registration_number: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}

/// Resumen de cliente para listados de admin
#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Response de creación de reserva, enriquecida con el snapshot del vehículo
#[derive(Debug, Serialize)]
pub struct CreatedBookingResponse {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub vehicle: BookedVehicleSnapshot,
}

/// Item de listado de reservas
///
/// El shape depende del rol: un customer ve sus reservas con el resumen
/// del vehículo; un admin ve además a qué cliente pertenece cada una.
#[derive(Debug, Serialize)]
pub struct BookingListItem {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i32>,
    pub vehicle_id: i32,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub vehicle: VehicleSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
}

/// Estado del vehículo tras devolver una reserva
#[derive(Debug, Serialize)]
pub struct VehicleAvailabilityInfo {
    pub availability_status: AvailabilityStatus,
}

/// Response de actualización de estado
#[derive(Debug, Serialize)]
pub struct UpdatedBookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleAvailabilityInfo>,
}
