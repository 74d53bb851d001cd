//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, su ciclo de vida y las reglas
//! de dominio puras del motor de reservas: cálculo de días/precio y la
//! tabla de permisos (rol, estado solicitado).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::models::user::Role;

/// Estado de la reserva - mapea al ENUM booking_status
///
/// `cancelled` y `returned` son estados terminales. Una reserva `returned`
/// se conserva como registro histórico de ocupación y sigue bloqueando
/// solapamientos de fechas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
    Returned,
}

/// Booking - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Días facturables de un rango de alquiler.
///
/// Con fechas a granularidad de día esto equivale a
/// `ceil((end - start) / 1 día)`.
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Precio total de la reserva: precio diario × días.
pub fn total_price(daily_rent_price: Decimal, days: i64) -> Decimal {
    daily_rent_price * Decimal::from(days)
}

/// Intersección inclusiva de dos rangos de alquiler.
///
/// Espejo en Rust del predicado SQL de detección de conflictos
/// (`rent_start_date <= $nuevo_fin AND rent_end_date >= $nuevo_inicio`):
/// dos reservas chocan si comparten al menos un día, bordes incluidos.
pub fn ranges_overlap(
    existing_start: NaiveDate,
    existing_end: NaiveDate,
    new_start: NaiveDate,
    new_end: NaiveDate,
) -> bool {
    existing_start <= new_end && existing_end >= new_start
}

/// Tabla de permisos (rol, estado solicitado) → permitido.
///
/// Los clientes solo pueden pedir `cancelled`; los admins solo `returned`.
/// Mantener como tabla explícita para poder añadir roles sin dispersar
/// condicionales.
pub fn can_request_status(role: Role, requested: BookingStatus) -> bool {
    matches!(
        (role, requested),
        (Role::Customer, BookingStatus::Cancelled) | (Role::Admin, BookingStatus::Returned)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_rental_days() {
        assert_eq!(rental_days(d("2025-06-01"), d("2025-06-04")), 3);
        assert_eq!(rental_days(d("2025-06-01"), d("2025-06-02")), 1);
        // rango invertido: negativo, lo rechaza la cadena de validación
        assert_eq!(rental_days(d("2025-06-04"), d("2025-06-01")), -3);
    }

    #[test]
    fn test_total_price() {
        let price = total_price(Decimal::from(100), 3);
        assert_eq!(price, Decimal::from(300));
    }

    #[test]
    fn test_overlap_shared_boundary_day() {
        // bordes inclusivos: terminar el día que otra empieza choca
        assert!(ranges_overlap(
            d("2025-06-01"),
            d("2025-06-05"),
            d("2025-06-05"),
            d("2025-06-10"),
        ));
        assert!(ranges_overlap(
            d("2025-06-05"),
            d("2025-06-10"),
            d("2025-06-01"),
            d("2025-06-05"),
        ));
    }

    #[test]
    fn test_overlap_contained_range() {
        assert!(ranges_overlap(
            d("2025-06-01"),
            d("2025-06-30"),
            d("2025-06-10"),
            d("2025-06-12"),
        ));
        // la nueva envuelve por completo a la existente
        assert!(ranges_overlap(
            d("2025-06-10"),
            d("2025-06-12"),
            d("2025-06-01"),
            d("2025-06-30"),
        ));
    }

    #[test]
    fn test_overlap_partial_intersection() {
        assert!(ranges_overlap(
            d("2025-06-01"),
            d("2025-06-07"),
            d("2025-06-05"),
            d("2025-06-12"),
        ));
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(
            d("2025-06-01"),
            d("2025-06-05"),
            d("2025-06-06"),
            d("2025-06-10"),
        ));
        assert!(!ranges_overlap(
            d("2025-06-06"),
            d("2025-06-10"),
            d("2025-06-01"),
            d("2025-06-05"),
        ));
    }

    #[test]
    fn test_permission_map() {
        assert!(can_request_status(Role::Customer, BookingStatus::Cancelled));
        assert!(can_request_status(Role::Admin, BookingStatus::Returned));

        assert!(!can_request_status(Role::Customer, BookingStatus::Returned));
        assert!(!can_request_status(Role::Admin, BookingStatus::Cancelled));
        assert!(!can_request_status(Role::Customer, BookingStatus::Active));
        assert!(!can_request_status(Role::Admin, BookingStatus::Active));
    }
}
