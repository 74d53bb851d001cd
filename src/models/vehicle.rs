//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su estado de disponibilidad.
//! `availability_status` es estado derivado: solo el motor de bookings
//! (y el reconciliador de expiración) lo transiciona, nunca un PUT del
//! catálogo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Disponibilidad del vehículo - mapea al ENUM availability_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Booked,
}

/// Vehicle - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i32,
    pub vehicle_name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub registration_number: String,
    pub daily_rent_price: Decimal,
    pub availability_status: AvailabilityStatus,
    pub created_at: DateTime<Utc>,
}
