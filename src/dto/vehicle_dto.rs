//! DTOs de vehículos

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Request para crear un vehículo
///
/// La disponibilidad no se acepta aquí: todo vehículo nace `available`
/// y de ahí en adelante la transiciona el motor de reservas.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub vehicle_name: String,

    #[serde(rename = "type")]
    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: String,

    #[validate(length(min = 2, max = 30))]
    pub registration_number: String,

    pub daily_rent_price: Decimal,
}

/// Request para actualizar un vehículo existente (merge-patch)
///
/// `availability_status` se omite deliberadamente: es estado derivado
/// del motor de reservas y no puede editarse por catálogo.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 100))]
    pub vehicle_name: Option<String>,

    #[serde(rename = "type")]
    #[validate(length(min = 2, max = 50))]
    pub vehicle_type: Option<String>,

    #[validate(length(min = 2, max = 30))]
    pub registration_number: Option<String>,

    pub daily_rent_price: Option<Decimal>,
}
