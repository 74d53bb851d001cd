//! Controller de Vehicles
//!
//! CRUD del catálogo. Las escrituras son solo de admin; la disponibilidad
//! nunca se edita desde aquí, la gobierna el motor de reservas.

use rust_decimal::Decimal;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::Role;
use crate::models::vehicle::Vehicle;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        require_admin(caller)?;
        request.validate().map_err(AppError::Validation)?;

        if request.daily_rent_price <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "Daily rent price must be greater than zero".to_string(),
            ));
        }

        if self
            .repository
            .registration_number_exists(&request.registration_number)
            .await?
        {
            return Err(AppError::Conflict(
                "Registration number is already in use".to_string(),
            ));
        }

        let vehicle = self
            .repository
            .create(
                request.vehicle_name,
                request.vehicle_type,
                request.registration_number,
                request.daily_rent_price,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        let vehicles = self.repository.find_all().await?;

        let message = if vehicles.is_empty() {
            "No vehicles found"
        } else {
            "Vehicles retrieved successfully"
        };

        Ok(ApiResponse::success_with_message(vehicles, message.to_string()))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<ApiResponse<Vehicle>, AppError> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle retrieved successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: i32,
        caller: &AuthenticatedUser,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        require_admin(caller)?;
        request.validate().map_err(AppError::Validation)?;

        if let Some(price) = request.daily_rent_price {
            if price <= Decimal::ZERO {
                return Err(AppError::BadRequest(
                    "Daily rent price must be greater than zero".to_string(),
                ));
            }
        }

        if let Some(ref registration_number) = request.registration_number {
            let current = self
                .repository
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

            if *registration_number != current.registration_number
                && self
                    .repository
                    .registration_number_exists(registration_number)
                    .await?
            {
                return Err(AppError::Conflict(
                    "Registration number is already in use".to_string(),
                ));
            }
        }

        let vehicle = self
            .repository
            .update(
                id,
                request.vehicle_name,
                request.vehicle_type,
                request.registration_number,
                request.daily_rent_price,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(
        &self,
        id: i32,
        caller: &AuthenticatedUser,
    ) -> Result<ApiResponse<()>, AppError> {
        require_admin(caller)?;

        self.repository.delete(id).await?;

        Ok(ApiResponse {
            success: true,
            message: Some("Vehicle deleted successfully".to_string()),
            data: None,
        })
    }
}

fn require_admin(caller: &AuthenticatedUser) -> Result<(), AppError> {
    if caller.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only admins can manage vehicles".to_string(),
        ));
    }
    Ok(())
}
