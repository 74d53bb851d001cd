//! Repositorio de Vehicles

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        vehicle_name: String,
        vehicle_type: String,
        registration_number: String,
        daily_rent_price: Decimal,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (vehicle_name, type, registration_number, daily_rent_price, availability_status)
            VALUES ($1, $2, $3, $4, 'available')
            RETURNING *
            "#,
        )
        .bind(vehicle_name)
        .bind(vehicle_type)
        .bind(registration_number)
        .bind(daily_rent_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    pub async fn registration_number_exists(
        &self,
        registration_number: &str,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1)",
        )
        .bind(registration_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Actualización merge-patch: los campos no especificados conservan
    /// su valor anterior. La disponibilidad no se toca desde aquí.
    pub async fn update(
        &self,
        id: i32,
        vehicle_name: Option<String>,
        vehicle_type: Option<String>,
        registration_number: Option<String>,
        daily_rent_price: Option<Decimal>,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_name = $2, type = $3, registration_number = $4, daily_rent_price = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vehicle_name.unwrap_or(current.vehicle_name))
        .bind(vehicle_type.unwrap_or(current.vehicle_type))
        .bind(registration_number.unwrap_or(current.registration_number))
        .bind(daily_rent_price.unwrap_or(current.daily_rent_price))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Borrar un vehículo. Falla con Conflict si tiene una reserva activa.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let has_active: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE vehicle_id = $1 AND status = 'active')",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if has_active.0 {
            return Err(AppError::Conflict(
                "Vehicle has an active booking and cannot be deleted".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }

        tx.commit().await?;

        Ok(())
    }
}
