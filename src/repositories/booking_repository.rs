//! Repositorio de Bookings
//!
//! Lado de almacenamiento del motor de reservas. Cada mutación multi-paso
//! (verificar → chequear conflicto → escribir reserva → escribir vehículo)
//! corre dentro de una única transacción con `FOR UPDATE` sobre la fila
//! afectada, de modo que dos creates concurrentes sobre el mismo vehículo
//! se serializan en el lock y no pueden doble-reservar.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::booking::{self, Booking, BookingStatus};
use crate::models::user::Role;
use crate::models::vehicle::{AvailabilityStatus, Vehicle};
use crate::utils::errors::AppError;

/// Fila de listado con los joins de vehículo y cliente
#[derive(Debug, sqlx::FromRow)]
pub struct BookingListRow {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: sqlx::types::Decimal,
    pub status: BookingStatus,
    pub vehicle_name: Option<String>,
    pub registration_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una reserva.
    ///
    /// Precondiciones de existencia/disponibilidad/solape verificadas dentro
    /// de la transacción; el lock sobre la fila del vehículo mantiene válido
    /// el chequeo de solape hasta el commit. Devuelve la reserva junto con
    /// el vehículo tal como estaba al reservar (snapshot de precio).
    pub async fn create(
        &self,
        customer_id: i32,
        vehicle_id: i32,
        rent_start_date: NaiveDate,
        rent_end_date: NaiveDate,
    ) -> Result<(Booking, Vehicle), AppError> {
        let mut tx = self.pool.begin().await?;

        let customer_exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(customer_id)
                .fetch_one(&mut *tx)
                .await?;

        if !customer_exists.0 {
            return Err(AppError::NotFound("Customer not found".to_string()));
        }

        // Lock de la fila del vehículo: serializa creates concurrentes
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 FOR UPDATE",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if vehicle.availability_status != AvailabilityStatus::Available {
            return Err(AppError::Conflict("Vehicle is not available".to_string()));
        }

        // Solape con bordes inclusivos (predicado espejo de
        // models::booking::ranges_overlap). Las reservas `returned`
        // también bloquean: se conservan como ocupación histórica.
        let overlap: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE vehicle_id = $1
                AND status IN ('active', 'returned')
                AND rent_start_date <= $3
                AND rent_end_date >= $2
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(rent_start_date)
        .bind(rent_end_date)
        .fetch_one(&mut *tx)
        .await?;

        if overlap.0 {
            return Err(AppError::Conflict(
                "Vehicle is already booked for the selected date range".to_string(),
            ));
        }

        let days = booking::rental_days(rent_start_date, rent_end_date);

        // Inalcanzable tras validar start < end, pero se mantiene el guard
        if days <= 0 {
            return Err(AppError::BadRequest("Invalid rent date".to_string()));
        }

        let total_price = booking::total_price(vehicle.daily_rent_price, days);

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (customer_id, vehicle_id, rent_start_date, rent_end_date, total_price, status)
            VALUES ($1, $2, $3, $4, $5, 'active')
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(vehicle_id)
        .bind(rent_start_date)
        .bind(rent_end_date)
        .bind(total_price)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE vehicles SET availability_status = 'booked' WHERE id = $1")
            .bind(vehicle_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok((booking, vehicle))
    }

    /// Listar reservas con sus joins; orden estable por id ascendente.
    ///
    /// Con `customer_id` restringe al dueño (vista de customer); sin él
    /// devuelve todo (vista de admin).
    pub async fn list(&self, customer_id: Option<i32>) -> Result<Vec<BookingListRow>, AppError> {
        let base = r#"
            SELECT b.id, b.customer_id, b.vehicle_id, b.rent_start_date, b.rent_end_date,
                   b.total_price, b.status,
                   v.vehicle_name, v.registration_number, v.type AS vehicle_type,
                   u.name AS customer_name, u.email AS customer_email
            FROM bookings b
            LEFT JOIN vehicles v ON b.vehicle_id = v.id
            LEFT JOIN users u ON b.customer_id = u.id
        "#;

        let rows = match customer_id {
            Some(id) => {
                let query = format!("{} WHERE b.customer_id = $1 ORDER BY b.id ASC", base);
                sqlx::query_as::<_, BookingListRow>(&query)
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{} ORDER BY b.id ASC", base);
                sqlx::query_as::<_, BookingListRow>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }

    /// Transicionar el estado de una reserva.
    ///
    /// El permission map (rol → estado) ya fue aplicado por el controller;
    /// aquí van las reglas que dependen de la fila: existencia, estado
    /// terminal, ventana de cancelación y propiedad. Al marcar `returned`
    /// el vehículo vuelve a `available` en la misma transacción.
    pub async fn update_status(
        &self,
        booking_id: i32,
        requested: BookingStatus,
        caller_id: i32,
        caller_role: Role,
        today: NaiveDate,
    ) -> Result<(Booking, Option<AvailabilityStatus>), AppError> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        // cancelled y returned son terminales
        if booking.status != BookingStatus::Active {
            return Err(AppError::Conflict("Booking is no longer active".to_string()));
        }

        if caller_role == Role::Customer {
            if booking.rent_start_date <= today {
                return Err(AppError::Conflict(
                    "Cannot cancel booking after start date".to_string(),
                ));
            }

            if booking.customer_id != caller_id {
                return Err(AppError::Forbidden(
                    "Not authorized to cancel this booking".to_string(),
                ));
            }
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(booking_id)
        .bind(requested)
        .fetch_one(&mut *tx)
        .await?;

        let availability = if requested == BookingStatus::Returned {
            let row: (AvailabilityStatus,) = sqlx::query_as(
                r#"
                UPDATE vehicles SET availability_status = 'available'
                WHERE id = $1
                RETURNING availability_status
                "#,
            )
            .bind(booking.vehicle_id)
            .fetch_one(&mut *tx)
            .await?;

            Some(row.0)
        } else {
            None
        };

        tx.commit().await?;

        Ok((updated, availability))
    }

    /// Barrido del reconciliador: cerrar reservas activas cuyo fin ya pasó.
    ///
    /// Cada fila se cierra en su propia transacción con guard
    /// `AND status = 'active'`, así el barrido es idempotente y un fallo a
    /// mitad deja el resto para el siguiente tick (la query re-selecciona
    /// por estado). Devuelve cuántas reservas se cerraron.
    pub async fn expire_overdue(&self) -> Result<u64, AppError> {
        let overdue: Vec<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT id, vehicle_id FROM bookings
            WHERE status = 'active'
            AND rent_end_date < CURRENT_DATE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut closed = 0u64;

        for (booking_id, vehicle_id) in overdue {
            let mut tx = self.pool.begin().await?;

            let result = sqlx::query(
                "UPDATE bookings SET status = 'returned' WHERE id = $1 AND status = 'active'",
            )
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() > 0 {
                sqlx::query("UPDATE vehicles SET availability_status = 'available' WHERE id = $1")
                    .bind(vehicle_id)
                    .execute(&mut *tx)
                    .await?;

                closed += 1;
            }

            tx.commit().await?;
        }

        Ok(closed)
    }
}
