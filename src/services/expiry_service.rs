//! Reconciliador de reservas expiradas
//!
//! Tarea de fondo que corre durante toda la vida del proceso: en cada
//! tick cierra las reservas activas cuya fecha de fin ya pasó y libera
//! sus vehículos. Un tick fallido se loguea y no tumba el proceso ni
//! bloquea el siguiente tick; el barrido re-selecciona por estado, así
//! que el progreso parcial se retoma solo.

use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::repositories::booking_repository::BookingRepository;

/// Lanzar el reconciliador con el intervalo dado (segundos).
pub fn spawn_expiry_reconciler(pool: PgPool, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let repository = BookingRepository::new(pool);
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match repository.expire_overdue().await {
                Ok(0) => {}
                Ok(closed) => {
                    info!("🔄 {} expired bookings marked as returned", closed);
                }
                Err(e) => {
                    error!(error = %e, "expiry sweep failed; retrying on next tick");
                }
            }
        }
    })
}
