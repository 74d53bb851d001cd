use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use vehicle_rental::app::build_router;
use vehicle_rental::config::EnvironmentConfig;
use vehicle_rental::database::connection::create_pool;
use vehicle_rental::services::expiry_service::spawn_expiry_reconciler;
use vehicle_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenvy::dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Rental System - Booking API");
    info!("======================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Reconciliador de reservas expiradas (corre toda la vida del proceso)
    let _reconciler = spawn_expiry_reconciler(pool.clone(), config.expiry_sweep_interval);
    info!(
        "⏰ Reconciliador de expiración activo (cada {}s)",
        config.expiry_sweep_interval
    );

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(pool, config);
    let app = build_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/auth/signup - Registro de usuario");
    info!("   POST /api/auth/signin - Login");
    info!("👤 Users:");
    info!("   GET    /api/users - Listar usuarios (admin)");
    info!("   PUT    /api/users/:id - Actualizar usuario");
    info!("   DELETE /api/users/:id - Eliminar usuario (admin)");
    info!("🚗 Vehicles:");
    info!("   POST   /api/vehicles - Crear vehículo (admin)");
    info!("   GET    /api/vehicles - Listar vehículos");
    info!("   GET    /api/vehicles/:id - Obtener vehículo");
    info!("   PUT    /api/vehicles/:id - Actualizar vehículo (admin)");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo (admin)");
    info!("📅 Bookings:");
    info!("   POST /api/bookings - Crear reserva");
    info!("   GET  /api/bookings - Listar reservas (según rol)");
    info!("   PUT  /api/bookings/:id - Cancelar / devolver reserva");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
