use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dealership_inventory::{
    config::{DatabaseConfig, EnvironmentConfig},
    create_app,
    database::DatabaseConnection,
    repositories::{InMemoryVehicleRepository, PgVehicleRepository, VehicleStore},
    services::{CleanupQueue, FileStorage, LocalFileStorage, Mailer, SmtpMailer, TranslationService},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG, por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚗 Dealership Inventory API");
    info!("================================================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let store: Arc<dyn VehicleStore> = match &config.database_url {
        Some(url) => {
            let connection = DatabaseConnection::connect(&DatabaseConfig::new(url.clone()))
                .await
                .map_err(|e| {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    anyhow::anyhow!("Error de base de datos: {}", e)
                })?;
            Arc::new(PgVehicleRepository::new(connection.pool().clone()))
        }
        None => {
            warn!("⚠️ DATABASE_URL no configurada, usando almacén en memoria (los datos no persisten)");
            Arc::new(InMemoryVehicleRepository::new())
        }
    };

    let storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(config.public_dir.clone()));
    let (cleanup, cleanup_worker) = CleanupQueue::start(storage.clone());
    let translator = TranslationService::from_config(&config)?;
    info!("🌍 Idiomas: {}", translator.locales().join(", "));

    let mailer: Option<Arc<dyn Mailer>> = match &config.smtp {
        Some(settings) => Some(Arc::new(SmtpMailer::new(settings)?)),
        None => {
            warn!("⚠️ SMTP no configurado, el formulario de contacto no enviará emails");
            None
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(config, store, storage, translator, cleanup, mailer);
    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   GET  /api/vehicles, /api/vehicles/featured, /api/vehicles/:id");
    info!("   POST /api/contact");
    info!("   GET|POST /api/admin/vehicles, PUT|DELETE /api/admin/vehicles/:id");
    info!("   GET  /uploads/*");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    // El router ya se soltó: la cola termina cuando vacía lo pendiente
    if let Err(e) = cleanup_worker.await {
        error!("❌ Worker de limpieza terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
