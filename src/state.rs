//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Solo contiene configuración y handles `Arc`.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::vehicle_repository::VehicleStore;
use crate::services::cleanup_queue::CleanupQueue;
use crate::services::image_reconciler::ImageReconciler;
use crate::services::mail_service::Mailer;
use crate::services::storage_service::FileStorage;
use crate::services::translation_service::TranslationService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvironmentConfig>,
    pub store: Arc<dyn VehicleStore>,
    pub storage: Arc<dyn FileStorage>,
    pub translator: Arc<TranslationService>,
    pub reconciler: ImageReconciler,
    pub cleanup: CleanupQueue,
    /// `None` si SMTP no está configurado
    pub mailer: Option<Arc<dyn Mailer>>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        store: Arc<dyn VehicleStore>,
        storage: Arc<dyn FileStorage>,
        translator: TranslationService,
        cleanup: CleanupQueue,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        let reconciler = ImageReconciler::new(storage.clone(), cleanup.clone());

        Self {
            config: Arc::new(config),
            store,
            storage,
            translator: Arc::new(translator),
            reconciler,
            cleanup,
            mailer,
        }
    }
}
