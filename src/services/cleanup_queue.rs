//! Cola de borrado de imágenes en segundo plano
//!
//! Los borrados no bloquean la respuesta: se encolan y un worker los ejecuta
//! contra el almacenamiento, registrando el resultado de cada uno. Un fallo de
//! borrado nunca llega al llamador.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::services::storage_service::{contains_path_traversal, FileStorage};

/// Productor de la cola; clonable y barato
#[derive(Clone)]
pub struct CleanupQueue {
    sender: mpsc::UnboundedSender<Vec<String>>,
}

impl CleanupQueue {
    /// Arrancar el worker. El handle termina cuando se sueltan todas las copias de la cola.
    pub fn start(storage: Arc<dyn FileStorage>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(storage, receiver));
        (Self { sender }, worker)
    }

    /// Encolar referencias para borrar. No espera ni falla.
    pub fn schedule(&self, references: Vec<String>) {
        let references: Vec<String> = references
            .into_iter()
            .filter(|reference| {
                let rejected = contains_path_traversal(reference);
                if rejected {
                    warn!("⚠️ Referencia con path traversal descartada: {}", reference);
                }
                !rejected
            })
            .collect();

        if references.is_empty() {
            return;
        }

        debug!("🧹 Encolando {} imágenes para borrar", references.len());
        if let Err(e) = self.sender.send(references) {
            warn!("⚠️ Cola de limpieza cerrada, {} imágenes sin borrar", e.0.len());
        }
    }
}

async fn run_worker(storage: Arc<dyn FileStorage>, mut receiver: mpsc::UnboundedReceiver<Vec<String>>) {
    while let Some(batch) = receiver.recv().await {
        let results = futures::future::join_all(batch.iter().map(|reference| storage.delete(reference))).await;

        let deleted = results.iter().filter(|deleted| **deleted).count();
        for (reference, deleted) in batch.iter().zip(&results) {
            if !deleted {
                warn!("⚠️ No se pudo borrar {} (ausente o rechazada)", reference);
            }
        }
        info!("🧹 Limpieza: {}/{} imágenes borradas", deleted, batch.len());
    }
    debug!("🧹 Worker de limpieza terminado");
}
