//! Reconciliación del conjunto de imágenes de un vehículo
//!
//! A partir de las imágenes previas, las que el usuario conserva y las nuevas
//! subidas calcula la lista final y las referencias a borrar. Las subidas se
//! guardan aquí; los borrados NO: el llamador los encola después de persistir
//! el registro, para que el registro anterior siga siendo válido hasta entonces.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

use crate::services::cleanup_queue::CleanupQueue;
use crate::services::storage_service::{FileBlob, FileStorage, StorageError};

/// Resultado de una reconciliación
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Conservadas (en su orden) seguidas de las nuevas (en orden de envío)
    pub final_refs: Vec<String>,
    /// Previas que ya no se conservan
    pub deleted: Vec<String>,
    /// Referencias creadas en esta llamada
    pub saved: Vec<String>,
}

#[derive(Clone)]
pub struct ImageReconciler {
    storage: Arc<dyn FileStorage>,
    cleanup: CleanupQueue,
}

impl ImageReconciler {
    pub fn new(storage: Arc<dyn FileStorage>, cleanup: CleanupQueue) -> Self {
        Self { storage, cleanup }
    }

    /// `previous` es `None` al crear y las imágenes actuales del registro al editar.
    pub async fn reconcile(
        &self,
        previous: Option<&[String]>,
        kept: &[String],
        new_files: &[FileBlob],
    ) -> Result<Reconciliation, StorageError> {
        let kept_set: HashSet<&str> = kept.iter().map(String::as_str).collect();

        let mut seen = HashSet::new();
        let deleted: Vec<String> = previous
            .unwrap_or_default()
            .iter()
            .filter(|reference| !kept_set.contains(reference.as_str()))
            .filter(|reference| seen.insert(reference.as_str()))
            .cloned()
            .collect();

        let saved = self.save_all(new_files).await?;

        let mut final_refs = Vec::with_capacity(kept.len() + saved.len());
        final_refs.extend(kept.iter().cloned());
        final_refs.extend(saved.iter().cloned());

        info!(
            "🖼️ Reconciliación: {} conservadas, {} nuevas, {} a borrar",
            kept.len(),
            saved.len(),
            deleted.len()
        );

        Ok(Reconciliation {
            final_refs,
            deleted,
            saved,
        })
    }

    /// Guardar en orden; si una falla, las ya guardadas se encolan para borrar.
    async fn save_all(&self, new_files: &[FileBlob]) -> Result<Vec<String>, StorageError> {
        let mut saved = Vec::with_capacity(new_files.len());

        for file in new_files {
            match self.storage.save(file).await {
                Ok(reference) => saved.push(reference),
                Err(e) => {
                    error!("❌ Error guardando imagen {}: {}", file.file_name, e);
                    self.cleanup.schedule(saved);
                    return Err(e);
                }
            }
        }

        Ok(saved)
    }
}
