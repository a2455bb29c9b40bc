//! Almacenamiento de imágenes
//!
//! Las imágenes se guardan en `{public_dir}/uploads/` y se referencian con una
//! ruta relativa a `public_dir` (ej. `/uploads/k3j9x0a1b2c3d_1735689600000.jpg`),
//! que es la que se persiste en `vehicles.images`.

use async_trait::async_trait;
use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Subdirectorio público de las subidas
pub const UPLOADS_DIR: &str = "uploads";

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 13;

/// Errores de escritura en el almacenamiento
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to upload {file_name}: {reason}")]
    Save { file_name: String, reason: String },
}

/// Fichero recibido en un formulario
#[derive(Debug, Clone)]
pub struct FileBlob {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileBlob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }
}

/// Backend de almacenamiento de ficheros
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Guardar un fichero y devolver su referencia
    async fn save(&self, file: &FileBlob) -> Result<String, StorageError>;

    /// Borrar por referencia. Nunca falla: `false` si no existe o se rechaza.
    async fn delete(&self, reference: &str) -> bool;
}

/// true si la referencia contiene un segmento `..`
pub fn contains_path_traversal(reference: &str) -> bool {
    reference.split(['/', '\\']).any(|segment| segment == "..")
}

/// Extensión a conservar del nombre original (por defecto `jpg`)
fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "jpg".to_string())
}

/// Nombre aleatorio + timestamp + extensión original; no expone el nombre del usuario
pub fn generate_file_name(original_name: &str) -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();

    format!(
        "{}_{}.{}",
        token,
        chrono::Utc::now().timestamp_millis(),
        file_extension(original_name)
    )
}

/// Almacenamiento en disco local, servido como estático
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    public_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join(UPLOADS_DIR)
    }

    fn absolute_path(&self, reference: &str) -> PathBuf {
        self.public_dir.join(reference.trim_start_matches('/'))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, file: &FileBlob) -> Result<String, StorageError> {
        let save_error = |reason: String| StorageError::Save {
            file_name: file.file_name.clone(),
            reason,
        };

        let uploads_dir = self.uploads_dir();
        tokio::fs::create_dir_all(&uploads_dir)
            .await
            .map_err(|e| save_error(e.to_string()))?;

        let file_name = generate_file_name(&file.file_name);
        let reference = format!("/{}/{}", UPLOADS_DIR, file_name);

        tokio::fs::write(uploads_dir.join(&file_name), &file.bytes)
            .await
            .map_err(|e| save_error(e.to_string()))?;

        debug!("💾 Imagen guardada: {} -> {}", file.file_name, reference);
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> bool {
        if contains_path_traversal(reference) {
            warn!("⚠️ Referencia rechazada (path traversal): {}", reference);
            return false;
        }

        match tokio::fs::remove_file(self.absolute_path(reference)).await {
            Ok(()) => {
                debug!("🗑️ Imagen borrada: {}", reference);
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("🔍 Imagen ya no existe: {}", reference);
                false
            }
            Err(e) => {
                warn!("⚠️ Error borrando imagen {}: {}", reference, e);
                false
            }
        }
    }
}
