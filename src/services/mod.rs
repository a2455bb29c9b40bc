//! Services module
//!
//! Este módulo contiene la lógica de negocio y servicios de la aplicación:
//! traducción multilingüe, reconciliación de imágenes, almacenamiento y email.

pub mod cleanup_queue;
pub mod google_translator;
pub mod image_reconciler;
pub mod mail_service;
pub mod openai_translator;
pub mod storage_service;
pub mod translation_service;

pub use cleanup_queue::CleanupQueue;
pub use image_reconciler::{ImageReconciler, Reconciliation};
pub use mail_service::{Mailer, SmtpMailer};
pub use storage_service::{FileBlob, FileStorage, LocalFileStorage};
pub use translation_service::{TranslationProvider, TranslationService};
