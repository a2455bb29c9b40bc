//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Se lee una sola vez al arrancar y queda como solo lectura.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Idiomas a los que se traduce la descripción de cada vehículo
pub const DEFAULT_LOCALES: &[&str] = &["en", "fr", "de", "es"];

/// Endpoint gratuito de Google Translate
pub const DEFAULT_GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Configuración SMTP para el formulario de contacto
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// true → TLS implícito (465), false → STARTTLS
    pub secure: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub supported_locales: Vec<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub google_translate_url: String,
    pub translation_timeout_secs: u64,
    pub smtp: Option<SmtpSettings>,
    pub contact_recipient: Option<String>,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET must be set")?;

        let smtp = match env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty()) {
            Some(host) => {
                let username = optional_var("SMTP_USER");
                let from_address = optional_var("SMTP_FROM")
                    .or_else(|| username.clone())
                    .context("SMTP_FROM or SMTP_USER must be set when SMTP_HOST is set")?;
                Some(SmtpSettings {
                    host,
                    port: parse_var("SMTP_PORT", 587)?,
                    secure: optional_var("SMTP_SECURE").map(|v| v == "true").unwrap_or(false),
                    username,
                    password: optional_var("SMTP_PASS"),
                    from_address,
                })
            }
            None => None,
        };

        let supported_locales = optional_var("SUPPORTED_LOCALES")
            .map(|v| split_list(&v))
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALES.iter().map(|l| l.to_string()).collect());

        Ok(Self {
            environment: optional_var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_var("PORT", 3000)?,
            host: optional_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url: optional_var("DATABASE_URL"),
            jwt_secret,
            cors_origins: optional_var("CORS_ORIGINS").map(|v| split_list(&v)).unwrap_or_default(),
            public_dir: PathBuf::from(optional_var("PUBLIC_DIR").unwrap_or_else(|| "public".to_string())),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            supported_locales,
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_model: optional_var("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            google_translate_url: optional_var("GOOGLE_TRANSLATE_URL")
                .unwrap_or_else(|| DEFAULT_GOOGLE_TRANSLATE_URL.to_string()),
            translation_timeout_secs: parse_var("TRANSLATION_TIMEOUT_SECS", 15)?,
            smtp,
            contact_recipient: optional_var("CONTACT_RECIPIENT"),
        })
    }

    /// Configuración mínima para pruebas: sin proveedores de pago, sin SMTP
    pub fn for_tests(public_dir: PathBuf) -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            database_url: None,
            jwt_secret: "test-secret".to_string(),
            cors_origins: Vec::new(),
            public_dir,
            max_upload_bytes: 5 * 1024 * 1024,
            supported_locales: DEFAULT_LOCALES.iter().map(|l| l.to_string()).collect(),
            openai_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            // Puerto discard: la conexión se rechaza enseguida
            google_translate_url: "http://127.0.0.1:9/translate_a/single".to_string(),
            translation_timeout_secs: 2,
            smtp: None,
            contact_recipient: None,
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match optional_var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("en, fr,,de "), vec!["en", "fr", "de"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_for_tests_has_default_locales() {
        let config = EnvironmentConfig::for_tests(PathBuf::from("/tmp"));
        assert_eq!(config.supported_locales, vec!["en", "fr", "de", "es"]);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.server_url(), "127.0.0.1:0");
    }
}
