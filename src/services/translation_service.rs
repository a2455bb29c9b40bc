//! Traducción multilingüe de descripciones
//!
//! Traduce un texto a todos los idiomas configurados en paralelo. Cada idioma
//! recorre una cadena ordenada de proveedores (OpenAI si hay API key, luego
//! Google gratuito); si todos fallan se usa el texto original. Los fallos de
//! proveedor nunca salen de este módulo.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EnvironmentConfig;
use crate::models::vehicle::{LocaleTranslation, Translations};
use crate::services::google_translator::GoogleFreeTranslator;
use crate::services::openai_translator::OpenAiTranslator;

/// Errores de un proveedor de traducción
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty translation")]
    EmptyResponse,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Proveedor de traducción con interfaz uniforme
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(&self, text: &str, target_locale: &str) -> Result<String, ProviderError>;
}

/// Motor de traducción con cadena de proveedores inyectada
#[derive(Clone)]
pub struct TranslationService {
    providers: Vec<Arc<dyn TranslationProvider>>,
    locales: Vec<String>,
    attempt_timeout: Duration,
}

impl TranslationService {
    pub fn new(
        providers: Vec<Arc<dyn TranslationProvider>>,
        locales: Vec<String>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            locales,
            attempt_timeout,
        }
    }

    /// Cadena por defecto: OpenAI (si hay API key) → Google gratuito
    pub fn from_config(config: &EnvironmentConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.translation_timeout_secs);
        let mut providers: Vec<Arc<dyn TranslationProvider>> = Vec::new();

        match &config.openai_api_key {
            Some(api_key) => {
                info!("🤖 Traducción primaria: OpenAI ({})", config.openai_model);
                providers.push(Arc::new(OpenAiTranslator::new(
                    api_key.clone(),
                    config.openai_model.clone(),
                    timeout,
                )?));
            }
            None => info!("ℹ️ OPENAI_API_KEY no configurada, solo traductor gratuito"),
        }
        providers.push(Arc::new(GoogleFreeTranslator::new(
            config.google_translate_url.clone(),
            timeout,
        )?));

        Ok(Self::new(providers, config.supported_locales.clone(), timeout))
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Traducir a todos los idiomas. Texto vacío o ausente → mapa vacío.
    pub async fn translate_all(&self, source_text: Option<&str>) -> Translations {
        let Some(text) = source_text.filter(|t| !t.trim().is_empty()) else {
            return Translations::new();
        };

        info!("🌍 Traduciendo descripción a {} idiomas", self.locales.len());

        let results = futures::future::join_all(
            self.locales
                .iter()
                .map(|locale| async move { (locale.clone(), self.translate_one(text, locale).await) }),
        )
        .await;

        results
            .into_iter()
            .map(|(locale, description)| (locale, LocaleTranslation { description }))
            .collect()
    }

    /// Traducir a un idioma; nunca falla, en el peor caso devuelve `text`.
    pub async fn translate_one(&self, text: &str, locale: &str) -> String {
        for provider in &self.providers {
            let attempt = tokio::time::timeout(self.attempt_timeout, provider.translate(text, locale)).await;

            let outcome = match attempt {
                Ok(Ok(translated)) if !translated.trim().is_empty() => {
                    debug!("✅ {} tradujo a {}", provider.name(), locale);
                    return translated.trim().to_string();
                }
                Ok(Ok(_)) => ProviderError::EmptyResponse,
                Ok(Err(e)) => e,
                Err(_) => ProviderError::Timeout(self.attempt_timeout),
            };

            warn!(
                "⚠️ Traducción con {} falló para {}: {}",
                provider.name(),
                locale,
                outcome
            );
        }

        warn!("⚠️ Sin traducción para {}, se usa el texto original", locale);
        text.to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) enum Mode {
        Suffix,
        Fail,
        Empty,
        Hang,
    }

    pub(crate) struct MockProvider {
        pub mode: Mode,
        pub calls: AtomicUsize,
        pub delay: Duration,
        in_flight: AtomicUsize,
        pub max_in_flight: AtomicUsize,
    }

    impl MockProvider {
        pub fn new(mode: Mode) -> Self {
            Self {
                mode,
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        pub fn with_delay(mode: Mode, delay: Duration) -> Self {
            Self { delay, ..Self::new(mode) }
        }
    }

    #[async_trait]
    impl TranslationProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn translate(&self, text: &str, target_locale: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if matches!(self.mode, Mode::Hang) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            } else if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.mode {
                Mode::Suffix => Ok(format!("{}_{}", text, target_locale)),
                Mode::Fail => Err(ProviderError::Api {
                    status: 429,
                    body: "quota exceeded".to_string(),
                }),
                Mode::Empty => Ok("   ".to_string()),
                Mode::Hang => unreachable!(),
            }
        }
    }

    fn locales() -> Vec<String> {
        ["en", "fr", "de", "es"].iter().map(|l| l.to_string()).collect()
    }

    fn service(providers: Vec<Arc<dyn TranslationProvider>>) -> TranslationService {
        TranslationService::new(providers, locales(), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_one_entry_per_locale() {
        let translations = service(vec![Arc::new(MockProvider::new(Mode::Suffix))])
            .translate_all(Some("Pristine condition"))
            .await;

        assert_eq!(translations.len(), 4);
        assert_eq!(translations["fr"].description, "Pristine condition_fr");
        assert!(translations.values().all(|t| !t.description.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_source_is_noop() {
        let provider = Arc::new(MockProvider::new(Mode::Suffix));
        let service = service(vec![provider.clone()]);

        assert!(service.translate_all(None).await.is_empty());
        assert!(service.translate_all(Some("")).await.is_empty());
        assert!(service.translate_all(Some("   ")).await.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_providers_failing_returns_source() {
        let translations = service(vec![
            Arc::new(MockProvider::new(Mode::Fail)),
            Arc::new(MockProvider::new(Mode::Fail)),
        ])
        .translate_all(Some("Pristine condition"))
        .await;

        assert_eq!(translations.len(), 4);
        for translation in translations.values() {
            assert_eq!(translation.description, "Pristine condition");
        }
    }

    #[tokio::test]
    async fn test_fallback_keeps_source_verbatim() {
        let provider = Arc::new(MockProvider::new(Mode::Fail));
        let translations = service(vec![provider.clone()])
            .translate_all(Some("  Pristine condition\n"))
            .await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        for translation in translations.values() {
            assert_eq!(translation.description, "  Pristine condition\n");
        }
    }

    #[tokio::test]
    async fn test_no_providers_is_passthrough() {
        let translations = service(vec![]).translate_all(Some("Pristine condition")).await;
        assert_eq!(translations["en"].description, "Pristine condition");
        assert_eq!(translations["fr"].description, "Pristine condition");
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_secondary() {
        let primary = Arc::new(MockProvider::new(Mode::Fail));
        let secondary = Arc::new(MockProvider::new(Mode::Suffix));
        let translations = service(vec![primary.clone(), secondary.clone()])
            .translate_all(Some("Low mileage"))
            .await;

        assert_eq!(translations["de"].description, "Low mileage_de");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 4);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = Arc::new(MockProvider::new(Mode::Suffix));
        let secondary = Arc::new(MockProvider::new(Mode::Suffix));
        service(vec![primary.clone(), secondary.clone()])
            .translate_all(Some("Low mileage"))
            .await;

        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_response_falls_back() {
        let translations = service(vec![
            Arc::new(MockProvider::new(Mode::Empty)),
            Arc::new(MockProvider::new(Mode::Suffix)),
        ])
        .translate_all(Some("Full service history"))
        .await;

        assert_eq!(translations["es"].description, "Full service history_es");
    }

    #[tokio::test]
    async fn test_hanging_primary_times_out() {
        let translations = service(vec![
            Arc::new(MockProvider::new(Mode::Hang)),
            Arc::new(MockProvider::new(Mode::Suffix)),
        ])
        .translate_all(Some("One owner"))
        .await;

        assert_eq!(translations["en"].description, "One owner_en");
    }

    #[tokio::test]
    async fn test_locales_are_translated_concurrently() {
        let provider = Arc::new(MockProvider::with_delay(Mode::Suffix, Duration::from_millis(50)));
        service(vec![provider.clone()]).translate_all(Some("Garage kept")).await;

        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 4);
    }
}
