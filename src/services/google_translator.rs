//! Proveedor secundario: endpoint gratuito de Google Translate
//!
//! `translate_a/single?client=gtx` devuelve arrays anidados; el primer
//! elemento es la lista de segmentos `[traducido, original, ...]`.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::services::translation_service::{ProviderError, TranslationProvider};

/// Concatenar los segmentos traducidos de la respuesta
fn parse_segments(body: &str) -> Result<String, ProviderError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("Google: {}", e)))?;

    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::MalformedResponse("Google: missing segment list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(translated)
}

#[derive(Debug)]
pub struct GoogleFreeTranslator {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleFreeTranslator {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; DealershipInventory/1.0)")
            .build()?;

        Ok(Self { base_url, client })
    }

    fn request_url(&self, text: &str, target_locale: &str) -> String {
        format!(
            "{}?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.base_url,
            urlencoding::encode(target_locale),
            urlencoding::encode(text)
        )
    }
}

#[async_trait]
impl TranslationProvider for GoogleFreeTranslator {
    fn name(&self) -> &str {
        "google-free"
    }

    async fn translate(&self, text: &str, target_locale: &str) -> Result<String, ProviderError> {
        debug!("🌐 Traduciendo a {} con Google Translate (gratuito)", target_locale);

        let response = self.client.get(self.request_url(text, target_locale)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_segments(&body)
    }
}
