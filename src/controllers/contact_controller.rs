use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::models::inquiry::ContactInquiry;
use crate::services::mail_service::Mailer;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct ContactController {
    mailer: Option<Arc<dyn Mailer>>,
    recipient: Option<String>,
}

impl ContactController {
    pub fn new(mailer: Option<Arc<dyn Mailer>>, recipient: Option<String>) -> Self {
        Self { mailer, recipient }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.mailer.clone(), state.config.contact_recipient.clone())
    }

    /// Validar la consulta y reenviarla por email al concesionario
    pub async fn send_inquiry(&self, inquiry: ContactInquiry) -> AppResult<ApiResponse<()>> {
        inquiry.validate()?;

        let (Some(mailer), Some(recipient)) = (&self.mailer, &self.recipient) else {
            warn!("⚠️ Consulta de contacto recibida sin SMTP configurado");
            return Err(AppError::ServiceUnavailable(
                "Contact form is not available right now".to_string(),
            ));
        };

        mailer
            .send(recipient, &inquiry.subject(), &inquiry.html_body(), &inquiry.text_body())
            .await
            .map_err(|e| {
                error!("❌ Error enviando consulta de {}: {}", inquiry.email, e);
                AppError::from(e)
            })?;

        info!("📨 Consulta de {} reenviada", inquiry.full_name());
        Ok(ApiResponse::message("Message sent successfully!".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mail_service::MailError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, body_html: &str, _body_text: &str) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Send("relay refused".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body_html.to_string()));
            Ok(())
        }
    }

    fn inquiry(message: &str) -> ContactInquiry {
        ContactInquiry {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_inquiry_is_mailed_to_recipient() {
        let mailer = Arc::new(RecordingMailer::default());
        let controller = ContactController::new(Some(mailer.clone()), Some("sales@example.com".to_string()));

        let response = controller
            .send_inquiry(inquiry("Is the 911 still <available>?"))
            .await
            .unwrap();
        assert!(response.success);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "sales@example.com");
        assert_eq!(sent[0].1, "New Inquiry from Ada Lovelace");
        assert!(sent[0].2.contains("&lt;available&gt;"));
    }

    #[tokio::test]
    async fn test_invalid_inquiry_is_not_sent() {
        let mailer = Arc::new(RecordingMailer::default());
        let controller = ContactController::new(Some(mailer.clone()), Some("sales@example.com".to_string()));

        let result = controller.send_inquiry(inquiry("short")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_mailer_is_unavailable() {
        let controller = ContactController::new(None, Some("sales@example.com".to_string()));
        let result = controller.send_inquiry(inquiry("Is the 911 still available?")).await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_send_failure_is_mail_error() {
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..Default::default()
        });
        let controller = ContactController::new(Some(mailer), Some("sales@example.com".to_string()));

        let result = controller.send_inquiry(inquiry("Is the 911 still available?")).await;
        assert!(matches!(result, Err(AppError::Mail(_))));
    }
}
