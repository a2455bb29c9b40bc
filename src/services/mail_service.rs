//! Envío de emails del formulario de contacto (SMTP con lettre)

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SmtpSettings;

/// Errores de envío de email
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("send failed: {0}")]
    Send(String),
}

/// Remitente de emails
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body_html: &str, body_text: &str) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_mailbox: Mailbox,
}

impl SmtpMailer {
    /// La conexión se abre al enviar, no aquí
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let from_mailbox: Mailbox = settings
            .from_address
            .parse()
            .map_err(|e| MailError::Address(format!("{}: {}", settings.from_address, e)))?;

        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| MailError::Connection(e.to_string()))?;

        let mut builder = builder.port(settings.port);
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        debug!("📧 Cliente SMTP inicializado para {}:{}", settings.host, settings.port);

        Ok(Self {
            transport: builder.build(),
            from_mailbox,
        })
    }
}

/// Construir un email multipart (texto + HTML)
pub fn build_message(
    from: Mailbox,
    to: &str,
    subject: &str,
    body_html: &str,
    body_text: &str,
) -> Result<Message, MailError> {
    let to_mailbox: Mailbox = to
        .parse()
        .map_err(|e| MailError::Address(format!("{}: {}", to, e)))?;

    Message::builder()
        .from(from)
        .to(to_mailbox)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(body_text.to_string()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(body_html.to_string()),
                ),
        )
        .map_err(|e| MailError::Message(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body_html: &str, body_text: &str) -> Result<(), MailError> {
        let message = build_message(self.from_mailbox.clone(), to, subject, body_html, body_text)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        info!("📧 Email enviado a {}", to);
        Ok(())
    }
}
