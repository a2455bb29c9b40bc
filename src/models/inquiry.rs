//! Modelo de consulta de contacto
//!
//! Las consultas no se persisten: se validan y se envían por email.

use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

/// Consulta enviada desde el formulario de contacto
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactInquiry {
    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub first_name: String,

    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

impl ContactInquiry {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn subject(&self) -> String {
        format!("New Inquiry from {}", self.full_name())
    }

    /// Cuerpo en texto plano
    pub fn text_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
            self.full_name(),
            self.email.trim(),
            self.message
        )
    }

    /// Cuerpo HTML con la entrada del usuario escapada
    pub fn html_body(&self) -> String {
        format!(
            "<h3>New Inquiry from Website</h3>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <br/>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n",
            escape_html(&self.full_name()),
            escape_html(self.email.trim()),
            escape_html(&self.message).replace('\n', "<br>")
        )
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry(message: &str) -> ContactInquiry {
        ContactInquiry {
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            email: "ana@example.com".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validation_requires_ten_char_message() {
        assert!(inquiry("Short").validate().is_err());
        assert!(inquiry("Is the 911 still available?").validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_email() {
        let mut bad = inquiry("Is the 911 still available?");
        bad.email = "not-an-email".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_subject_and_bodies() {
        let inquiry = inquiry("Hello <b>there</b>\nSecond line");
        assert_eq!(inquiry.subject(), "New Inquiry from Ana García");
        assert!(inquiry.text_body().contains("Email: ana@example.com"));

        let html = inquiry.html_body();
        assert!(html.contains("Hello &lt;b&gt;there&lt;/b&gt;<br>Second line"));
        assert!(!html.contains("<b>there"));
    }
}
