use std::sync::Arc;

use portfolio_auth_contracts::AuthAccessTokenService;
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_di::Build;
use portfolio_email_contracts::{ContentType, Email, EmailService};
use portfolio_models::{contact::ContactMessage, email_address::EmailAddressWithName};
use portfolio_utils::trace_instrument;
use tracing::debug;

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Auth, Email> {
    auth: Auth,
    email: Email,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Mailbox of the portfolio owner which receives all contact messages.
    pub email: Arc<EmailAddressWithName>,
    pub escape_html: bool,
}

impl<Auth, EmailS> ContactFeatureService for ContactFeatureServiceImpl<Auth, EmailS>
where
    Auth: AuthAccessTokenService,
    EmailS: EmailService,
{
    #[trace_instrument(skip(self))]
    async fn send_message(&self, message: ContactMessage) -> Result<(), ContactSendMessageError> {
        let access_token = self.auth.get_access_token().await?;
        debug!("obtained access token");

        let email = Email {
            recipient: (*self.config.email).clone(),
            subject: format!("Portfolio Contact: {}", *message.subject),
            body: self.render_body(&message),
            content_type: ContentType::Html,
            reply_to: Some(message.author.email.into()),
        };

        if !self.email.send(email, access_token).await? {
            return Err(ContactSendMessageError::Send);
        }

        Ok(())
    }
}

impl<Auth, EmailS> ContactFeatureServiceImpl<Auth, EmailS> {
    fn render_body(&self, message: &ContactMessage) -> String {
        let field = |value: &str| {
            if self.config.escape_html {
                html_escape(value)
            } else {
                value.to_owned()
            }
        };

        [
            "<h3>New Contact Form Submission</h3>".to_owned(),
            format!("<p><strong>Name:</strong> {}</p>", field(&message.author.name)),
            format!(
                "<p><strong>Email:</strong> {}</p>",
                field(message.author.email.as_str())
            ),
            format!("<p><strong>Subject:</strong> {}</p>", field(&message.subject)),
            "<p><strong>Message:</strong></p>".to_owned(),
            format!("<p>{}</p>", field(&message.content)),
        ]
        .join("\n")
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
