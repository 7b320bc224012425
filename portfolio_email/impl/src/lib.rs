use lettre::{
    message::{header, MessageBuilder},
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{ContentType, Email, EmailService};
use portfolio_models::{email_address::EmailAddressWithName, oauth2::OAuth2AccessToken};
use portfolio_utils::{trace_instrument, Apply};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    smtp_url: String,
}

impl EmailServiceImpl {
    /// The relay authenticates with XOAUTH2, so a new SMTP session is opened
    /// for every message with the access token of that send.
    pub fn new(smtp_url: &str, from: EmailAddressWithName) -> anyhow::Result<Self> {
        AsyncSmtpTransport::<Tokio1Executor>::from_url(smtp_url)?;

        Ok(Self {
            from,
            smtp_url: smtp_url.into(),
        })
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .body(email.body)
            .map_err(Into::into)
    }
}

impl EmailService for EmailServiceImpl {
    #[trace_instrument(skip(self, access_token))]
    async fn send(&self, email: Email, access_token: OAuth2AccessToken) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(&self.smtp_url)?
            .credentials(Credentials::new(
                self.from.email().into(),
                access_token.secret().into(),
            ))
            .authentication(vec![Mechanism::Xoauth2])
            .build();

        debug!(from = %self.from, "sending email");

        transport
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn make_sut() -> EmailServiceImpl {
        EmailServiceImpl::new(
            "smtp://127.0.0.1:2525",
            "Portfolio <relay@example.com>".parse().unwrap(),
        )
        .unwrap()
    }

    fn make_email(reply_to: Option<&str>) -> Email {
        Email {
            recipient: "owner@example.com".parse().unwrap(),
            subject: "Portfolio Contact: Hello".into(),
            body: "<h3>New Contact Form Submission</h3>".into(),
            content_type: ContentType::Html,
            reply_to: reply_to.map(|x| x.parse().unwrap()),
        }
    }

    #[test]
    fn message_headers() {
        let message = make_sut()
            .build_message(make_email(Some("jane@example.com")))
            .unwrap();

        let headers = message.headers();
        assert_eq!(headers.get_raw("Subject"), Some("Portfolio Contact: Hello"));
        assert_eq!(headers.get_raw("To"), Some("owner@example.com"));
        assert_eq!(headers.get_raw("Reply-To"), Some("jane@example.com"));
        assert_eq!(
            headers.get_raw("Content-Type"),
            Some("text/html; charset=utf-8")
        );

        let envelope = message.envelope();
        assert_eq!(envelope.from().unwrap().to_string(), "relay@example.com");
        assert_eq!(
            envelope
                .to()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            ["owner@example.com"]
        );
    }

    #[test]
    fn message_without_reply_to() {
        let message = make_sut().build_message(make_email(None)).unwrap();

        assert_eq!(message.headers().get_raw("Reply-To"), None);
    }

    #[test]
    fn invalid_smtp_url() {
        let result = EmailServiceImpl::new(
            "http://relay.example.com",
            "relay@example.com".parse().unwrap(),
        );

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn relay_unreachable() {
        // nothing listens on the discard port
        let sut = EmailServiceImpl::new(
            "smtp://127.0.0.1:9",
            "relay@example.com".parse().unwrap(),
        )
        .unwrap();

        let result = sut
            .send(make_email(None), OAuth2AccessToken::new("token"))
            .await;

        assert!(result.is_err());
    }
}
