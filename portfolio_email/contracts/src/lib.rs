use std::future::Future;

use portfolio_models::{email_address::EmailAddressWithName, oauth2::OAuth2AccessToken};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Send an email through the relay, authenticating the SMTP session with
    /// the given access token.
    ///
    /// Returns `false` if the relay did not accept the message.
    fn send(
        &self,
        email: Email,
        access_token: OAuth2AccessToken,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub body: String,
    pub content_type: ContentType,
    pub reply_to: Option<EmailAddressWithName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(
        mut self,
        email: Email,
        access_token: OAuth2AccessToken,
        result: bool,
    ) -> Self {
        self.expect_send()
            .once()
            .with(
                mockall::predicate::eq(email),
                mockall::predicate::eq(access_token),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
