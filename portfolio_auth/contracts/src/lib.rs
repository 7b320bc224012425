use std::future::Future;

use portfolio_models::oauth2::OAuth2AccessToken;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait AuthAccessTokenService: Send + Sync + 'static {
    /// Return an access token for the mail relay account, obtained through
    /// the OAuth2 refresh token exchange.
    fn get_access_token(
        &self,
    ) -> impl Future<Output = Result<OAuth2AccessToken, AuthAccessTokenError>> + Send;
}

#[derive(Debug, Error)]
pub enum AuthAccessTokenError {
    #[error("The OAuth2 authority rejected the configured credentials.")]
    Rejected,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockAuthAccessTokenService {
    pub fn with_get_access_token(
        mut self,
        result: Result<OAuth2AccessToken, AuthAccessTokenError>,
    ) -> Self {
        self.expect_get_access_token()
            .once()
            .return_once(|| Box::pin(std::future::ready(result)));
        self
    }
}
