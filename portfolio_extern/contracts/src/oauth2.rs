use std::future::Future;

use portfolio_models::oauth2::{OAuth2Credentials, OAuth2TokenResponse};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait OAuth2ApiService: Send + Sync + 'static {
    /// Exchange the refresh token contained in `credentials` for a fresh
    /// access token.
    fn refresh_access_token(
        &self,
        credentials: OAuth2Credentials,
    ) -> impl Future<Output = Result<OAuth2TokenResponse, OAuth2RefreshError>> + Send;
}

#[derive(Debug, Error)]
pub enum OAuth2RefreshError {
    #[error("The authority rejected the client credentials or the refresh token.")]
    Rejected,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockOAuth2ApiService {
    pub fn with_refresh_access_token(
        mut self,
        credentials: OAuth2Credentials,
        result: Result<OAuth2TokenResponse, OAuth2RefreshError>,
    ) -> Self {
        self.expect_refresh_access_token()
            .once()
            .with(mockall::predicate::eq(credentials))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
