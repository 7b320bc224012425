use std::time::Duration;

use url::Url;

use crate::Sensitive;

/// Everything needed to exchange the long-lived refresh token for an access
/// token at the OAuth2 authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Credentials {
    pub client_id: String,
    pub client_secret: Sensitive<String>,
    pub refresh_token: Sensitive<String>,
    pub auth_url: Url,
    pub token_url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2AccessToken(Sensitive<String>);

impl OAuth2AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Sensitive(secret.into()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2TokenResponse {
    pub access_token: OAuth2AccessToken,
    /// Lifetime of the access token, if reported by the authority.
    pub expires_in: Option<Duration>,
}
