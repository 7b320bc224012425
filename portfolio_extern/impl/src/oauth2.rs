use anyhow::anyhow;
use oauth2::{
    basic::BasicClient, AuthUrl, ClientId, ClientSecret, RefreshToken, RequestTokenError,
    TokenResponse, TokenUrl,
};
use portfolio_di::Build;
use portfolio_extern_contracts::oauth2::{OAuth2ApiService, OAuth2RefreshError};
use portfolio_models::oauth2::{OAuth2AccessToken, OAuth2Credentials, OAuth2TokenResponse};
use portfolio_utils::trace_instrument;

use crate::http::USER_AGENT;

#[derive(Debug, Clone, Copy, Default, Build)]
pub struct OAuth2ApiServiceImpl;

impl OAuth2ApiService for OAuth2ApiServiceImpl {
    #[trace_instrument(skip(self))]
    async fn refresh_access_token(
        &self,
        credentials: OAuth2Credentials,
    ) -> Result<OAuth2TokenResponse, OAuth2RefreshError> {
        let client = BasicClient::new(
            ClientId::new(credentials.client_id),
            Some(ClientSecret::new(credentials.client_secret.0)),
            AuthUrl::from_url(credentials.auth_url),
            Some(TokenUrl::from_url(credentials.token_url)),
        );

        let response = client
            .exchange_refresh_token(&RefreshToken::new(credentials.refresh_token.0))
            .request_async(http_client)
            .await
            .map_err(|err| match err {
                RequestTokenError::ServerResponse(_) => OAuth2RefreshError::Rejected,
                err => anyhow!(err)
                    .context("Failed to exchange refresh token")
                    .into(),
            })?;

        Ok(OAuth2TokenResponse {
            access_token: OAuth2AccessToken::new(response.access_token().secret().as_str()),
            expires_in: response.expires_in(),
        })
    }
}

async fn http_client(
    mut request: oauth2::HttpRequest,
) -> Result<oauth2::HttpResponse, oauth2::reqwest::AsyncHttpClientError> {
    request.headers.insert(
        oauth2::http::header::USER_AGENT,
        oauth2::http::HeaderValue::from_static(USER_AGENT),
    );
    oauth2::reqwest::async_http_client(request).await
}
