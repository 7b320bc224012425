use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use portfolio_auth_contracts::{AuthAccessTokenError, AuthAccessTokenService};
use portfolio_di::Build;
use portfolio_extern_contracts::oauth2::{OAuth2ApiService, OAuth2RefreshError};
use portfolio_models::oauth2::{OAuth2AccessToken, OAuth2Credentials, OAuth2TokenResponse};
use portfolio_shared_contracts::time::TimeService;
use portfolio_utils::trace_instrument;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Build)]
pub struct AuthAccessTokenServiceImpl<Time, OAuth2Api> {
    time: Time,
    oauth2_api: OAuth2Api,
    config: AuthServiceConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub credentials: Arc<OAuth2Credentials>,
    /// Reuse access tokens until they expire instead of requesting a new one
    /// for every message.
    pub cache_access_token: bool,
    /// Cached tokens are refreshed this long before the authority considers
    /// them expired.
    pub expiry_margin: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedAccessToken>>,
}

#[derive(Debug)]
struct CachedAccessToken {
    access_token: OAuth2AccessToken,
    expires_at: DateTime<Utc>,
}

impl<Time, OAuth2Api> AuthAccessTokenService for AuthAccessTokenServiceImpl<Time, OAuth2Api>
where
    Time: TimeService,
    OAuth2Api: OAuth2ApiService,
{
    #[trace_instrument(skip(self))]
    async fn get_access_token(&self) -> Result<OAuth2AccessToken, AuthAccessTokenError> {
        if !self.config.cache_access_token {
            return self.refresh().await.map(|response| response.access_token);
        }

        let now = self.time.now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard.as_ref().filter(|c| now < c.expires_at) {
            return Ok(cached.access_token.clone());
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard.as_ref().filter(|c| now < c.expires_at) {
            return Ok(cached.access_token.clone());
        }

        let response = self.refresh().await?;

        // Lifetimes chrono cannot represent are treated like missing ones.
        *cache_guard = response.expires_in.and_then(|expires_in| {
            let ttl = expires_in.saturating_sub(self.config.expiry_margin);
            let Some(expires_at) = TimeDelta::from_std(ttl)
                .ok()
                .and_then(|ttl| now.checked_add_signed(ttl))
            else {
                warn!(?expires_in, "access token lifetime out of range, not caching");
                return None;
            };
            debug!(%expires_at, "caching access token");
            Some(CachedAccessToken {
                access_token: response.access_token.clone(),
                expires_at,
            })
        });

        Ok(response.access_token)
    }
}

impl<Time, OAuth2Api> AuthAccessTokenServiceImpl<Time, OAuth2Api>
where
    OAuth2Api: OAuth2ApiService,
{
    async fn refresh(&self) -> Result<OAuth2TokenResponse, AuthAccessTokenError> {
        self.oauth2_api
            .refresh_access_token((*self.config.credentials).clone())
            .await
            .map_err(|err| match err {
                OAuth2RefreshError::Rejected => AuthAccessTokenError::Rejected,
                OAuth2RefreshError::Other(err) => err.into(),
            })
    }
}
