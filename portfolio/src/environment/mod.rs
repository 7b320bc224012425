use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use portfolio_api_rest::RestServerConfig;
use portfolio_auth_impl::AuthServiceConfig;
use portfolio_config::Config;
use portfolio_core_contact_impl::ContactFeatureConfig;
use portfolio_di::provider;
use portfolio_models::oauth2::OAuth2Credentials;
use types::Email;

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        email: Email,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Auth
            AuthServiceConfig,

            // Core
            ContactFeatureConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email) -> Self {
        Self {
            _cache: Default::default(),
            email,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Auth
        auth_service_config: AuthServiceConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            host: config.http.host,
            port: config.http.port,
            allowed_origin: HeaderValue::from_str(&config.http.allowed_origin)
                .context("Invalid allowed origin")?,
        };

        // Auth
        let auth_service_config = AuthServiceConfig {
            credentials: Arc::new(OAuth2Credentials {
                client_id: config.oauth2.client_id.clone(),
                client_secret: config.oauth2.client_secret.clone(),
                refresh_token: config.oauth2.refresh_token.clone(),
                auth_url: config.oauth2.auth_url.clone(),
                token_url: config.oauth2.token_url.clone(),
            }),
            cache_access_token: config.oauth2.cache_access_token,
            expiry_margin: config.oauth2.expiry_margin.into(),
        };

        // Core
        let contact_feature_config = ContactFeatureConfig {
            email: config.contact.email.clone().into(),
            escape_html: config.contact.escape_html,
        };

        Ok(Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Auth
            auth_service_config,

            // Core
            contact_feature_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use portfolio_di::Provide;
    use portfolio_email_impl::EmailServiceImpl;
    use types::{ContactFeature, RestServer};

    use super::*;

    fn make_provider() -> Provider {
        let config = portfolio_config::load_dev_config().unwrap();
        let config_provider = ConfigProvider::new(&config).unwrap();
        let email = EmailServiceImpl::new(&config.email.smtp_url, config.email.from).unwrap();

        Provider::new(config_provider, email)
    }

    #[test]
    fn provide_rest_server() {
        let mut provider = make_provider();
        let _: RestServer = provider.provide();
    }

    #[test]
    fn provide_contact_feature() {
        let mut provider = make_provider();
        let _: ContactFeature = provider.provide();
    }

    #[test]
    fn invalid_allowed_origin() {
        let mut config = portfolio_config::load_dev_config().unwrap();
        config.http.allowed_origin = "bad\norigin".into();

        assert!(ConfigProvider::new(&config).is_err());
    }
}
