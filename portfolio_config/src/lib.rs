use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use portfolio_models::{email_address::EmailAddressWithName, Sensitive};
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");
pub const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.dev.toml");

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_ENV: &str = "PORTFOLIO_CONFIG";
pub const ENV_PREFIX: &str = "PORTFOLIO";

/// Load the bundled defaults, then the files listed in `PORTFOLIO_CONFIG` and
/// finally the `PORTFOLIO__<SECTION>__<KEY>` environment variables.
pub fn load() -> anyhow::Result<Config> {
    let extra_paths = std::env::var(CONFIG_PATHS_ENV).unwrap_or_default();
    let paths = std::iter::once(DEFAULT_CONFIG_PATH)
        .chain(extra_paths.split(':').filter(|path| !path.is_empty()))
        .collect::<Vec<_>>();

    load_paths(&paths, environment())
}

pub fn load_dev_config() -> anyhow::Result<Config> {
    load_paths(&[DEFAULT_CONFIG_PATH, DEV_CONFIG_PATH], environment())
}

pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

pub fn load_paths(paths: &[impl AsRef<Path>], environment: Environment) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(environment)
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub oauth2: OAuth2Config,
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Value of the `Access-Control-Allow-Origin` header.
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    /// Relay account, used both as sender and as XOAUTH2 user.
    pub from: EmailAddressWithName,
}

#[derive(Debug, Deserialize)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: Sensitive<String>,
    pub refresh_token: Sensitive<String>,
    pub auth_url: Url,
    pub token_url: Url,
    #[serde(default)]
    pub cache_access_token: bool,
    pub expiry_margin: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub email: EmailAddressWithName,
    #[serde(default = "default_true")]
    pub escape_html: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use config::Map;
    use pretty_assertions::assert_eq;

    use super::*;

    fn no_environment() -> Environment {
        environment().source(Some(Map::new()))
    }

    #[test]
    fn load_dev_config() {
        let config = load_paths(&[DEFAULT_CONFIG_PATH, DEV_CONFIG_PATH], no_environment()).unwrap();

        assert_eq!(config.http.allowed_origin, "*");
        assert!(!config.oauth2.cache_access_token);
        assert!(config.contact.escape_html);
        assert_eq!(*config.oauth2.client_secret, "client-secret");
    }

    #[test]
    fn defaults_lack_credentials() {
        let result = load_paths(&[DEFAULT_CONFIG_PATH], no_environment());

        assert!(result.is_err());
    }

    #[test]
    fn environment_overrides_files() {
        let env = Map::from([
            ("PORTFOLIO__HTTP__PORT".to_owned(), "9000".to_owned()),
            (
                "PORTFOLIO__HTTP__ALLOWED_ORIGIN".to_owned(),
                "https://jane.example.com".to_owned(),
            ),
            (
                "PORTFOLIO__OAUTH2__REFRESH_TOKEN".to_owned(),
                "from-env".to_owned(),
            ),
            (
                "PORTFOLIO__OAUTH2__CACHE_ACCESS_TOKEN".to_owned(),
                "true".to_owned(),
            ),
            ("PORTFOLIO__OAUTH2__EXPIRY_MARGIN".to_owned(), "2m".to_owned()),
        ]);

        let config = load_paths(
            &[DEFAULT_CONFIG_PATH, DEV_CONFIG_PATH],
            environment().source(Some(env)),
        )
        .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.allowed_origin, "https://jane.example.com");
        assert_eq!(*config.oauth2.refresh_token, "from-env");
        assert!(config.oauth2.cache_access_token);
        assert_eq!(config.oauth2.expiry_margin.as_secs(), 120);
    }

    #[test]
    fn missing_file() {
        let result = load_paths(&["/nonexistent/portfolio.toml"], no_environment());

        assert!(result.is_err());
    }
}
