use anyhow::ensure;
use clap::Subcommand;
use portfolio_auth_contracts::AuthAccessTokenService;
use portfolio_config::Config;
use portfolio_di::Provide;
use portfolio_email_contracts::{ContentType, Email, EmailService};
use portfolio_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::{
    email,
    environment::{types::AuthAccessToken, ConfigProvider, Provider},
};

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let email_service = email::connect(&config.email)?;
    let mut provider = Provider::new(ConfigProvider::new(&config)?, email_service.clone());
    let auth: AuthAccessToken = provider.provide();

    let access_token = auth.get_access_token().await?;
    info!("Obtained access token");

    let ok = email_service
        .send(
            Email {
                recipient,
                subject: "Email Deliverability Test".into(),
                body: "Email deliverability seems to be working!".into(),
                content_type: ContentType::Text,
                reply_to: None,
            },
            access_token,
        )
        .await?;

    ensure!(ok, "Failed to send email");

    Ok(())
}
