use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use portfolio_config::Config;
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_di::Provide;
use portfolio_models::contact::{ContactMessage, Submission, ValidationResult};

use crate::{
    email,
    environment::{types::ContactFeature, ConfigProvider, Provider},
};

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Check a submission against the contact form rules
    #[command(aliases(["v"]))]
    Validate(SubmissionArgs),
    /// Validate a submission and send it to the portfolio owner
    #[command(aliases(["s"]))]
    Send(SubmissionArgs),
}

#[derive(Debug, Args)]
pub struct SubmissionArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    message: String,
}

impl From<SubmissionArgs> for Submission {
    fn from(value: SubmissionArgs) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

impl ContactCommand {
    /// The config is only loaded for commands that need it.
    pub async fn invoke(
        self,
        load_config: impl FnOnce() -> anyhow::Result<Config>,
    ) -> anyhow::Result<()> {
        match self {
            ContactCommand::Validate(args) => validate(args.into()),
            ContactCommand::Send(args) => send(load_config()?, args.into()).await,
        }
    }
}

fn validate(submission: Submission) -> anyhow::Result<()> {
    let result = submission.validate();
    report(&result)?;
    println!("Submission is valid");
    Ok(())
}

async fn send(config: Config, submission: Submission) -> anyhow::Result<()> {
    let message = match ContactMessage::try_from(submission) {
        Ok(message) => message,
        Err(result) => return report(&result),
    };

    let email = email::connect(&config.email)?;
    let mut provider = Provider::new(ConfigProvider::new(&config)?, email);
    let contact: ContactFeature = provider.provide();

    contact
        .send_message(message)
        .await
        .context("Failed to send contact message")?;
    println!("Email sent successfully!");

    Ok(())
}

fn report(result: &ValidationResult) -> anyhow::Result<()> {
    if result.is_valid() {
        return Ok(());
    }

    for (field, error) in result.field_errors() {
        eprintln!("{field}: {error}");
    }
    bail!("Submission is invalid");
}
