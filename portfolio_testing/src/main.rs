use std::net::IpAddr;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use portfolio_testing::oauth2::{self, FakeAuthorityConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::OAuth2 {
            host,
            port,
            client_id,
            client_secret,
            refresh_token,
            expires_in,
            unavailable,
        } => {
            let config = FakeAuthorityConfig {
                client_id,
                client_secret,
                refresh_token,
                expires_in,
                unavailable,
            };
            oauth2::start_server(host, port, config).await?
        }
        Command::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                env!("CARGO_BIN_NAME"),
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the oauth2 testing server
    #[clap(name = "oauth2")]
    OAuth2 {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, default_value = "8002")]
        port: u16,
        #[arg(long, default_value = "client-id")]
        client_id: String,
        #[arg(long, default_value = "client-secret")]
        client_secret: String,
        #[arg(long, default_value = "refresh-token")]
        refresh_token: String,
        /// Lifetime of issued access tokens in seconds
        #[arg(long, default_value = "3599")]
        expires_in: u64,
        /// Fail every token request with a plain text 503
        #[arg(long)]
        unavailable: bool,
    },
    /// Generate shell completions
    Completion {
        /// The shell to generate completions for
        #[clap(value_enum)]
        shell: Shell,
    },
}
