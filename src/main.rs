//! Agrograph - Main Server

use agrograph::{auth::jwt::encode_jwt, Config};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agrograph")]
#[command(about = "Agricultural platform backend")]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true, env = "AGROGRAPH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config.yaml and SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Issue a bearer token for local development
    Token {
        /// Username to put in the `sub` claim
        username: String,

        /// Lifetime in seconds (defaults to auth.jwt_expiry_secs)
        #[arg(long)]
        expiry: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agrograph=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            agrograph::start_server(config).await
        }
        Commands::Token { username, expiry } => {
            let auth = config
                .auth_config
                .context("No auth configured: set auth.jwt_secret or JWT_SECRET")?;
            let token = encode_jwt(
                &username,
                &auth.jwt_secret,
                expiry.unwrap_or(auth.jwt_expiry_secs),
            )?;
            println!("{}", token);
            Ok(())
        }
    }
}
