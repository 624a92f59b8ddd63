//! Agrograph
//!
//! Backend for an agricultural platform:
//! - Farm records owned by growers
//! - Grower profiles with a profile picture and game leveling
//! - Soil sensor readings with interpretations
//! - User notifications
//!
//! Everything is persisted in a Neo4j property graph.

pub mod api;
pub mod auth;
pub mod error;
pub mod farm;
pub mod neo4j;
pub mod notifications;
pub mod profile;
pub mod soil;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::Result;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    /// Auth section; if absent every /api request is denied
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "neo4j".into(),
        }
    }
}

/// Bearer token configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 28800 = 8h)
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
}

fn default_jwt_expiry() -> u64 {
    28800
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub server_port: u16,
    /// None means deny-by-default
    pub auth_config: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. A missing file
    /// falls back to env vars and defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        // JWT_SECRET alone is enough to enable auth
        let auth_config = match (std::env::var("JWT_SECRET").ok(), yaml.auth) {
            (Some(secret), Some(auth)) => Some(AuthConfig {
                jwt_secret: secret,
                ..auth
            }),
            (Some(secret), None) => Some(AuthConfig {
                jwt_secret: secret,
                jwt_expiry_secs: default_jwt_expiry(),
            }),
            (None, auth) => auth,
        };

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            auth_config: auth_config.filter(|a| !a.jwt_secret.trim().is_empty()),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub neo4j: Arc<dyn neo4j::GraphStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Neo4j and initialise the schema
    pub async fn new(config: Config) -> Result<Self> {
        let neo4j = Arc::new(
            neo4j::client::Neo4jClient::new(
                &config.neo4j_uri,
                &config.neo4j_user,
                &config.neo4j_password,
            )
            .await?,
        );

        Ok(Self {
            neo4j,
            config: Arc::new(config),
        })
    }
}

/// Connect to the graph store and serve the HTTP API until shutdown
pub async fn start_server(config: Config) -> Result<()> {
    let port = config.server_port;
    let app_state = AppState::new(config).await?;
    tracing::info!("Connected to Neo4j");

    let token_verifier = match &app_state.config.auth_config {
        Some(auth) => {
            Some(Arc::new(auth::JwtVerifier::new(auth.jwt_secret.clone()))
                as Arc<dyn auth::TokenVerifier>)
        }
        None => {
            tracing::warn!("No auth section configured: every /api request will be denied");
            None
        }
    };

    let state = Arc::new(api::handlers::ServerState::new(
        app_state.neo4j.clone(),
        token_verifier,
    ));
    let app = api::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

// ============================================================================
// Tests
// ============================================================================
