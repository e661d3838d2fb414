use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// YAML file with the router and the instances to mount
    #[serde(default = "default_mount_config")]
    pub mount_config: PathBuf,

    /// Directory served under every instance's asset path
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// YAML resource registry to scan; without one only the metadata
    /// skeleton of each document is served
    #[serde(default)]
    pub registry_file: Option<PathBuf>,

    /// Username to password. A non-empty map enables the login endpoint.
    #[serde(default)]
    pub credentials: HashMap<String, String>,

    /// Only serve documents to callers presenting a token issued by login
    #[serde(default)]
    pub require_token: bool,

    /// Lifetime of a login token in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Honour `?tags=` on document requests
    #[serde(default = "default_true")]
    pub query_tag_filter: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            mount_config: default_mount_config(),
            assets_dir: default_assets_dir(),
            registry_file: None,
            credentials: HashMap::new(),
            require_token: false,
            token_ttl_secs: default_token_ttl_secs(),
            query_tag_filter: default_true(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("APIMOUNT_SERVER").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.require_token && config.credentials.is_empty() {
            anyhow::bail!("require_token is set but no credentials are configured");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_ttl_secs() -> u64 {
    12 * 60 * 60
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mount_config() -> PathBuf {
    PathBuf::from("apimount.yaml")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}
