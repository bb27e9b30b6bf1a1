//! ReviewStack configuration.
//!
//! All configuration is driven by environment variables.

use std::env;
use std::time::Duration;

/// Which storage backend serves the review table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local in-memory table.
    #[default]
    Memory,
    /// Amazon DynamoDB (or any endpoint speaking its protocol).
    DynamoDb,
}

impl StorageBackend {
    /// Parse a backend name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "mem" => Some(Self::Memory),
            "dynamodb" | "dynamo" | "ddb" => Some(Self::DynamoDb),
            _ => None,
        }
    }

    /// Backend name as used in configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::DynamoDb => "dynamodb",
        }
    }
}

/// ReviewStack service configuration.
#[derive(Debug, Clone)]
pub struct ReviewsConfig {
    /// Bind address for the HTTP server.
    pub gateway_listen: String,
    /// Name of the review table.
    pub table_name: String,
    /// AWS region for the DynamoDB client.
    pub region: String,
    /// Storage backend.
    pub backend: StorageBackend,
    /// Endpoint override for the DynamoDB client.
    pub dynamodb_endpoint: Option<String>,
    /// URL of the translation service.
    pub translate_endpoint: String,
    /// API key sent to the translation service, if it needs one.
    pub translate_api_key: Option<String>,
    /// Request timeout for the translation service.
    pub translate_timeout: Duration,
    /// JSON file of reviews loaded at startup.
    pub seed_file: Option<String>,
    /// Log level.
    pub log_level: String,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            gateway_listen: "0.0.0.0:3000".to_owned(),
            table_name: "MovieReviews".to_owned(),
            region: "eu-west-1".to_owned(),
            backend: StorageBackend::Memory,
            dynamodb_endpoint: None,
            translate_endpoint: "http://localhost:5000/translate".to_owned(),
            translate_api_key: None,
            translate_timeout: Duration::from_secs(10),
            seed_file: None,
            log_level: "info".to_owned(),
        }
    }
}

impl ReviewsConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = env::var("TABLE_NAME") {
            config.table_name = v;
        }
        if let Ok(v) = env::var("REGION") {
            config.region = v;
        }
        if let Some(backend) = env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|v| StorageBackend::from_name(&v))
        {
            config.backend = backend;
        }
        config.dynamodb_endpoint = env_non_empty("DYNAMODB_ENDPOINT");
        if let Ok(v) = env::var("TRANSLATE_ENDPOINT") {
            config.translate_endpoint = v;
        }
        config.translate_api_key = env_non_empty("TRANSLATE_API_KEY");
        if let Some(secs) = env::var("TRANSLATE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.translate_timeout = Duration::from_secs(secs);
        }
        config.seed_file = env_non_empty("SEED_FILE");
        if let Ok(v) = env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
