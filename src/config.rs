use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

/// Which [`crate::domain::JokeStore`] backend to run against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    DynamoDb,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            other => Err(format!("unknown store backend '{}', expected 'memory' or 'dynamodb'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub store_backend: StoreBackend,
    pub table_name: String,
    pub aws_region: String,
    // Optional endpoint for LocalStack / DynamoDB Local
    pub localstack_endpoint: Option<String>,
    /// Fixed seed for random picks; OS entropy when unset.
    pub random_seed: Option<u64>,
    pub seed_sample_joke: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let store_backend = var("JOKES_STORE")
            .map(|s| s.parse::<StoreBackend>())
            .transpose()
            .map_err(|e| ConfigError::InvalidVar("JOKES_STORE".into(), e))?
            .unwrap_or(StoreBackend::Memory);

        let table_name = var("JOKES_TABLE_NAME").unwrap_or_else(|| "jokes".to_string());
        if table_name.trim().is_empty() {
            return Err(ConfigError::InvalidVar("JOKES_TABLE_NAME".into(), "must not be blank".into()));
        }

        let aws_region = var("AWS_DEFAULT_REGION").unwrap_or_else(|| "ca-central-1".to_string());

        let localstack_endpoint = var("AWS_ENDPOINT_URL");

        let random_seed = var("JOKES_RANDOM_SEED")
            .map(|s| s.parse::<u64>())
            .transpose()
            .map_err(|e| ConfigError::InvalidVar("JOKES_RANDOM_SEED".into(), e.to_string()))?;

        let seed_sample_joke = var("JOKES_SEED_SAMPLE")
            .map(|s| s.parse::<bool>())
            .transpose()
            .map_err(|e| ConfigError::InvalidVar("JOKES_SEED_SAMPLE".into(), e.to_string()))?
            .unwrap_or(true);

        Ok(Config {
            bind_address,
            store_backend,
            table_name,
            aws_region,
            localstack_endpoint,
            random_seed,
            seed_sample_joke,
        })
    }
}
