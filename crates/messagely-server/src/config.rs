use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use messagely_directory::{AuthPolicy, DirectoryConfig, HashCost};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl: chrono::Duration,
    pub directory: DirectoryConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = get("MESSAGELY_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("MESSAGELY_JWT_SECRET is unset or still a placeholder");
        }

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: parse_or(&get, "MESSAGELY_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&get, "MESSAGELY_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&get, "MESSAGELY_HASH_PARALLELISM", defaults.parallelism)?,
        };

        let auth_policy = match get("MESSAGELY_AUTH_POLICY") {
            Some(raw) => raw.parse()?,
            None => AuthPolicy::default(),
        };

        let ttl_days: i64 = parse_or(&get, "MESSAGELY_TOKEN_TTL_DAYS", 30)?;

        Ok(Self {
            jwt_secret,
            db_path: get("MESSAGELY_DB_PATH").unwrap_or_else(|| "messagely.db".into()).into(),
            host: get("MESSAGELY_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "MESSAGELY_PORT", 3000)?,
            token_ttl: chrono::Duration::days(ttl_days),
            directory: DirectoryConfig {
                hash_cost,
                auth_policy,
            },
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("Invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}
