use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_ITERATIONS: usize = 10;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MANIFEST_PATH: &str = "mcp_manifest.json";

/// Runtime configuration, resolved from environment variables at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the completion service. Absence does not prevent
    /// startup; the first completion call fails instead.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_iterations: usize,
    pub verbose: bool,
    pub cors_origins: Vec<String>,
    /// Optional shared secret checked against `Authorization: Bearer <token>`
    /// on the invoke endpoint.
    pub invoke_secret: Option<String>,
    pub bind: SocketAddr,
    pub manifest_path: PathBuf,
    pub prompt_template_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, so tests can supply values
    /// without mutating process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_iterations = match lookup("MAX_ITERATIONS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid {
                    name: "MAX_ITERATIONS",
                    value: raw.clone(),
                })?,
            None => DEFAULT_MAX_ITERATIONS,
        };

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "HOST",
            value: host.clone(),
        })?;
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api_key: lookup("OPENAI_API_KEY").filter(|value| !value.trim().is_empty()),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_iterations,
            verbose: lookup("VERBOSE").map(|value| is_truthy(&value)).unwrap_or(false),
            cors_origins,
            invoke_secret: lookup("API_KEY").filter(|value| !value.trim().is_empty()),
            bind: SocketAddr::new(host, port),
            manifest_path: PathBuf::from(
                lookup("MANIFEST_PATH").unwrap_or_else(|| DEFAULT_MANIFEST_PATH.to_string()),
            ),
            prompt_template_path: lookup("PROMPT_TEMPLATE_PATH").map(PathBuf::from),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
