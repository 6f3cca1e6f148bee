/*
[INPUT]:  Optional YAML file, STRADDLE_* environment variables, CLI overrides
[OUTPUT]: Resolved CLI configuration and the matching ClientConfig
[POS]:    Configuration layer - layered settings for the CLI
[UPDATE]: When adding configuration keys
*/

use std::path::Path;
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment as EnvSource, File, FileFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use straddle_adapter::{ClientConfig, Environment};

/// Settings shared by every subcommand
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment's base URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Default `Straddle-Account-Id`
    #[serde(default)]
    pub account_id: Option<String>,
    /// Reject responses with values this client does not know
    #[serde(default)]
    pub strict: bool,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

/// Printable view of [`CliConfig`] with the API key masked
#[derive(Debug, Serialize)]
pub struct ResolvedConfig<'a> {
    pub api_key: Option<String>,
    pub environment: Environment,
    pub base_url: &'a str,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub account_id: Option<&'a str>,
    pub strict: bool,
}

impl CliConfig {
    /// Layer the YAML file (when given) under `STRADDLE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }
        builder = builder.add_source(EnvSource::with_prefix("STRADDLE").try_parsing(true));
        Self::from_builder(builder)
            .with_context(|| match path {
                Some(path) => format!("load configuration from {}", path.display()),
                None => "load configuration from environment".to_string(),
            })
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Command-line flags win over file and environment
    pub fn with_overrides(mut self, sandbox: bool, account_id: Option<String>) -> Self {
        if sandbox {
            self.environment = Environment::Sandbox;
        }
        if account_id.is_some() {
            self.account_id = account_id;
        }
        self
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .context("api_key is not configured (set STRADDLE_API_KEY or api_key in the config file)")?;

        let mut config = ClientConfig::new(api_key)
            .with_environment(self.environment)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_retries(self.max_retries)
            .with_strict_response_validation(self.strict);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(account_id) = &self.account_id {
            config = config.with_straddle_account_id(account_id.clone());
        }
        Ok(config)
    }

    pub fn resolved(&self) -> ResolvedConfig<'_> {
        ResolvedConfig {
            api_key: self.api_key.as_deref().map(mask_secret),
            environment: self.environment,
            base_url: self
                .base_url
                .as_deref()
                .unwrap_or_else(|| self.environment.base_url()),
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            account_id: self.account_id.as_deref(),
            strict: self.strict,
        }
    }
}

/// Keep the last four characters of long secrets
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
