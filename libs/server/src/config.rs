use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use deepculture_ai::ChatCompletionConfig;
use deepculture_ai::types::{DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "~/.deepculture/config.toml";
pub const DEFAULT_LOG_DIR: &str = "CHATROOM";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

pub const ENV_API_KEY: &str = "MISTRAL_API_KEY";
pub const ENV_ENDPOINT: &str = "DEEPCULTURE_ENDPOINT";
pub const ENV_MODEL: &str = "DEEPCULTURE_MODEL";
pub const ENV_LOG_DIR: &str = "DEEPCULTURE_LOG_DIR";

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ServeCliFlags {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub log_dir: Option<PathBuf>,
}

/// Process-wide settings, built once at startup and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: API_KEY_PLACEHOLDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>, cli: &ServeCliFlags) -> Result<Self> {
        Self::load_with_env(config_path, cli, |name| std::env::var(name).ok())
    }

    pub fn load_with_env(
        config_path: Option<&Path>,
        cli: &ServeCliFlags,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);

        let persisted = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|error| anyhow!("failed to read config {}: {error}", path.display()))?;
            PersistedConfig::parse(&text)
                .map_err(|error| anyhow!("failed to parse config {}: {error}", path.display()))?
        } else {
            PersistedConfig::default()
        };

        let mut config = persisted.into_runtime(env);
        config.apply_cli_overrides(cli);
        config.normalize_paths();
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(self.endpoint.trim())
            .map_err(|error| anyhow!("invalid endpoint {:?}: {error}", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "endpoint must use http or https, got {}",
                url.scheme()
            ));
        }

        if self.model.trim().is_empty() {
            return Err(anyhow!("model cannot be empty"));
        }

        if self.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than zero"));
        }

        if self.log_dir.as_os_str().is_empty() {
            return Err(anyhow!("log directory cannot be empty"));
        }

        Ok(())
    }

    pub fn uses_placeholder_key(&self) -> bool {
        self.api_key.trim().is_empty() || self.api_key == API_KEY_PLACEHOLDER
    }

    pub fn completion_config(&self) -> ChatCompletionConfig {
        ChatCompletionConfig::new(self.api_key.clone())
            .with_endpoint(self.endpoint.trim())
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
    }

    fn apply_cli_overrides(&mut self, cli: &ServeCliFlags) {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(api_key) = &cli.api_key {
            self.api_key = api_key.clone();
        }
        if let Some(model) = &cli.model {
            self.model = model.clone();
        }
        if let Some(max_tokens) = cli.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(log_dir) = &cli.log_dir {
            self.log_dir = log_dir.clone();
        }
    }

    fn normalize_paths(&mut self) {
        self.log_dir = expand_tilde_path(&self.log_dir);
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedConfig {
    #[serde(default)]
    upstream: PersistedUpstream,
    #[serde(default)]
    session_log: PersistedSessionLog,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedUpstream {
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
struct PersistedSessionLog {
    #[serde(default)]
    dir: Option<PathBuf>,
}

impl PersistedConfig {
    fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    // File values first, then environment for whatever the file left unset,
    // then built-in defaults.
    fn into_runtime(self, env: impl Fn(&str) -> Option<String>) -> AppConfig {
        let defaults = AppConfig::default();
        let non_empty = |value: Option<String>| value.filter(|value| !value.trim().is_empty());

        AppConfig {
            endpoint: non_empty(self.upstream.endpoint)
                .or_else(|| non_empty(env(ENV_ENDPOINT)))
                .unwrap_or(defaults.endpoint),
            api_key: non_empty(self.upstream.api_key)
                .or_else(|| non_empty(env(ENV_API_KEY)))
                .unwrap_or(defaults.api_key),
            model: non_empty(self.upstream.model)
                .or_else(|| non_empty(env(ENV_MODEL)))
                .unwrap_or(defaults.model),
            max_tokens: self.upstream.max_tokens.unwrap_or(defaults.max_tokens),
            log_dir: self
                .session_log
                .dir
                .or_else(|| non_empty(env(ENV_LOG_DIR)).map(PathBuf::from))
                .unwrap_or(defaults.log_dir),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    expand_tilde_path(Path::new(DEFAULT_CONFIG_PATH))
}

fn expand_tilde_path(path: &Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(stripped),
        None => path.to_path_buf(),
    }
}
