use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::RepoRef;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub report: ReportConfig,
    pub repositories: Vec<RepoRef>,
    pub mail: MailConfig,
}

/// Hosting API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub api_base_url: String,
    /// Base branches tried in order when listing merged pull requests
    pub base_branches: Vec<String>,
    pub per_page: u8,
    /// Bearer token; supplied from the environment, never from the file
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            base_branches: vec!["main".to_string(), "master".to_string()],
            per_page: 100,
            token: None,
        }
    }
}

/// Report rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Organization name shown in the document title
    pub organization: String,
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: "NEAR".to_string(),
            output_dir: PathBuf::from("reports"),
        }
    }
}

/// Mail delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub enabled: bool,
    pub client_id: Option<String>,
    /// Sending account address
    pub account: Option<String>,
    pub recipients: Vec<String>,
    pub token_url: String,
    /// Send endpoint; `{account}` is replaced with the sending account
    pub send_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            client_id: None,
            account: None,
            recipients: Vec::new(),
            token_url: "https://login.microsoftonline.com/common/oauth2/v2.0/token".to_string(),
            send_url: "https://graph.microsoft.com/v1.0/users/{account}/sendMail".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(
            path = %path.display(),
            repositories = config.repositories.len(),
            "Loaded configuration"
        );

        Ok(config)
    }
}
