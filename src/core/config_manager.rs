// src/core/config_manager.rs
//! Unified configuration: defaults, optional `leadfinder.yaml`, then environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::lead_search::DEFAULT_LEADS_PER_PAGE;

pub const DEFAULT_API_URL: &str = "https://linkedin.programando.io/fetch_lead2";
pub const DEFAULT_USER_AGENT: &str = "PostmanRuntime/7.49.1";
pub const CONFIG_FILE_NAME: &str = "leadfinder.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutProfile {
    /// Give up after 10 seconds
    FailFast,
    /// Wait up to 60 seconds for large result sets
    Patient,
}

impl TimeoutProfile {
    pub fn duration(self) -> Duration {
        match self {
            TimeoutProfile::FailFast => Duration::from_secs(10),
            TimeoutProfile::Patient => Duration::from_secs(60),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeoutProfile::FailFast => "fail_fast",
            TimeoutProfile::Patient => "patient",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fail_fast" | "fail-fast" | "fast" => Some(TimeoutProfile::FailFast),
            "patient" | "slow" => Some(TimeoutProfile::Patient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub user_agent: String,
    pub timeout_profile: TimeoutProfile,
    /// Explicit timeout; wins over the profile when set
    pub timeout_seconds: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_profile: TimeoutProfile::FailFast,
            timeout_seconds: None,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        self.timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.timeout_profile.duration())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub api_response_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_response_ttl_seconds: 7200,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.api_response_ttl_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub leads_per_page: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            leads_per_page: DEFAULT_LEADS_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub name: String,
    pub database_path: PathBuf,
}

/// Per-environment section of `leadfinder.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileSection {
    database_path: Option<PathBuf>,
    upstream: Option<UpstreamConfig>,
    cache: Option<CacheConfig>,
    server: Option<ServerConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: FileSection,
    production: FileSection,
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading configuration for environment: {}", env);

        let base_dir = if env == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        let config_path = base_dir.join(CONFIG_FILE_NAME);
        let file_contents = if config_path.exists() {
            info!("Reading {}", config_path.display());
            Some(
                std::fs::read_to_string(&config_path)
                    .with_context(|| format!("Failed to read {}", config_path.display()))?,
            )
        } else {
            None
        };

        let mut config = Self::from_parts(&env, &base_dir, file_contents.as_deref())?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults overlaid with the given YAML document (if any)
    pub fn from_parts(env: &str, base_dir: &Path, yaml: Option<&str>) -> Result<Self> {
        let file: ConfigFile = match yaml {
            Some(contents) => {
                serde_yaml::from_str(contents).context("Failed to parse leadfinder.yaml")?
            }
            None => ConfigFile::default(),
        };

        let section = match env {
            "production" => file.production,
            _ => file.local,
        };

        let database_path = section
            .database_path
            .map(|p| if p.is_absolute() { p } else { base_dir.join(p) })
            .unwrap_or_else(|| base_dir.join("lead_finder.db"));

        Ok(Self {
            environment: EnvironmentConfig {
                name: env.to_string(),
                database_path,
            },
            upstream: section.upstream.unwrap_or_default(),
            cache: section.cache.unwrap_or_default(),
            server: section.server.unwrap_or_default(),
        })
    }

    /// Apply environment variable overrides through a lookup function
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LINKEDIN_API_URL") {
            self.upstream.api_url = url;
        }
        if let Some(agent) = lookup("LINKEDIN_API_USER_AGENT") {
            self.upstream.user_agent = agent;
        }
        if let Some(profile) = lookup("LINKEDIN_API_TIMEOUT_PROFILE") {
            self.upstream.timeout_profile = TimeoutProfile::parse(&profile).ok_or_else(|| {
                anyhow::anyhow!(
                    "LINKEDIN_API_TIMEOUT_PROFILE must be fail_fast or patient, got '{}'",
                    profile
                )
            })?;
        }
        if let Some(seconds) = lookup("LINKEDIN_API_TIMEOUT") {
            let seconds = seconds
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("LINKEDIN_API_TIMEOUT must be a number of seconds"))?;
            self.upstream.timeout_seconds = Some(seconds);
        }
        if let Some(ttl) = lookup("CACHE_TTL_API_RESPONSE") {
            self.cache.api_response_ttl_seconds = ttl
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("CACHE_TTL_API_RESPONSE must be a number"))?;
        }
        if let Some(per_page) = lookup("LEADS_PER_PAGE") {
            self.server.leads_per_page = per_page
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("LEADS_PER_PAGE must be a number"))?;
        }
        if let Some(port) = lookup("LEADFINDER_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("LEADFINDER_PORT must be a valid port number"))?;
        }
        if let Some(db) = lookup("LEADFINDER_DB") {
            self.environment.database_path = PathBuf::from(db);
        }
        Ok(())
    }

    /// Ensure the database directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.environment.database_path.parent() {
            crate::utils::ensure_dir_exists(db_parent).await?;
        }
        Ok(())
    }
}
