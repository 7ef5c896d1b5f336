//! Configuration management for the tedana harness
//!
//! Precedence: defaults, then a TOML config file, then environment
//! variables, then CLI arguments (applied by the command handlers).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, CommandWorkflow, DynamicNameSpec, VerifierConfig};
use crate::constants::{config as paths, datasets, env, http, logging, workflow};
use crate::errors::{AppError, ConfigError, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Where datasets are staged
    pub staging: StagingConfig,
    /// External workflow program
    pub workflow: WorkflowConfig,
    /// Output verification rules
    pub verify: VerifyConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// User agent header
    pub user_agent: String,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

/// Staging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Root under which each dataset gets its own directory
    pub root: PathBuf,
    /// Skip network-backed scenarios entirely
    pub skip_integration: bool,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(datasets::DEFAULT_STAGING_ROOT),
            skip_integration: false,
        }
    }
}

/// Workflow program settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Program to execute
    pub program: String,
    /// Arguments appended to every invocation
    pub extra_args: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            program: workflow::DEFAULT_PROGRAM.to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// Verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Run-specific file name patterns
    pub dynamic_patterns: Vec<DynamicNameSpec>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            dynamic_patterns: vec![DynamicNameSpec::tedana_log()],
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl WorkflowConfig {
    /// Convert to the command-line workflow runner
    pub fn to_runtime_config(&self) -> CommandWorkflow {
        CommandWorkflow::new(self.program.clone()).with_extra_args(self.extra_args.clone())
    }
}

impl VerifyConfig {
    /// Compile patterns into a runtime VerifierConfig
    pub fn to_runtime_config(&self) -> Result<VerifierConfig> {
        Ok(VerifierConfig::from_specs(&self.dynamic_patterns)?)
    }
}

/// Interpret an environment flag value
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// Load configuration from defaults, file and process environment
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        let config_path = match config_file_override {
            Some(ref path) => Some(path.clone()),
            None => Self::find_config_file(),
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env::SKIP_INTEGRATION) {
            self.staging.skip_integration = is_truthy(&value);
            debug!("{} override: {}", env::SKIP_INTEGRATION, self.staging.skip_integration);
        }
        if let Some(root) = lookup(env::STAGING_ROOT).filter(|v| !v.trim().is_empty()) {
            debug!("{} override: {}", env::STAGING_ROOT, root);
            self.staging.root = PathBuf::from(root);
        }
    }

    /// Reject values that cannot work at runtime
    pub fn validate(&self) -> Result<()> {
        if self.client.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "Downloads need a non-zero timeout".to_string(),
            }
            .into());
        }
        if self.workflow.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "workflow.program".to_string(),
                value: String::new(),
                reason: "A workflow program is required".to_string(),
            }
            .into());
        }
        self.verify.to_runtime_config()?;
        Ok(())
    }

    /// Write a commented default configuration file
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub async fn write_default(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path,
            None => Self::get_default_config_path()?,
        };

        if config_path.exists() && !force {
            return Err(AppError::generic(format!(
                "Configuration file already exists: {}",
                config_path.display()
            )));
        }

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::generic(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        tokio::fs::write(&config_path, Self::generate_default_config_content())
            .await
            .map_err(|e| {
                AppError::generic(format!(
                    "Failed to write config file {}: {}",
                    config_path.display(),
                    e
                ))
            })?;

        info!("Wrote default configuration to {}", config_path.display());
        Ok(config_path)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::generic(format!("Failed to render configuration: {}", e)))
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(paths::LOCAL_FILE)];
        if let Ok(user) = Self::get_default_config_path() {
            search_paths.push(user);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    fn get_default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?;

        Ok(config_dir.join(paths::APP_DIR).join(paths::FILE_NAME))
    }

    async fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::generic(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::InvalidFormat)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn generate_default_config_content() -> String {
        format!(
            r#"# tedana harness configuration

[client]
# Whole-request timeout; reference datasets are several hundred MB
request_timeout_secs = {}
connect_timeout_secs = {}

[staging]
# Each dataset is extracted into <root>/<dataset>
root = "{}"
# Also settable with {}=1
skip_integration = false

[workflow]
program = "{}"
extra_args = []

# Files whose names change on every run. expected = "exactly_one" | "any"
[[verify.dynamic_patterns]]
name = "run-log"
regex = '{}'
expected = "exactly_one"

[logging]
level = "{}"  # error, warn, info, debug, trace
"#,
            http::DEFAULT_TIMEOUT.as_secs(),
            http::CONNECT_TIMEOUT.as_secs(),
            datasets::DEFAULT_STAGING_ROOT,
            env::SKIP_INTEGRATION,
            workflow::DEFAULT_PROGRAM,
            crate::constants::verify::LOG_FILE_PATTERN,
            logging::DEFAULT_LOG_LEVEL,
        )
    }
}
