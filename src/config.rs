use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_REJECTION_MESSAGE: &str =
    "Invalid requirements: Your input is either unclear or too complex.";

/// Main configuration structure for scriptflow
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptflowConfig {
    /// Workflow run limits and user-facing text
    pub workflow: WorkflowSettings,
    /// Model endpoint used by the agents
    pub llm: LlmConfig,
    /// HTTP entry point
    pub server: ServerConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// Hard ceiling on a single run
    pub timeout_seconds: u64,
    /// Returned when the requirements are judged infeasible
    pub rejection_message: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            rejection_message: DEFAULT_REJECTION_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
    /// API key (can be set via env var)
    pub api_key: Option<String>,
    pub request_timeout_seconds: u64,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None, // Read from OPENAI_API_KEY when unset
            request_timeout_seconds: 60,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (overridden by RUST_LOG)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ScriptflowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (scriptflow.toml)
    /// 3. Environment variables (prefixed with SCRIPTFLOW_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("scriptflow.toml").exists() {
            builder = builder.add_source(File::with_name("scriptflow"));
        }

        // SCRIPTFLOW_WORKFLOW__TIMEOUT_SECONDS=60
        builder = builder.add_source(
            Environment::with_prefix("SCRIPTFLOW")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut scriptflow_config: ScriptflowConfig = builder.build()?.try_deserialize()?;

        if scriptflow_config.llm.api_key.is_none() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                scriptflow_config.llm.api_key = Some(key);
            }
        }

        scriptflow_config.validate()?;
        Ok(scriptflow_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workflow.timeout_seconds == 0 {
            anyhow::bail!("workflow.timeout_seconds must be greater than zero");
        }
        if self.workflow.rejection_message.trim().is_empty() {
            anyhow::bail!("workflow.rejection_message must not be empty");
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ScriptflowConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = ScriptflowConfig::load_env_file();
        ScriptflowConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ScriptflowConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup, once logging is up)
pub fn init_config() -> Result<&'static ScriptflowConfig> {
    let config = config()?;
    tracing::info!(
        timeout_seconds = config.workflow.timeout_seconds,
        model = %config.llm.model,
        "Configuration loaded successfully"
    );
    Ok(config)
}
