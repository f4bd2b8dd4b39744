//! Config command for newsgate.
//!
//! Prints the effective configuration as TOML.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Options for the config command.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the config command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOutput {
    /// Whether the configuration rendered and validated.
    pub success: bool,
    /// The configuration as TOML.
    pub toml: String,
    /// Error message if rendering or validation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConfigOutput {
    /// Create a successful output.
    pub fn success(toml: impl Into<String>) -> Self {
        Self {
            success: true,
            toml: toml.into(),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            toml: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The config command implementation.
pub struct ConfigCommand {
    config: Config,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render the configuration.
    ///
    /// An invalid configuration still fails, so the command doubles as a
    /// config check.
    pub fn run(&self, _options: &ConfigOptions) -> ConfigOutput {
        if let Err(e) = self.config.validate() {
            return ConfigOutput::failure(e.to_string());
        }
        match self.config.to_toml_string() {
            Ok(toml) => ConfigOutput::success(toml),
            Err(e) => ConfigOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ConfigOutput, options: &ConfigOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            output.toml.clone()
        } else {
            format!(
                "Invalid configuration: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
