//! Gate command for newsgate.
//!
//! Runs the adaptive gate over a batch and reports kept and rejected items.

use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::cli::{format_reasons, ItemInfo};
use crate::config::Config;
use crate::core::ContentItem;
use crate::gate::{apply_adaptive_gate, GateStats};

/// Options for the gate command.
#[derive(Debug, Clone, Default)]
pub struct GateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Override the configured keep count.
    pub min_keep: Option<usize>,
}

/// Output format for the gate command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateOutput {
    /// Whether the gate ran.
    pub success: bool,
    /// Kept items in admission order.
    pub kept: Vec<ItemInfo>,
    /// Rejected items in input order.
    pub rejected: Vec<ItemInfo>,
    /// Aggregate statistics.
    #[serde(skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub stats: Option<GateStats>,
    /// Error message if the gate failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GateOutput {
    /// Create a successful output.
    pub fn success(kept: Vec<ItemInfo>, rejected: Vec<ItemInfo>, stats: GateStats) -> Self {
        Self {
            success: true,
            kept,
            rejected,
            stats: Some(stats),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            kept: Vec::new(),
            rejected: Vec::new(),
            stats: None,
            error: Some(error.into()),
        }
    }
}

/// The gate command implementation.
pub struct GateCommand {
    config: Config,
}

impl GateCommand {
    /// Create a new gate command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the adaptive gate over the items.
    pub fn run(&self, items: Vec<ContentItem>, options: &GateOptions) -> GateOutput {
        if let Err(e) = self.config.validate() {
            return GateOutput::failure(e.to_string());
        }
        let classifier = match Classifier::new(&self.config) {
            Ok(classifier) => classifier,
            Err(e) => return GateOutput::failure(e.to_string()),
        };

        let mut gate_config = self.config.gate.clone();
        if let Some(min_keep) = options.min_keep {
            gate_config.min_keep_items = min_keep;
        }

        match apply_adaptive_gate(&classifier, &gate_config, items) {
            Ok(outcome) => {
                let kept = outcome.kept.iter().map(ItemInfo::from).collect();
                let rejected = outcome
                    .rejected
                    .iter()
                    .map(|r| ItemInfo::from(&r.item))
                    .collect();
                GateOutput::success(kept, rejected, outcome.stats)
            }
            Err(e) => GateOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GateOutput, options: &GateOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &GateOutput) -> String {
        if !output.success {
            return format!(
                "Gate failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        if let Some(stats) = &output.stats {
            lines.push(format!(
                "Kept {} of {} item(s) at level {} {}",
                stats.kept, stats.total, stats.level_used, stats.level
            ));
            lines.push(format!(
                "  strict: {}  relaxed: {}  density_soft: {}  hard rejected: {}",
                stats.passed_strict,
                stats.passed_relaxed,
                stats.passed_density_soft,
                stats.hard_rejected
            ));
            if stats.relaxed() {
                lines.push(format!(
                    "  too few items passed strict thresholds; relaxed to tier {}",
                    stats.level_used
                ));
            }
            lines.push(String::new());
        }

        if !output.kept.is_empty() {
            lines.push("Kept:".to_string());
            for info in &output.kept {
                lines.push(format!("  {}", info.line()));
            }
            lines.push(String::new());
        }

        if !output.rejected.is_empty() {
            lines.push("Rejected:".to_string());
            for info in &output.rejected {
                lines.push(format!("  {}", info.line()));
            }
            lines.push(String::new());
        }

        if let Some(stats) = &output.stats {
            format_reasons(&mut lines, "Top rejection reasons", &stats.rejection_reasons);
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordConfig;

    fn long_article(id: &str) -> ContentItem {
        ContentItem::new(id, "OpenAI update", "OpenAI shipped a model. ".repeat(60))
    }

    fn sponsored(id: &str) -> ContentItem {
        ContentItem::new(id, "Sponsored post", "OpenAI partner content. ".repeat(60))
    }

    // =========================================================================
    // Run
    // =========================================================================

    #[test]
    fn test_gate_partitions_batch() {
        let cmd = GateCommand::new(Config::default());
        let output = cmd.run(
            vec![long_article("a"), sponsored("b")],
            &GateOptions::default(),
        );

        assert!(output.success);
        assert_eq!(output.kept.len(), 1);
        assert_eq!(output.kept[0].id, "a");
        assert_eq!(output.kept[0].stage.as_deref(), Some("HARD_PASS"));
        assert_eq!(output.rejected.len(), 1);
        assert_eq!(
            output.rejected[0].reason.as_deref(),
            Some("rejected_keyword:sponsored")
        );

        let stats = output.stats.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.hard_rejected, 1);
    }

    #[test]
    fn test_gate_min_keep_override() {
        let cmd = GateCommand::new(Config::default());
        let options = GateOptions {
            min_keep: Some(1),
            ..Default::default()
        };
        let output = cmd.run(vec![long_article("a")], &options);

        // One strict pass satisfies the keep count, so no relaxation
        assert_eq!(output.stats.unwrap().level_used, 1);
    }

    #[test]
    fn test_gate_invalid_config_fails() {
        let mut config = Config::default();
        config.gate.levels.clear();
        let output = GateCommand::new(config).run(vec![long_article("a")], &GateOptions::default());

        assert!(!output.success);
        assert!(output.error.is_some());
        assert!(output.kept.is_empty());
    }

    #[test]
    fn test_gate_blank_keyword_fails() {
        let mut config = Config::default();
        config.keywords = KeywordConfig {
            hard_reject: vec!["   ".to_string()],
            ..KeywordConfig::default()
        };
        let output = GateCommand::new(config).run(Vec::new(), &GateOptions::default());
        assert!(!output.success);
        assert!(output.error.unwrap().contains("keywords.hard_reject"));
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    #[test]
    fn test_format_quiet() {
        let cmd = GateCommand::new(Config::default());
        let output = cmd.run(vec![long_article("a")], &GateOptions::default());
        let options = GateOptions {
            quiet: true,
            ..Default::default()
        };
        assert!(cmd.format_output(&output, &options).is_empty());
    }

    #[test]
    fn test_format_json() {
        let cmd = GateCommand::new(Config::default());
        let output = cmd.run(vec![long_article("a"), sponsored("b")], &GateOptions::default());
        let options = GateOptions {
            json: true,
            ..Default::default()
        };
        let formatted = cmd.format_output(&output, &options);
        let value: serde_json::Value = serde_json::from_str(&formatted).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["kept"][0]["id"], "a");
        assert_eq!(value["stats"]["hard_rejected"], 1);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_format_human_readable() {
        let cmd = GateCommand::new(Config::default());
        let output = cmd.run(vec![long_article("a"), sponsored("b")], &GateOptions::default());
        let formatted = cmd.format_output(&output, &GateOptions::default());

        assert!(formatted.contains("Kept 1 of 2 item(s)"));
        assert!(formatted.contains("[a] OpenAI update"));
        assert!(formatted.contains("Rejected:"));
        assert!(formatted.contains("rejected_keyword:sponsored"));
    }

    #[test]
    fn test_format_reports_relaxation() {
        let cmd = GateCommand::new(Config::default());

        let relaxed = cmd.run(vec![long_article("a")], &GateOptions::default());
        let formatted = cmd.format_output(&relaxed, &GateOptions::default());
        assert!(formatted.contains("relaxed to tier 2"));

        let options = GateOptions {
            min_keep: Some(1),
            ..Default::default()
        };
        let strict = cmd.run(vec![long_article("a")], &options);
        let formatted = cmd.format_output(&strict, &options);
        assert!(!formatted.contains("relaxed to tier"));
    }

    #[test]
    fn test_format_failure() {
        let cmd = GateCommand::new(Config::default());
        let formatted = cmd.format_output(&GateOutput::failure("boom"), &GateOptions::default());
        assert_eq!(formatted, "Gate failed: boom\n");
    }
}
