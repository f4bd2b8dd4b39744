//! Split command for newsgate.
//!
//! Runs the split gate and reports the event pool, the signal pool, and
//! rejected items.

use serde::{Deserialize, Serialize};

use crate::classify::Classifier;
use crate::cli::{format_reasons, ItemInfo};
use crate::config::Config;
use crate::core::ContentItem;
use crate::gate::{apply_split_gate, SplitGateStats};

/// Options for the split command.
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the split command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOutput {
    /// Whether the gate ran.
    pub success: bool,
    /// Event-grade items.
    pub event_pool: Vec<ItemInfo>,
    /// Signal-grade items, event items included.
    pub signal_pool: Vec<ItemInfo>,
    /// Rejected items in input order.
    pub rejected: Vec<ItemInfo>,
    /// Aggregate statistics.
    #[serde(skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub stats: Option<SplitGateStats>,
    /// Error message if the gate failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SplitOutput {
    /// Create a successful output.
    pub fn success(
        event_pool: Vec<ItemInfo>,
        signal_pool: Vec<ItemInfo>,
        rejected: Vec<ItemInfo>,
        stats: SplitGateStats,
    ) -> Self {
        Self {
            success: true,
            event_pool,
            signal_pool,
            rejected,
            stats: Some(stats),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            event_pool: Vec::new(),
            signal_pool: Vec::new(),
            rejected: Vec::new(),
            stats: None,
            error: Some(error.into()),
        }
    }
}

/// The split command implementation.
pub struct SplitCommand {
    config: Config,
}

impl SplitCommand {
    /// Create a new split command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the split gate over the items.
    pub fn run(&self, items: Vec<ContentItem>, _options: &SplitOptions) -> SplitOutput {
        if let Err(e) = self.config.validate() {
            return SplitOutput::failure(e.to_string());
        }
        let classifier = match Classifier::new(&self.config) {
            Ok(classifier) => classifier,
            Err(e) => return SplitOutput::failure(e.to_string()),
        };

        match apply_split_gate(&classifier, &self.config.split, items) {
            Ok(outcome) => SplitOutput::success(
                outcome.event_pool.iter().map(ItemInfo::from).collect(),
                outcome.signal_pool.iter().map(ItemInfo::from).collect(),
                outcome
                    .rejected
                    .iter()
                    .map(|r| ItemInfo::from(&r.item))
                    .collect(),
                outcome.stats,
            ),
            Err(e) => SplitOutput::failure(e.to_string()),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SplitOutput, options: &SplitOptions) -> String {
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
    fn format_human_readable(&self, output: &SplitOutput) -> String {
        if !output.success {
            return format!(
                "Split failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        if let Some(stats) = &output.stats {
            lines.push(format!(
                "{} item(s): {} event, {} signal, {} rejected",
                stats.total, stats.event_passed, stats.signal_passed, stats.rejected
            ));
            lines.push(format!(
                "  event level {}  signal level {}",
                stats.event_level, stats.signal_level
            ));
            if stats.signal_soft_passed > 0 || stats.fallback_promoted > 0 {
                lines.push(format!(
                    "  soft-passed: {}  fallback promoted: {}",
                    stats.signal_soft_passed, stats.fallback_promoted
                ));
            }
            lines.push(String::new());
        }

        for (heading, pool) in [
            ("Event pool:", &output.event_pool),
            ("Signal pool:", &output.signal_pool),
            ("Rejected:", &output.rejected),
        ] {
            if pool.is_empty() {
                continue;
            }
            lines.push(heading.to_string());
            for info in pool {
                lines.push(format!("  {}", info.line()));
            }
            lines.push(String::new());
        }

        if let Some(stats) = &output.stats {
            format_reasons(&mut lines, "Top rejection reasons", &stats.rejection_reasons);
            format_reasons(
                &mut lines,
                "Why signal items missed the event pool",
                &stats.event_rejection_reasons,
            );
        }

        lines.join("\n")
    }
}
