//! Score command for newsgate.
//!
//! Ranks items by frontier score, highest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::ContentItem;
use crate::scoring::{FrontierScore, FrontierScorer, ScoredItem};

/// Options for the score command.
#[derive(Debug, Clone, Default)]
pub struct ScoreOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

/// Output format for the score command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOutput {
    /// Whether scoring was successful.
    pub success: bool,
    /// Number of results.
    pub count: usize,
    /// Ranked results.
    pub results: Vec<ScoredInfo>,
    /// Error message if scoring failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Simplified scored item for output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredInfo {
    /// Item ID.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Source platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Total score.
    pub score: u8,
    /// Component breakdown.
    #[serde(skip_deserializing)]
    pub breakdown: FrontierScore,
}

impl From<&ScoredItem> for ScoredInfo {
    fn from(scored: &ScoredItem) -> Self {
        Self {
            id: scored.item.id.clone(),
            title: scored.item.title.clone(),
            platform: scored.item.platform.clone(),
            score: scored.score.total,
            breakdown: scored.score,
        }
    }
}

impl ScoreOutput {
    /// Create a successful output.
    pub fn success(results: Vec<ScoredInfo>) -> Self {
        let count = results.len();
        Self {
            success: true,
            count,
            results,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            results: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The score command implementation.
pub struct ScoreCommand {
    config: Config,
}

impl ScoreCommand {
    /// Create a new score command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Rank the items as of now.
    pub fn run(&self, items: &[ContentItem], options: &ScoreOptions) -> ScoreOutput {
        self.run_at(items, options, Utc::now())
    }

    /// Rank the items as of `now`.
    pub fn run_at(
        &self,
        items: &[ContentItem],
        options: &ScoreOptions,
        now: DateTime<Utc>,
    ) -> ScoreOutput {
        if let Err(e) = self.config.validate() {
            return ScoreOutput::failure(e.to_string());
        }
        let scorer = match FrontierScorer::new(&self.config.frontier) {
            Ok(scorer) => scorer,
            Err(e) => return ScoreOutput::failure(e.to_string()),
        };

        let limit = options.limit.unwrap_or(items.len());
        let results = scorer
            .rank(items, now, limit)
            .iter()
            .map(ScoredInfo::from)
            .collect();
        ScoreOutput::success(results)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ScoreOutput, options: &ScoreOptions) -> String {
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
    fn format_human_readable(&self, output: &ScoreOutput) -> String {
        if !output.success {
            return format!(
                "Scoring failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.results.is_empty() {
            return "No items to score\n".to_string();
        }

        let mut lines = Vec::new();
        lines.push(format!("Ranked {} item(s)\n", output.count));

        for (i, result) in output.results.iter().enumerate() {
            let b = &result.breakdown;
            lines.push(format!("{}. [{:>3}] {}", i + 1, result.score, result.title));
            lines.push(format!(
                "   recency {}  authority {}  keyword {}  structure {}",
                b.recency, b.authority, b.keyword, b.structure
            ));
            if b.business > 0 || b.product > 0 {
                lines.push(format!("   business {}  product {}", b.business, b.product));
            }
            match &result.platform {
                Some(platform) => lines.push(format!("   ID: {}  Platform: {}", result.id, platform)),
                None => lines.push(format!("   ID: {}", result.id)),
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}
