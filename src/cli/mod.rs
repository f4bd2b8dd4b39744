//! CLI commands for newsgate.
//!
//! Each command reads a JSON array of [`ContentItem`] from a file or stdin,
//! runs one library operation, and returns an output struct that formats as
//! human-readable text or JSON:
//! - **gate**: adaptive gate
//! - **split**: event and signal pools
//! - **score**: frontier ranking
//! - **config**: effective configuration as TOML

pub mod config_cmd;
pub mod gate;
pub mod score;
pub mod split;

pub use config_cmd::ConfigCommand;
pub use gate::GateCommand;
pub use score::ScoreCommand;
pub use split::SplitCommand;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::core::ContentItem;
use crate::error::{GateError, Result};

/// Source name that reads items from stdin.
pub const STDIN_SOURCE: &str = "-";

/// Read items from a file path, or from stdin when `source` is `-`.
pub fn read_items(source: &str) -> Result<Vec<ContentItem>> {
    if source == STDIN_SOURCE {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| GateError::storage("<stdin>", e))?;
        return parse_items(&buffer);
    }

    let path = Path::new(source);
    let content = fs::read_to_string(path).map_err(|e| GateError::storage(path, e))?;
    parse_items(&content)
}

/// Parse a JSON array of items.
pub fn parse_items(json: &str) -> Result<Vec<ContentItem>> {
    serde_json::from_str(json)
        .map_err(|e| GateError::serde(format!("invalid item list: {}", e)))
}

/// Simplified item info for output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Item ID.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Stage that admitted the item, if kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Tier label the item was judged against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Rejection reason, if rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Density score of the body.
    pub density_score: u8,
    /// Admitted by a soft-pass or fallback.
    pub low_confidence: bool,
}

impl From<&ContentItem> for ItemInfo {
    fn from(item: &ContentItem) -> Self {
        let annotation = &item.annotation;
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            stage: annotation.gate_stage.map(|s| s.to_string()),
            level: annotation.gate_level.clone(),
            reason: annotation.rejected_reason.as_ref().map(|r| r.to_string()),
            density_score: annotation.density_score,
            low_confidence: annotation.low_confidence,
        }
    }
}

impl ItemInfo {
    /// One-line summary for human-readable output.
    pub(crate) fn line(&self) -> String {
        let mut line = format!("[{}] {}", self.id, self.title);
        if let Some(reason) = &self.reason {
            line.push_str(&format!(" ({})", reason));
        }
        line.push_str(&format!(" density={}", self.density_score));
        if self.low_confidence {
            line.push_str(" low-confidence");
        }
        line
    }
}

/// Format a count/reason histogram as indented lines.
pub(crate) fn format_reasons(lines: &mut Vec<String>, heading: &str, reasons: &[(String, usize)]) {
    if reasons.is_empty() {
        return;
    }
    lines.push(format!("{}:", heading));
    for (reason, count) in reasons {
        lines.push(format!("  {:<28} {}", reason, count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GateAnnotation, GateStage, RejectReason};
    use std::io::Write;
    use tempfile::NamedTempFile;

    // =========================================================================
    // Reading items
    // =========================================================================

    #[test]
    fn test_parse_items_minimal_fields() {
        let items = parse_items(r#"[{"id": "a", "title": "A"}, {"id": "b", "title": "B", "body": "text"}]"#)
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].body, "");
        assert_eq!(items[1].body, "text");
        assert!(items[0].platform.is_none());
    }

    #[test]
    fn test_parse_items_rejects_non_array() {
        let err = parse_items(r#"{"id": "a"}"#).unwrap_err();
        assert!(matches!(err, GateError::Serde { .. }));
    }

    #[test]
    fn test_read_items_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "x", "title": "X", "platform": "arxiv", "published_raw": "2025-01-01"}}]"#
        )
        .unwrap();

        let items = read_items(file.path().to_str().unwrap()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].platform.as_deref(), Some("arxiv"));
        assert_eq!(items[0].published_raw.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_read_items_missing_file() {
        let err = read_items("/nonexistent/newsgate/items.json").unwrap_err();
        assert!(matches!(err, GateError::Storage { .. }));
    }

    // =========================================================================
    // Item info
    // =========================================================================

    #[test]
    fn test_item_info_from_kept_item() {
        let mut item = ContentItem::new("k", "Kept", "body");
        item.annotation = GateAnnotation::kept(GateStage::SoftPass, "relaxed", 12);
        let info = ItemInfo::from(&item);
        assert_eq!(info.stage.as_deref(), Some("SOFT_PASS"));
        assert_eq!(info.level.as_deref(), Some("relaxed"));
        assert!(info.reason.is_none());
        assert_eq!(info.line(), "[k] Kept density=12");
    }

    #[test]
    fn test_item_info_from_rejected_item() {
        let mut item = ContentItem::new("r", "Rejected", "body");
        item.annotation = GateAnnotation::rejected(RejectReason::ContentTooShort, "strict", 3);
        let info = ItemInfo::from(&item);
        assert_eq!(info.reason.as_deref(), Some("content_too_short"));
        assert_eq!(info.line(), "[r] Rejected (content_too_short) density=3");
    }

    #[test]
    fn test_format_reasons_skips_empty() {
        let mut lines = Vec::new();
        format_reasons(&mut lines, "Rejections", &[]);
        assert!(lines.is_empty());

        format_reasons(&mut lines, "Rejections", &[("non_ai_topic".to_string(), 2)]);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("non_ai_topic"));
    }
}
