//! Text classifiers used by the gates.
//!
//! Every classifier is a pure function of its input text plus read-only
//! configuration compiled once into a [`Classifier`]. Nothing here keeps
//! state between calls, so a `Classifier` can be shared across threads.

pub mod density;
pub mod fragment;
pub mod keywords;
pub mod text;
pub mod topic;
pub mod validity;

pub use density::{evidence_count, DensityBreakdown, DensityScorer};
pub use fragment::is_fragment;
pub use keywords::KeywordMatcher;
pub use text::{char_len, sentence_count};
pub use topic::TopicClassifier;
pub use validity::{check_thresholds, is_valid_article, Blocklist};

use crate::config::{Config, DensityConfig, KeywordConfig};
use crate::core::{GateItem, GateLevel, RejectReason};
use crate::error::Result;

/// Compiled classifier configuration.
#[derive(Debug, Clone)]
pub struct Classifier {
    blocklist: Blocklist,
    topic: TopicClassifier,
    density: DensityScorer,
}

impl Classifier {
    /// Compile classifiers from the full configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::from_parts(&config.keywords, &config.density)
    }

    /// Compile classifiers from the keyword and density sections.
    pub fn from_parts(keywords: &KeywordConfig, density: &DensityConfig) -> Result<Self> {
        Ok(Self {
            blocklist: Blocklist::new(&keywords.hard_reject),
            topic: TopicClassifier::new(&keywords.topic)?,
            density: DensityScorer::new(density.clone(), &keywords.domain_hints)?,
        })
    }

    /// Hard-reject checks that apply regardless of tier, in precedence order:
    /// blocklisted keyword (title or body), fragment body, off-topic.
    pub fn hard_reject(&self, title: &str, body: &str) -> Option<RejectReason> {
        if let Some(kw) = self
            .blocklist
            .find(title)
            .or_else(|| self.blocklist.find(body))
        {
            return Some(RejectReason::RejectedKeyword(kw.to_string()));
        }
        if is_fragment(body) {
            return Some(RejectReason::FragmentPlaceholder);
        }
        if !self.topic.is_topic_relevant(title, body) {
            return Some(RejectReason::NonAiTopic);
        }
        None
    }

    /// Full validity check of a text against one tier.
    pub fn is_valid_article(&self, text: &str, level: &GateLevel) -> std::result::Result<(), RejectReason> {
        is_valid_article(text, level, &self.blocklist)
    }

    /// Topic relevance of a title/body pair.
    pub fn is_topic_relevant(&self, title: &str, body: &str) -> bool {
        self.topic.is_topic_relevant(title, body)
    }

    /// Density score of a text.
    pub fn density_score(&self, text: &str) -> u8 {
        self.density.score(text)
    }

    /// Density score with its components.
    pub fn density_breakdown(&self, text: &str) -> DensityBreakdown {
        self.density.breakdown(text)
    }

    /// Measure everything a gate needs to know about one item.
    pub fn measure<T: GateItem>(&self, item: &T) -> ItemFacts {
        let body = item.body();
        ItemFacts {
            hard_reject: self.hard_reject(item.title(), body),
            length: char_len(body),
            sentences: sentence_count(body),
            density: self.density_score(body),
        }
    }
}

/// Per-item measurements computed once per gate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFacts {
    /// Hard-reject reason, if any.
    pub hard_reject: Option<RejectReason>,
    /// Body length in characters.
    pub length: usize,
    /// Body sentence count.
    pub sentences: usize,
    /// Body density score.
    pub density: u8,
}

impl ItemFacts {
    /// Check the measured body against a tier.
    pub fn check(&self, level: &GateLevel) -> std::result::Result<(), RejectReason> {
        check_thresholds(self.length, self.sentences, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContentItem;

    fn classifier() -> Classifier {
        Classifier::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_hard_reject_keyword_in_title() {
        let reason = classifier().hard_reject("Weekly AI Digest", "OpenAI shipped a model.");
        assert_eq!(
            reason,
            Some(RejectReason::RejectedKeyword("digest".to_string()))
        );
    }

    #[test]
    fn test_hard_reject_precedence_keyword_over_fragment() {
        let reason = classifier().hard_reject("roundup", "");
        assert_eq!(
            reason,
            Some(RejectReason::RejectedKeyword("roundup".to_string()))
        );
    }

    #[test]
    fn test_hard_reject_fragment_before_topic() {
        let reason = classifier().hard_reject("Gardening", "Last July was...");
        assert_eq!(reason, Some(RejectReason::FragmentPlaceholder));
    }

    #[test]
    fn test_hard_reject_off_topic() {
        let reason = classifier().hard_reject(
            "Bakery opens",
            "A new bakery opened downtown. It sells bread and pastries.",
        );
        assert_eq!(reason, Some(RejectReason::NonAiTopic));
    }

    #[test]
    fn test_hard_reject_passes_on_topic_content() {
        let reason = classifier().hard_reject(
            "Anthropic ships Claude update",
            "The new Claude model improves reasoning. It is available today.",
        );
        assert_eq!(reason, None);
    }

    #[test]
    fn test_measure_item() {
        let item = ContentItem::new(
            "x",
            "OpenAI news",
            "OpenAI released GPT-5 in 2025. It scores 90% on MMLU.",
        );
        let facts = classifier().measure(&item);
        assert!(facts.hard_reject.is_none());
        assert_eq!(facts.sentences, 2);
        assert_eq!(facts.length, item.body.chars().count());
        assert!(facts.density > 0);
        assert!(facts.check(&GateLevel::new(10, 2)).is_ok());
        assert_eq!(
            facts.check(&GateLevel::new(10, 3)),
            Err(RejectReason::InsufficientSentences)
        );
    }

    #[test]
    fn test_is_valid_article_delegates_with_blocklist() {
        let text = "Subscribe now for more news about OpenAI models and releases.";
        assert_eq!(
            classifier().is_valid_article(text, &GateLevel::new(1, 1)),
            Err(RejectReason::RejectedKeyword("subscribe".to_string()))
        );
    }
}
