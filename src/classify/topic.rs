//! Topic relevance classification.

use crate::classify::keywords::KeywordMatcher;
use crate::error::Result;

/// Decides whether an item belongs to the target domain.
///
/// Pure lookup against a compiled keyword alternation. An empty keyword
/// list disables the check: every item is relevant.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    matcher: KeywordMatcher,
}

impl TopicClassifier {
    /// Compile the topic keyword list.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        Ok(Self {
            matcher: KeywordMatcher::new(keywords)?,
        })
    }

    /// Whether the topic check is active.
    pub fn is_enabled(&self) -> bool {
        !self.matcher.is_empty()
    }

    /// Whether `title + " " + body` mentions any topic keyword.
    pub fn is_topic_relevant(&self, title: &str, body: &str) -> bool {
        if !self.is_enabled() {
            return true;
        }
        self.matcher.is_match(&format!("{} {}", title, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordConfig;

    fn classifier() -> TopicClassifier {
        TopicClassifier::new(&["AI", "machine learning", "large language model", "大模型"]).unwrap()
    }

    #[test]
    fn test_match_in_title() {
        assert!(classifier().is_topic_relevant("New AI chip", "Details inside."));
    }

    #[test]
    fn test_match_in_body() {
        assert!(classifier().is_topic_relevant(
            "Quarterly update",
            "The team trained a large language model."
        ));
    }

    #[test]
    fn test_phrase_across_title_and_body_join() {
        // Title and body are joined with a space before matching.
        assert!(classifier().is_topic_relevant("Advances in machine", "learning at scale."));
    }

    #[test]
    fn test_off_topic() {
        assert!(!classifier().is_topic_relevant(
            "Local bakery opens",
            "Fresh bread every morning in Shanghai."
        ));
    }

    #[test]
    fn test_cjk_topic() {
        assert!(classifier().is_topic_relevant("国产大模型发布", ""));
    }

    #[test]
    fn test_mixed_script_default_topics() {
        let classifier = TopicClassifier::new(&KeywordConfig::default().topic).unwrap();
        assert!(classifier.is_topic_relevant("中国AI公司发布新产品", "该公司今天发布了新的AI芯片。"));
        assert!(classifier.is_topic_relevant("OpenAI发布GPT新版本", ""));
        assert!(classifier.is_topic_relevant("中国 AI 公司发布新产品", ""));
    }

    #[test]
    fn test_empty_list_disables_check() {
        let classifier = TopicClassifier::new::<&str>(&[]).unwrap();
        assert!(!classifier.is_enabled());
        assert!(classifier.is_topic_relevant("Bakery", "Bread."));
    }
}
