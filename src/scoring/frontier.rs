//! Frontier scoring for news items.
//!
//! Ranks items by how fresh, authoritative, and cutting-edge they look.
//! Four base components are capped independently:
//! - recency (0-50): age of the best available timestamp, banded
//! - authority (0-20): platform tier membership
//! - keyword (0-30): distinct high-value terms x3, low-value terms x1
//! - structure (0-40): preprint ids, version tags, benchmark scores,
//!   parameter-scale tokens
//!
//! With `business_signals` enabled, a business/funding bonus (0-25) and a
//! product-release bonus (0-20) stack on top. The total is clamped to 100.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::classify::keywords::KeywordMatcher;
use crate::classify::text::surrounding;
use crate::config::FrontierConfig;
use crate::core::ContentItem;
use crate::error::Result;

/// Score weights and caps.
pub mod weights {
    /// Recency when no timestamp parses.
    pub const RECENCY_UNKNOWN: u8 = 20;
    /// Recency bands as (upper bound in hours, score), youngest first.
    pub const RECENCY_BANDS: [(i64, u8); 5] = [(6, 50), (24, 45), (48, 38), (72, 30), (168, 20)];
    /// Recency for anything older than the last band.
    pub const RECENCY_STALE: u8 = 10;

    /// Authority for the high tier.
    pub const AUTHORITY_HIGH: u8 = 20;
    /// Authority for the medium tier.
    pub const AUTHORITY_MEDIUM: u8 = 12;
    /// Authority for the community tier.
    pub const AUTHORITY_COMMUNITY: u8 = 8;
    /// Authority for unknown platforms.
    pub const AUTHORITY_OTHER: u8 = 4;

    /// Points per distinct high-value keyword.
    pub const KEYWORD_HIGH: u32 = 3;
    /// Points per distinct low-value keyword.
    pub const KEYWORD_LOW: u32 = 1;
    /// Cap for the keyword component.
    pub const KEYWORD_CAP: u32 = 30;

    /// Preprint identifier present.
    pub const STRUCTURE_PREPRINT: u32 = 15;
    /// Version tag present.
    pub const STRUCTURE_VERSION: u32 = 10;
    /// Benchmark name next to a number.
    pub const STRUCTURE_BENCHMARK: u32 = 15;
    /// Parameter-scale token present.
    pub const STRUCTURE_SCALE: u32 = 10;
    /// Cap for the structure component.
    pub const STRUCTURE_CAP: u32 = 40;

    /// Company name plus financial term.
    pub const BUSINESS_COMPANY_FINANCE: u8 = 25;
    /// Financial term alone.
    pub const BUSINESS_FINANCE: u8 = 10;

    /// Launch verb plus product term.
    pub const PRODUCT_LAUNCH_TERM: u8 = 20;
    /// Launch verb alone.
    pub const PRODUCT_LAUNCH: u8 = 8;
}

fn preprint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\barxiv\s*:?\s*\d{4}\.\d{4,5}|arxiv\.org/(?:abs|pdf)/|\b\d{4}\.\d{4,5}v\d+\b")
            .expect("preprint regex must compile")
    })
}

fn version_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[vV]\d+(?:\.\d+)+\b|\b\d+\.\d+\.\d+\b").expect("version tag regex must compile")
    })
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("number regex must compile"))
}

fn parameter_scale_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b\d+(?:\.\d+)?\s?[BT]\b|\b\d+x\d+B\b|\bMoE\b|(?i:\bmixture[- ]of[- ]experts\b)")
            .expect("parameter scale regex must compile")
    })
}

fn finance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:raises?|raised|funding|series [a-f]|valuation|valued at|acquires?|acquired|acquisition|ipo|invests?|investment|revenue)\b|[$€£]\d+(?:\.\d+)?\s?(?:m|b|bn|million|billion)\b",
        )
        .expect("finance regex must compile")
    })
}

fn launch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:launch(?:es|ed)?|releas(?:e|es|ed)|unveil(?:s|ed)?|introduc(?:e|es|ed)|announc(?:e|es|ed)|ships?|shipped|rolls? out|rolled out|open-sourc(?:e|es|ed))\b",
        )
        .expect("launch regex must compile")
    })
}

fn product_term_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:api|sdk|model|app|plugin|beta|preview|version \d+|v\d+(?:\.\d+)*|\d+\.\d+)\b")
            .expect("product term regex must compile")
    })
}

/// Per-component frontier score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrontierScore {
    /// Recency (0-50).
    pub recency: u8,
    /// Source authority (0-20).
    pub authority: u8,
    /// Keyword relevance (0-30).
    pub keyword: u8,
    /// Structural signals (0-40).
    pub structure: u8,
    /// Business/funding bonus (0-25, zero unless enabled).
    pub business: u8,
    /// Product-release bonus (0-20, zero unless enabled).
    pub product: u8,
    /// Clamped total (0-100).
    pub total: u8,
}

impl FrontierScore {
    fn with_total(mut self) -> Self {
        let sum = [
            self.recency,
            self.authority,
            self.keyword,
            self.structure,
            self.business,
            self.product,
        ]
        .iter()
        .map(|&c| u32::from(c))
        .sum::<u32>();
        self.total = sum.min(100) as u8;
        self
    }
}

/// An item with its computed frontier score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    /// The item.
    pub item: ContentItem,
    /// Score breakdown.
    pub score: FrontierScore,
}

/// Frontier scorer with compiled keyword lists.
#[derive(Debug, Clone)]
pub struct FrontierScorer {
    high_value: KeywordMatcher,
    low_value: KeywordMatcher,
    high_platforms: Vec<String>,
    medium_platforms: Vec<String>,
    community_platforms: Vec<String>,
    benchmarks: KeywordMatcher,
    benchmark_window: usize,
    business_signals: bool,
    companies: KeywordMatcher,
}

impl FrontierScorer {
    /// Compile the scorer from configuration.
    pub fn new(config: &FrontierConfig) -> Result<Self> {
        Ok(Self {
            high_value: KeywordMatcher::new(&config.high_value_keywords)?,
            low_value: KeywordMatcher::new(&config.low_value_keywords)?,
            high_platforms: lowercase_all(&config.platforms.high),
            medium_platforms: lowercase_all(&config.platforms.medium),
            community_platforms: lowercase_all(&config.platforms.community),
            benchmarks: KeywordMatcher::case_sensitive(&config.benchmarks)?,
            benchmark_window: config.benchmark_window,
            business_signals: config.business_signals,
            companies: KeywordMatcher::new(&config.companies)?,
        })
    }

    /// Score one item as of `now`.
    pub fn score(&self, item: &ContentItem, now: DateTime<Utc>) -> FrontierScore {
        let text = format!("{} {}", item.title, item.body);

        let mut score = FrontierScore {
            recency: recency_score(best_timestamp(item), now),
            authority: self.authority_score(item.platform.as_deref()),
            keyword: self.keyword_score(&text),
            structure: self.structure_score(&text),
            ..Default::default()
        };

        if self.business_signals {
            score.business = self.business_score(&text);
            score.product = product_score(&text);
        }

        score.with_total()
    }

    /// Total frontier score of one item.
    pub fn frontier_score(&self, item: &ContentItem, now: DateTime<Utc>) -> u8 {
        self.score(item, now).total
    }

    /// Rank items by score, highest first.
    ///
    /// Ties keep input order. Returns at most `limit` items.
    pub fn rank(&self, items: &[ContentItem], now: DateTime<Utc>, limit: usize) -> Vec<ScoredItem> {
        let mut scored: Vec<ScoredItem> = items
            .iter()
            .map(|item| ScoredItem {
                item: item.clone(),
                score: self.score(item, now),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total.cmp(&a.score.total));
        scored.truncate(limit);
        scored
    }

    /// Rank and return only the items.
    pub fn rank_items(
        &self,
        items: &[ContentItem],
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<ContentItem> {
        self.rank(items, now, limit)
            .into_iter()
            .map(|s| s.item)
            .collect()
    }

    fn authority_score(&self, platform: Option<&str>) -> u8 {
        let Some(platform) = platform else {
            return weights::AUTHORITY_OTHER;
        };
        let platform = platform.trim().to_lowercase();
        if self.high_platforms.contains(&platform) {
            weights::AUTHORITY_HIGH
        } else if self.medium_platforms.contains(&platform) {
            weights::AUTHORITY_MEDIUM
        } else if self.community_platforms.contains(&platform) {
            weights::AUTHORITY_COMMUNITY
        } else {
            weights::AUTHORITY_OTHER
        }
    }

    /// Distinct high-value terms, then low-value terms that do not sit
    /// inside a high-value match.
    fn keyword_score(&self, text: &str) -> u8 {
        let high_spans = self.high_value.find_spans(text);
        let high = self.high_value.matched_terms(text).len() as u32;

        let low: std::collections::BTreeSet<String> = self
            .low_value
            .find_spans(text)
            .into_iter()
            .filter(|&(start, end)| !high_spans.iter().any(|&(s, e)| start < e && s < end))
            .map(|(start, end)| text[start..end].to_lowercase())
            .collect();

        let points = high * weights::KEYWORD_HIGH + low.len() as u32 * weights::KEYWORD_LOW;
        points.min(weights::KEYWORD_CAP) as u8
    }

    fn structure_score(&self, text: &str) -> u8 {
        let mut points = 0;
        if preprint_re().is_match(text) {
            points += weights::STRUCTURE_PREPRINT;
        }
        if version_tag_re().is_match(text) {
            points += weights::STRUCTURE_VERSION;
        }
        if self.has_benchmark_score(text) {
            points += weights::STRUCTURE_BENCHMARK;
        }
        if parameter_scale_re().is_match(text) {
            points += weights::STRUCTURE_SCALE;
        }
        points.min(weights::STRUCTURE_CAP) as u8
    }

    fn has_benchmark_score(&self, text: &str) -> bool {
        self.benchmarks.find_spans(text).into_iter().any(|(start, end)| {
            let (before, after) = surrounding(text, start, end, self.benchmark_window);
            number_re().is_match(before) || number_re().is_match(after)
        })
    }

    fn business_score(&self, text: &str) -> u8 {
        if !finance_re().is_match(text) {
            return 0;
        }
        if self.companies.is_match(text) {
            weights::BUSINESS_COMPANY_FINANCE
        } else {
            weights::BUSINESS_FINANCE
        }
    }
}

fn product_score(text: &str) -> u8 {
    if !launch_re().is_match(text) {
        return 0;
    }
    if product_term_re().is_match(text) {
        weights::PRODUCT_LAUNCH_TERM
    } else {
        weights::PRODUCT_LAUNCH
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

/// Best available timestamp: parsed publish time, then the raw publish
/// string, then collection time.
pub fn best_timestamp(item: &ContentItem) -> Option<DateTime<Utc>> {
    item.published_at
        .or_else(|| item.published_raw.as_deref().and_then(parse_timestamp))
        .or(item.collected_at)
}

/// Parse a publish string as found in feeds.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|ndt| ndt.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|ndt| ndt.and_utc())
        })
}

/// Banded recency score. Future timestamps count as brand new.
pub fn recency_score(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u8 {
    let Some(ts) = timestamp else {
        return weights::RECENCY_UNKNOWN;
    };
    let age_seconds = now.signed_duration_since(ts).num_seconds().max(0);
    weights::RECENCY_BANDS
        .iter()
        .find(|(hours, _)| age_seconds < hours * 3600)
        .map(|&(_, score)| score)
        .unwrap_or(weights::RECENCY_STALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
    }

    fn scorer() -> FrontierScorer {
        FrontierScorer::new(&FrontierConfig::default()).unwrap()
    }

    fn business_scorer() -> FrontierScorer {
        FrontierScorer::new(&FrontierConfig {
            business_signals: true,
            ..FrontierConfig::default()
        })
        .unwrap()
    }

    fn hours_ago(hours: i64) -> DateTime<Utc> {
        now() - Duration::hours(hours)
    }

    // =========================================================================
    // Composite
    // =========================================================================

    #[test]
    fn test_fresh_authoritative_keyword_item() {
        let item = ContentItem::new("f", "New multimodal reasoning agent", "")
            .with_platform("arxiv")
            .with_published_at(hours_ago(2));

        let score = scorer().score(&item, now());
        assert_eq!(score.recency, 50);
        assert_eq!(score.authority, 20);
        assert_eq!(score.keyword, 9);
        assert_eq!(score.structure, 0);
        assert_eq!(score.total, 79);
        assert!((70..=100).contains(&score.total));
    }

    #[test]
    fn test_total_clamped_to_100() {
        let item = ContentItem::new(
            "max",
            "OpenAI raises $10 billion and launches open-source multimodal reasoning agent v2.1.0",
            "The LLM (arXiv:2403.01234) is a 70B MoE foundation model that scores 92.1 on MMLU. \
             benchmark inference transformer fine-tuning RLHF SOTA state-of-the-art open weights \
             large language model research paper dataset GPU training.",
        )
        .with_platform("openai")
        .with_published_at(hours_ago(1));

        let score = business_scorer().score(&item, now());
        assert_eq!(score.keyword, 30);
        assert_eq!(score.structure, 40);
        assert_eq!(score.business, 25);
        assert_eq!(score.product, 20);
        assert_eq!(score.total, 100);
    }

    // =========================================================================
    // Recency
    // =========================================================================

    #[test]
    fn test_recency_bands() {
        let cases = [
            (1, 50),
            (5, 50),
            (6, 45),
            (23, 45),
            (30, 38),
            (60, 30),
            (100, 20),
            (167, 20),
            (168, 10),
            (1000, 10),
        ];
        for (hours, expected) in cases {
            assert_eq!(
                recency_score(Some(hours_ago(hours)), now()),
                expected,
                "age {}h",
                hours
            );
        }
    }

    #[test]
    fn test_recency_missing_and_future() {
        assert_eq!(recency_score(None, now()), 20);
        assert_eq!(recency_score(Some(now() + Duration::hours(3)), now()), 50);
    }

    #[test]
    fn test_best_timestamp_precedence() {
        let collected = hours_ago(100);
        let item = ContentItem::new("t", "T", "")
            .with_published_raw(hours_ago(30).to_rfc3339())
            .with_collected_at(collected);
        assert_eq!(best_timestamp(&item), Some(hours_ago(30)));

        let item = item.with_published_at(hours_ago(2));
        assert_eq!(best_timestamp(&item), Some(hours_ago(2)));

        let item = ContentItem::new("t", "T", "")
            .with_published_raw("sometime last week")
            .with_collected_at(collected);
        assert_eq!(best_timestamp(&item), Some(collected));

        let item = ContentItem::new("t", "T", "").with_published_raw("sometime last week");
        assert_eq!(best_timestamp(&item), None);
        assert_eq!(scorer().score(&item, now()).recency, 20);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-03-14T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-14T11:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_timestamp("Sat, 14 Mar 2026 09:30:00 +0000"),
            Some(expected)
        );
        assert_eq!(parse_timestamp("2026-03-14 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2026-03-14T09:30:00 "), Some(expected));
        assert_eq!(
            parse_timestamp("2026-03-14"),
            Some(Utc.with_ymd_and_hms(2026, 3, 14, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    // =========================================================================
    // Authority
    // =========================================================================

    #[test]
    fn test_authority_tiers() {
        let scorer = scorer();
        assert_eq!(scorer.authority_score(Some("arxiv")), 20);
        assert_eq!(scorer.authority_score(Some("TechCrunch")), 12);
        assert_eq!(scorer.authority_score(Some(" reddit ")), 8);
        assert_eq!(scorer.authority_score(Some("personal blog")), 4);
        assert_eq!(scorer.authority_score(None), 4);
    }

    // =========================================================================
    // Keywords
    // =========================================================================

    #[test]
    fn test_keyword_terms_count_once() {
        let scorer = scorer();
        assert_eq!(scorer.keyword_score("agent agent Agent"), 3);
        assert_eq!(scorer.keyword_score("an agent and a GPU"), 4);
    }

    #[test]
    fn test_low_value_inside_high_value_not_double_counted() {
        let scorer = scorer();
        assert_eq!(scorer.keyword_score("a large language model"), 3);
        assert_eq!(scorer.keyword_score("a large language model and a model"), 4);
        assert_eq!(scorer.keyword_score("a large language model, AI"), 4);
    }

    #[test]
    fn test_keyword_cap() {
        let text = "LLM reasoning agent multimodal open-source benchmark RLHF inference \
                    transformer SOTA fine-tuning";
        assert_eq!(scorer().keyword_score(text), 30);
    }

    // =========================================================================
    // Structure
    // =========================================================================

    #[test]
    fn test_structure_detectors() {
        let scorer = scorer();
        assert_eq!(scorer.structure_score("See arXiv:2401.12345 for details"), 15);
        assert_eq!(scorer.structure_score("https://arxiv.org/abs/2401.12345"), 15);
        assert_eq!(scorer.structure_score("Released v1.2.0 today"), 10);
        assert_eq!(scorer.structure_score("It scores 88.7 on MMLU"), 15);
        assert_eq!(scorer.structure_score("A 7B model"), 10);
        assert_eq!(scorer.structure_score("A sparse MoE design"), 10);
        assert_eq!(scorer.structure_score("plain text"), 0);
    }

    #[test]
    fn test_benchmark_needs_nearby_number() {
        let scorer = scorer();
        let far = format!("MMLU {} 88", "results were discussed at length ".repeat(3));
        assert_eq!(scorer.structure_score(&far), 0);
        assert_eq!(scorer.structure_score("MMLU results: 88%"), 15);
    }

    #[test]
    fn test_benchmark_names_match_case_exactly() {
        let scorer = scorer();
        assert_eq!(scorer.structure_score("The math is simple: 3 apples plus 4 apples"), 0);
        assert_eq!(scorer.structure_score("The math is simple: 3 apples"), 0);
        assert_eq!(scorer.structure_score("It reaches 71.2 on MATH"), 15);
    }

    #[test]
    fn test_structure_detectors_count_once_and_cap() {
        let scorer = scorer();
        assert_eq!(scorer.structure_score("7B and 13B and 70B"), 10);
        let all = "arXiv:2401.12345 v2.0.1 7B scores 90 on GSM8K";
        assert_eq!(scorer.structure_score(all), 40);
    }

    // =========================================================================
    // Business and product
    // =========================================================================

    #[test]
    fn test_business_signal() {
        let scorer = business_scorer();
        assert_eq!(scorer.business_score("Anthropic raises $4 billion"), 25);
        assert_eq!(scorer.business_score("A startup closes $5M seed funding"), 10);
        assert_eq!(scorer.business_score("Anthropic publishes a paper"), 0);
    }

    #[test]
    fn test_product_signal() {
        assert_eq!(product_score("Anthropic launches a new API"), 20);
        assert_eq!(product_score("Mistral releases v0.3 weights"), 20);
        assert_eq!(product_score("The company launched a campaign"), 8);
        assert_eq!(product_score("Nothing happened"), 0);
    }

    #[test]
    fn test_bonuses_disabled_by_default() {
        let item = ContentItem::new("b", "OpenAI raises $6 billion and launches API", "");
        let score = scorer().score(&item, now());
        assert_eq!(score.business, 0);
        assert_eq!(score.product, 0);

        let score = business_scorer().score(&item, now());
        assert_eq!(score.business, 25);
        assert_eq!(score.product, 20);
    }

    // =========================================================================
    // Ranking
    // =========================================================================

    #[test]
    fn test_rank_orders_by_total_stably() {
        let items = vec![
            ContentItem::new("old", "agent", "").with_published_at(hours_ago(500)),
            ContentItem::new("fresh", "agent", "").with_published_at(hours_ago(1)),
            ContentItem::new("tie", "agent", "").with_published_at(hours_ago(2)),
            ContentItem::new("mid", "agent", "").with_published_at(hours_ago(30)),
        ];

        let ranked = scorer().rank(&items, now(), 10);
        let ids: Vec<&str> = ranked.iter().map(|s| s.item.id.as_str()).collect();
        assert_eq!(ids, vec!["fresh", "tie", "mid", "old"]);
        assert!(ranked[0].score.total >= ranked[1].score.total);

        let top = scorer().rank_items(&items, now(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, "fresh");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Property: score stays within [0, 100] with every bonus enabled
            #[test]
            fn prop_score_bounded(
                title in "\\PC{0,120}",
                body in "\\PC{0,400}",
                platform in prop::option::of("[a-z ]{0,12}"),
                offset_hours in -100i64..2000,
            ) {
                let mut item = ContentItem::new("p", title, body)
                    .with_published_at(now() - Duration::hours(offset_hours));
                item.platform = platform;

                let score = business_scorer().score(&item, now());
                prop_assert!(score.total <= 100);
                prop_assert!(score.recency <= 50);
                prop_assert!(score.authority <= 20);
                prop_assert!(score.keyword <= 30);
                prop_assert!(score.structure <= 40);
                prop_assert!(score.business <= 25);
                prop_assert!(score.product <= 20);

                let sum: u32 = [score.recency, score.authority, score.keyword, score.structure, score.business, score.product]
                    .iter()
                    .map(|&c| u32::from(c))
                    .sum();
                prop_assert_eq!(u32::from(score.total), sum.min(100));
            }
        }
    }
}
