//! Configuration loading for newsgate.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.newsgate/config.toml`)
//! 3. User config (`~/.newsgate/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! Everything is read-only after load. Gates and scorers compile what they
//! need from it once and share it by reference.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::GateLevel;
use crate::error::{GateError, Result};

/// Main configuration struct for newsgate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Adaptive gate tiers and keep policy.
    pub gate: AdaptiveGateConfig,
    /// Split gate thresholds and fallback floors.
    pub split: SplitGateConfig,
    /// Keyword lists for hard rejects, topic relevance, and density hints.
    pub keywords: KeywordConfig,
    /// Density scorer weights and caps.
    pub density: DensityConfig,
    /// Frontier scorer inputs.
    pub frontier: FrontierConfig,
}

// =============================================================================
// Adaptive gate
// =============================================================================

/// Adaptive gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdaptiveGateConfig {
    /// Relax to the next tier while fewer than this many items pass.
    pub min_keep_items: usize,
    /// Tiers ordered strictest first.
    pub levels: Vec<GateLevel>,
    /// Density score at or above which a threshold failure is soft-passed.
    pub density_soft_pass_min: u8,
}

impl Default for AdaptiveGateConfig {
    fn default() -> Self {
        Self {
            min_keep_items: 6,
            levels: vec![GateLevel::new(1200, 3), GateLevel::new(600, 2)],
            density_soft_pass_min: 35,
        }
    }
}

// =============================================================================
// Split gate
// =============================================================================

/// Split gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplitGateConfig {
    /// Thresholds for the event pool.
    pub event: GateLevel,
    /// Thresholds for the signal pool (never stricter than `event`).
    pub signal: GateLevel,
    /// Soft-pass and fallback floors.
    pub floors: SplitFloors,
}

impl Default for SplitGateConfig {
    fn default() -> Self {
        Self {
            event: GateLevel::new(1000, 3),
            signal: GateLevel::new(400, 2),
            floors: SplitFloors::default(),
        }
    }
}

/// Floors for the signal soft-pass and the starvation-guard fallback.
///
/// Each length floor is the larger of an absolute minimum and a fraction of
/// the signal tier's `min_length`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplitFloors {
    /// Fraction of the signal length required for a soft pass.
    pub soft_length_ratio: f64,
    /// Absolute length floor for a soft pass.
    pub soft_length_floor: usize,
    /// Minimum sentences for a soft pass.
    pub soft_sentence_floor: usize,
    /// Minimum density for a soft pass.
    pub soft_density_min: u8,
    /// Fraction of the signal length required for a fallback candidate.
    pub fallback_length_ratio: f64,
    /// Absolute length floor for a fallback candidate.
    pub fallback_length_floor: usize,
    /// Minimum sentences for a fallback candidate.
    pub fallback_min_sentences: usize,
    /// Minimum density for a fallback candidate.
    pub fallback_density_min: u8,
    /// At most this many fallback candidates are promoted.
    pub max_fallback_promotions: usize,
}

impl Default for SplitFloors {
    fn default() -> Self {
        Self {
            soft_length_ratio: 0.6,
            soft_length_floor: 180,
            soft_sentence_floor: 2,
            soft_density_min: 30,
            fallback_length_ratio: 0.25,
            fallback_length_floor: 60,
            fallback_min_sentences: 1,
            fallback_density_min: 16,
            max_fallback_promotions: 3,
        }
    }
}

impl SplitFloors {
    /// Minimum length for a signal soft pass.
    pub fn soft_min_length(&self, signal: &GateLevel) -> usize {
        scaled(signal.min_length, self.soft_length_ratio).max(self.soft_length_floor)
    }

    /// Minimum sentences for a signal soft pass.
    pub fn soft_min_sentences(&self, signal: &GateLevel) -> usize {
        signal
            .min_sentences
            .saturating_sub(1)
            .max(self.soft_sentence_floor)
    }

    /// Minimum length for a fallback candidate.
    pub fn fallback_min_length(&self, signal: &GateLevel) -> usize {
        scaled(signal.min_length, self.fallback_length_ratio).max(self.fallback_length_floor)
    }

    fn is_valid_ratio(value: f64) -> bool {
        value.is_finite() && value > 0.0 && value <= 1.0
    }
}

fn scaled(value: usize, ratio: f64) -> usize {
    (value as f64 * ratio) as usize
}

// =============================================================================
// Keywords
// =============================================================================

/// Keyword lists consumed by the classifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeywordConfig {
    /// Case-insensitive substrings that reject an item outright.
    pub hard_reject: Vec<String>,
    /// Terms that make an item on-topic. Empty disables the topic check.
    pub topic: Vec<String>,
    /// Domain terms that raise the density score.
    pub domain_hints: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            hard_reject: to_strings(&[
                "digest",
                "roundup",
                "round-up",
                "subscribe",
                "newsletter",
                "sponsored",
                "advertisement",
                "webinar",
            ]),
            topic: to_strings(&[
                "AI",
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "neural network",
                "LLM",
                "LLMs",
                "large language model",
                "language model",
                "foundation model",
                "GPT",
                "ChatGPT",
                "Claude",
                "Gemini",
                "Llama",
                "OpenAI",
                "Anthropic",
                "DeepMind",
                "Hugging Face",
                "transformer",
                "diffusion model",
                "multimodal",
                "fine-tuning",
                "reinforcement learning",
                "AI agent",
                "AGI",
                "人工智能",
                "大模型",
                "机器学习",
            ]),
            domain_hints: to_strings(&[
                "model",
                "benchmark",
                "dataset",
                "parameters",
                "inference",
                "training",
                "GPU",
                "API",
                "open-source",
                "release",
                "agent",
                "reasoning",
            ]),
        }
    }
}

// =============================================================================
// Density
// =============================================================================

/// Weights and caps for the density scorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DensityConfig {
    /// Points per numeric match (years, versions, quantities).
    pub numeric_weight: u32,
    /// Cap for the numeric sub-score.
    pub numeric_cap: u32,
    /// Points per capitalized token run.
    pub entity_weight: u32,
    /// Points per domain hint match.
    pub hint_weight: u32,
    /// Cap for the entity/keyword sub-score.
    pub entity_cap: u32,
    /// Points per sentence beyond the first.
    pub sentence_weight: u32,
    /// Cap for the structural sub-score.
    pub structure_cap: u32,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            numeric_weight: 8,
            numeric_cap: 40,
            entity_weight: 3,
            hint_weight: 5,
            entity_cap: 35,
            sentence_weight: 5,
            structure_cap: 25,
        }
    }
}

// =============================================================================
// Frontier
// =============================================================================

/// Frontier scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrontierConfig {
    /// Terms worth 3 points each.
    pub high_value_keywords: Vec<String>,
    /// Terms worth 1 point each.
    pub low_value_keywords: Vec<String>,
    /// Source authority tiers.
    pub platforms: PlatformTiers,
    /// Benchmark names that count when a score sits nearby.
    pub benchmarks: Vec<String>,
    /// Characters on each side of a benchmark name searched for a score.
    pub benchmark_window: usize,
    /// Add the business/funding and product-release bonuses.
    pub business_signals: bool,
    /// Company names for the business signal.
    pub companies: Vec<String>,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            high_value_keywords: to_strings(&[
                "LLM",
                "large language model",
                "foundation model",
                "reasoning",
                "agent",
                "multimodal",
                "open-source",
                "open weights",
                "state-of-the-art",
                "SOTA",
                "benchmark",
                "fine-tuning",
                "RLHF",
                "inference",
                "transformer",
            ]),
            low_value_keywords: to_strings(&[
                "AI",
                "model",
                "dataset",
                "GPU",
                "training",
                "research",
                "paper",
                "startup",
                "chatbot",
            ]),
            platforms: PlatformTiers::default(),
            benchmarks: to_strings(&[
                "MMLU",
                "MMLU-Pro",
                "GSM8K",
                "HumanEval",
                "SWE-bench",
                "GPQA",
                "MATH",
                "ARC-AGI",
                "HellaSwag",
                "BBH",
                "LiveCodeBench",
                "AIME",
            ]),
            benchmark_window: 40,
            business_signals: false,
            companies: to_strings(&[
                "OpenAI",
                "Anthropic",
                "Google",
                "DeepMind",
                "Meta",
                "Microsoft",
                "NVIDIA",
                "Mistral",
                "xAI",
                "Apple",
                "Amazon",
                "Hugging Face",
                "Cohere",
                "DeepSeek",
            ]),
        }
    }
}

/// Platform membership tiers for source authority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformTiers {
    /// Worth 20 points.
    pub high: Vec<String>,
    /// Worth 12 points.
    pub medium: Vec<String>,
    /// Worth 8 points.
    pub community: Vec<String>,
}

impl Default for PlatformTiers {
    fn default() -> Self {
        Self {
            high: to_strings(&[
                "arxiv",
                "github",
                "openai",
                "anthropic",
                "deepmind",
                "huggingface",
                "google research",
            ]),
            medium: to_strings(&[
                "techcrunch",
                "the verge",
                "venturebeat",
                "wired",
                "mit technology review",
                "reuters",
                "bloomberg",
            ]),
            community: to_strings(&["hackernews", "reddit", "twitter", "x", "producthunt"]),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Loading
// =============================================================================

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Falls back to user config and env overrides when the working
    /// directory is unavailable.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.newsgate/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = newsgate_home()?;
        Self::read_optional(&home.join("config.toml"))
    }

    /// Load project config from `.newsgate/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::read_optional(&cwd.join(".newsgate").join("config.toml"))
    }

    /// Read a layer that may be absent. A present but broken file is logged.
    fn read_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("ignoring config layer {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Load config from a specific file path.
    ///
    /// Unlike layered loading this surfaces errors: an explicit path the
    /// user named must parse.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| GateError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| GateError::config(e.to_string()))
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GateError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // NEWSGATE_MIN_KEEP_ITEMS
        if let Ok(val) = env::var("NEWSGATE_MIN_KEEP_ITEMS") {
            match val.parse::<usize>() {
                Ok(n) => self.gate.min_keep_items = n,
                Err(_) => tracing::warn!(
                    "Invalid NEWSGATE_MIN_KEEP_ITEMS value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val,
                    self.gate.min_keep_items
                ),
            }
        }

        // NEWSGATE_DENSITY_SOFT_PASS_MIN
        if let Ok(val) = env::var("NEWSGATE_DENSITY_SOFT_PASS_MIN") {
            match val.parse::<u8>() {
                Ok(n) if n <= 100 => self.gate.density_soft_pass_min = n,
                _ => tracing::warn!(
                    "Invalid NEWSGATE_DENSITY_SOFT_PASS_MIN value '{}'. \
                    Must be in range [0, 100]. Using '{}'.",
                    val,
                    self.gate.density_soft_pass_min
                ),
            }
        }

        // NEWSGATE_BUSINESS_SIGNALS
        if let Ok(val) = env::var("NEWSGATE_BUSINESS_SIGNALS") {
            match val.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => self.frontier.business_signals = true,
                "false" | "0" => self.frontier.business_signals = false,
                _ => tracing::warn!(
                    "Invalid NEWSGATE_BUSINESS_SIGNALS value '{}'. \
                    Expected true/false or 1/0. Using '{}'.",
                    val,
                    self.frontier.business_signals
                ),
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence for every field that differs from
    /// its default. Lists are replaced whole, not appended.
    ///
    /// # Limitation
    ///
    /// A layer cannot set a value back to its default to undo a non-default
    /// value from a lower layer, since "unset" and "explicit default" look the
    /// same after deserialization.
    fn merge(mut self, other: Config) -> Self {
        let default_gate = AdaptiveGateConfig::default();
        if other.gate.min_keep_items != default_gate.min_keep_items {
            self.gate.min_keep_items = other.gate.min_keep_items;
        }
        if other.gate.levels != default_gate.levels {
            self.gate.levels = other.gate.levels;
        }
        if other.gate.density_soft_pass_min != default_gate.density_soft_pass_min {
            self.gate.density_soft_pass_min = other.gate.density_soft_pass_min;
        }

        let default_split = SplitGateConfig::default();
        if other.split.event != default_split.event {
            self.split.event = other.split.event;
        }
        if other.split.signal != default_split.signal {
            self.split.signal = other.split.signal;
        }
        if other.split.floors != default_split.floors {
            self.split.floors = other.split.floors;
        }

        let default_keywords = KeywordConfig::default();
        if other.keywords.hard_reject != default_keywords.hard_reject {
            self.keywords.hard_reject = other.keywords.hard_reject;
        }
        if other.keywords.topic != default_keywords.topic {
            self.keywords.topic = other.keywords.topic;
        }
        if other.keywords.domain_hints != default_keywords.domain_hints {
            self.keywords.domain_hints = other.keywords.domain_hints;
        }

        if other.density != DensityConfig::default() {
            self.density = other.density;
        }

        let default_frontier = FrontierConfig::default();
        if other.frontier.high_value_keywords != default_frontier.high_value_keywords {
            self.frontier.high_value_keywords = other.frontier.high_value_keywords;
        }
        if other.frontier.low_value_keywords != default_frontier.low_value_keywords {
            self.frontier.low_value_keywords = other.frontier.low_value_keywords;
        }
        if other.frontier.platforms != default_frontier.platforms {
            self.frontier.platforms = other.frontier.platforms;
        }
        if other.frontier.benchmarks != default_frontier.benchmarks {
            self.frontier.benchmarks = other.frontier.benchmarks;
        }
        if other.frontier.benchmark_window != default_frontier.benchmark_window {
            self.frontier.benchmark_window = other.frontier.benchmark_window;
        }
        if other.frontier.business_signals != default_frontier.business_signals {
            self.frontier.business_signals = other.frontier.business_signals;
        }
        if other.frontier.companies != default_frontier.companies {
            self.frontier.companies = other.frontier.companies;
        }

        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check the preconditions gates rely on.
    ///
    /// Fails fast instead of silently defaulting: an empty level list or a
    /// signal tier stricter than the event tier is a caller bug.
    pub fn validate(&self) -> Result<()> {
        validate_levels(&self.gate.levels)?;

        if self.gate.density_soft_pass_min > 100 {
            return Err(GateError::config(format!(
                "gate.density_soft_pass_min must be in [0, 100], got {}",
                self.gate.density_soft_pass_min
            )));
        }

        if !self.split.signal.is_looser_or_equal(&self.split.event) {
            return Err(GateError::config(format!(
                "split.signal {} must not be stricter than split.event {}",
                self.split.signal, self.split.event
            )));
        }

        let floors = &self.split.floors;
        for (name, ratio) in [
            ("soft_length_ratio", floors.soft_length_ratio),
            ("fallback_length_ratio", floors.fallback_length_ratio),
        ] {
            if !SplitFloors::is_valid_ratio(ratio) {
                return Err(GateError::config(format!(
                    "split.floors.{} must be in (0, 1], got {}",
                    name, ratio
                )));
            }
        }

        for (name, list) in [
            ("keywords.hard_reject", &self.keywords.hard_reject),
            ("keywords.topic", &self.keywords.topic),
            ("keywords.domain_hints", &self.keywords.domain_hints),
            ("frontier.high_value_keywords", &self.frontier.high_value_keywords),
            ("frontier.low_value_keywords", &self.frontier.low_value_keywords),
            ("frontier.benchmarks", &self.frontier.benchmarks),
            ("frontier.companies", &self.frontier.companies),
        ] {
            if let Some(index) = list.iter().position(|k| k.trim().is_empty()) {
                return Err(GateError::config(format!(
                    "{} contains an empty keyword at index {}",
                    name, index
                )));
            }
        }

        Ok(())
    }
}

/// Check an ordered level list: non-empty, strictest first.
pub fn validate_levels(levels: &[GateLevel]) -> Result<()> {
    if levels.is_empty() {
        return Err(GateError::config("gate levels must not be empty"));
    }
    for pair in levels.windows(2) {
        if !pair[1].is_looser_or_equal(&pair[0]) {
            return Err(GateError::config(format!(
                "gate levels must be ordered strictest first: {} follows {}",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}

/// Get the newsgate home directory.
///
/// Checks `NEWSGATE_HOME` first, then falls back to `~/.newsgate`.
/// An empty `NEWSGATE_HOME` is ignored.
pub fn newsgate_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("NEWSGATE_HOME") {
        if home.is_empty() {
            tracing::warn!("NEWSGATE_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(".newsgate"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        env::remove_var("NEWSGATE_MIN_KEEP_ITEMS");
        env::remove_var("NEWSGATE_DENSITY_SOFT_PASS_MIN");
        env::remove_var("NEWSGATE_BUSINESS_SIGNALS");
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gate.min_keep_items, 6);
        assert_eq!(
            config.gate.levels,
            vec![GateLevel::new(1200, 3), GateLevel::new(600, 2)]
        );
        assert_eq!(config.gate.density_soft_pass_min, 35);
        assert_eq!(config.split.event, GateLevel::new(1000, 3));
        assert_eq!(config.split.signal, GateLevel::new(400, 2));
        assert!(!config.frontier.business_signals);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_split_floor_derivations() {
        let floors = SplitFloors::default();
        let signal = GateLevel::new(400, 2);
        assert_eq!(floors.soft_min_length(&signal), 240);
        assert_eq!(floors.soft_min_sentences(&signal), 2);
        assert_eq!(floors.fallback_min_length(&signal), 100);

        let short_signal = GateLevel::new(200, 4);
        assert_eq!(floors.soft_min_length(&short_signal), 180);
        assert_eq!(floors.soft_min_sentences(&short_signal), 3);
        assert_eq!(floors.fallback_min_length(&short_signal), 60);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_validate_rejects_empty_levels() {
        let mut config = Config::default();
        config.gate.levels.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_validate_rejects_misordered_levels() {
        let mut config = Config::default();
        config.gate.levels = vec![GateLevel::new(600, 2), GateLevel::new(1200, 3)];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_single_level() {
        let mut config = Config::default();
        config.gate.levels = vec![GateLevel::new(800, 2)];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_strict_signal() {
        let mut config = Config::default();
        config.split.signal = GateLevel::new(2000, 2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("split.signal"));
    }

    #[test]
    fn test_validate_rejects_empty_keyword() {
        let mut config = Config::default();
        config.keywords.topic.push("  ".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("keywords.topic"));
    }

    #[test]
    fn test_validate_rejects_bad_ratio() {
        let mut config = Config::default();
        config.split.floors.fallback_length_ratio = 0.0;
        assert!(config.validate().is_err());
        config.split.floors.fallback_length_ratio = f64::NAN;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Loading and merging
    // =========================================================================

    #[test]
    #[serial]
    fn test_load_from_cwd_without_files_uses_defaults() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var("NEWSGATE_HOME", home.path());
        let dir = TempDir::new().unwrap();

        let config = Config::load_from_cwd(dir.path());
        assert_eq!(config, Config::default());

        env::remove_var("NEWSGATE_HOME");
    }

    #[test]
    #[serial]
    fn test_project_config_overrides_defaults() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var("NEWSGATE_HOME", home.path());
        let dir = TempDir::new().unwrap();
        let project = dir.path().join(".newsgate");
        fs::create_dir_all(&project).unwrap();
        fs::write(
            project.join("config.toml"),
            r#"
[gate]
min_keep_items = 3
levels = [{ min_length = 900, min_sentences = 3 }, { min_length = 300, min_sentences = 1 }]

[keywords]
hard_reject = ["promo"]
"#,
        )
        .unwrap();

        let config = Config::load_from_cwd(dir.path());
        assert_eq!(config.gate.min_keep_items, 3);
        assert_eq!(config.gate.levels[1], GateLevel::new(300, 1));
        assert_eq!(config.keywords.hard_reject, vec!["promo"]);
        // Untouched sections keep defaults
        assert_eq!(config.split, SplitGateConfig::default());

        env::remove_var("NEWSGATE_HOME");
    }

    #[test]
    #[serial]
    fn test_project_config_beats_user_config() {
        clear_env();
        let home = TempDir::new().unwrap();
        fs::write(
            home.path().join("config.toml"),
            "[gate]\nmin_keep_items = 10\ndensity_soft_pass_min = 50\n",
        )
        .unwrap();
        env::set_var("NEWSGATE_HOME", home.path());

        let dir = TempDir::new().unwrap();
        let project = dir.path().join(".newsgate");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("config.toml"), "[gate]\nmin_keep_items = 4\n").unwrap();

        let config = Config::load_from_cwd(dir.path());
        assert_eq!(config.gate.min_keep_items, 4);
        // Field-level merge keeps the user layer's other values
        assert_eq!(config.gate.density_soft_pass_min, 50);

        env::remove_var("NEWSGATE_HOME");
    }

    #[test]
    #[serial]
    fn test_broken_project_config_is_ignored() {
        clear_env();
        let home = TempDir::new().unwrap();
        env::set_var("NEWSGATE_HOME", home.path());
        let dir = TempDir::new().unwrap();
        let project = dir.path().join(".newsgate");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("config.toml"), "this is not toml [").unwrap();

        let config = Config::load_from_cwd(dir.path());
        assert_eq!(config, Config::default());

        env::remove_var("NEWSGATE_HOME");
    }

    #[test]
    fn test_load_from_file_surfaces_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "gate = 5").unwrap();
        assert!(matches!(
            Config::load_from_file(&path),
            Err(GateError::Config { .. })
        ));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load_from_file(&missing),
            Err(GateError::Storage { .. })
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = Config::default();
        let text = config.to_toml_string().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let mut other = Config::default();
        other.frontier.business_signals = true;
        other.split.signal = GateLevel::new(300, 1);

        let merged = base.merge(other);
        assert!(merged.frontier.business_signals);
        assert_eq!(merged.split.signal, GateLevel::new(300, 1));
        assert_eq!(merged.split.event, GateLevel::new(1000, 3));
    }

    // =========================================================================
    // Environment overrides
    // =========================================================================

    #[test]
    #[serial]
    fn test_env_overrides_applied() {
        clear_env();
        env::set_var("NEWSGATE_MIN_KEEP_ITEMS", "2");
        env::set_var("NEWSGATE_DENSITY_SOFT_PASS_MIN", "40");
        env::set_var("NEWSGATE_BUSINESS_SIGNALS", "1");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.gate.min_keep_items, 2);
        assert_eq!(config.gate.density_soft_pass_min, 40);
        assert!(config.frontier.business_signals);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_invalid_values_ignored() {
        clear_env();
        env::set_var("NEWSGATE_MIN_KEEP_ITEMS", "many");
        env::set_var("NEWSGATE_DENSITY_SOFT_PASS_MIN", "250");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.gate.min_keep_items, 6);
        assert_eq!(config.gate.density_soft_pass_min, 35);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_business_signals_values() {
        clear_env();
        let mut config = Config::default();
        config.frontier.business_signals = true;

        env::set_var("NEWSGATE_BUSINESS_SIGNALS", "yes");
        config.apply_env_overrides();
        assert!(config.frontier.business_signals);

        env::set_var("NEWSGATE_BUSINESS_SIGNALS", "FALSE");
        config.apply_env_overrides();
        assert!(!config.frontier.business_signals);

        env::set_var("NEWSGATE_BUSINESS_SIGNALS", "TRUE");
        config.apply_env_overrides();
        assert!(config.frontier.business_signals);

        env::set_var("NEWSGATE_BUSINESS_SIGNALS", "0");
        config.apply_env_overrides();
        assert!(!config.frontier.business_signals);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_newsgate_home_with_env() {
        let dir = TempDir::new().unwrap();
        env::set_var("NEWSGATE_HOME", dir.path());
        assert_eq!(newsgate_home().unwrap(), dir.path());
        env::remove_var("NEWSGATE_HOME");
    }

    #[test]
    #[serial]
    fn test_newsgate_home_empty_env_falls_back() {
        env::set_var("NEWSGATE_HOME", "");
        if let Some(home) = newsgate_home() {
            assert!(home.ends_with(".newsgate"));
        }
        env::remove_var("NEWSGATE_HOME");
    }
}
