//! The draft profile: the in-progress, locally held set of wizard answers.
//!
//! Owned by [`super::WizardState`], mutated only through the operations
//! here, and persisted at well-defined checkpoints (save, finish) by
//! `profile::ProfileSync`. Serialization matches the `/api/profile` and
//! `/api/generate` request bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::content::Industry;

/// How many suggested keywords seed an empty keyword list on industry
/// selection.
const SEED_KEYWORD_COUNT: usize = 4;

/// The wizard answer aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftProfile {
    /// Industry label, e.g. "Bakery".
    pub industry: String,
    /// Industry key for config lookups, e.g. "bakery".
    #[serde(default)]
    pub industry_key: String,
    /// Tone key.
    pub tone: String,
    /// Selected platform keys. Never empty after any user action.
    pub platforms: Vec<String>,
    /// Ordered brand/niche keywords. Duplicates are possible by design.
    pub brand_keywords: Vec<String>,
    /// Mirrors `brand_keywords` at the final step.
    pub niche_keywords: Vec<String>,
    pub include_images: bool,
    pub company: String,
    /// Multi-select goals, in order of first selection.
    pub goals: Vec<String>,
    /// Single answers keyed by question key. Preserved across industry
    /// switches so flipping back restores prior entries.
    pub details: BTreeMap<String, String>,
}

impl DraftProfile {
    /// Empty draft with the default platform selected.
    pub fn new(default_platform: &str) -> Self {
        Self {
            industry: String::new(),
            industry_key: String::new(),
            tone: String::new(),
            platforms: vec![default_platform.to_string()],
            brand_keywords: Vec::new(),
            niche_keywords: Vec::new(),
            include_images: true,
            company: String::new(),
            goals: Vec::new(),
            details: BTreeMap::new(),
        }
    }

    // ── Industry ────────────────────────────────────────────────────

    /// Select an industry: set label and key, and seed suggested keywords
    /// only when the draft has none. Goals and details entered under other
    /// industries stay put — switching back must not drop them.
    pub fn select_industry(&mut self, industry: &Industry) {
        self.industry = industry.label.clone();
        self.industry_key = industry.key.clone();
        if self.brand_keywords.is_empty() && !industry.suggested_keywords.is_empty() {
            self.brand_keywords = industry
                .suggested_keywords
                .iter()
                .take(SEED_KEYWORD_COUNT)
                .cloned()
                .collect();
        }
    }

    // ── Tone & platforms ────────────────────────────────────────────

    pub fn select_tone(&mut self, tone_key: &str) {
        self.tone = tone_key.to_string();
    }

    /// Toggle a platform. An emptied selection is replaced with exactly
    /// the default platform.
    pub fn toggle_platform(&mut self, platform_key: &str, default_platform: &str) {
        match self.platforms.iter().position(|p| p == platform_key) {
            Some(idx) => {
                self.platforms.remove(idx);
            }
            None => self.platforms.push(platform_key.to_string()),
        }
        if self.platforms.is_empty() {
            self.platforms = vec![default_platform.to_string()];
        }
    }

    // ── Goals & details ─────────────────────────────────────────────

    /// Toggle membership for the multi-select `goals` question, preserving
    /// order of first selection.
    pub fn toggle_goal(&mut self, option: &str) {
        match self.goals.iter().position(|g| g == option) {
            Some(idx) => {
                self.goals.remove(idx);
            }
            None => self.goals.push(option.to_string()),
        }
    }

    /// Exclusive chip selection: a new option replaces the prior one, and
    /// re-selecting the active option clears it.
    pub fn select_choice(&mut self, question_key: &str, option: &str) {
        if self.details.get(question_key).map(String::as_str) == Some(option) {
            self.details.remove(question_key);
        } else {
            self.details
                .insert(question_key.to_string(), option.to_string());
        }
    }

    /// Write a free-text answer, trimmed, on every edit.
    pub fn set_detail_text(&mut self, question_key: &str, value: &str) {
        self.details
            .insert(question_key.to_string(), value.trim().to_string());
    }

    pub fn choice(&self, question_key: &str) -> Option<&str> {
        self.details.get(question_key).map(String::as_str)
    }

    pub fn has_goal(&self, option: &str) -> bool {
        self.goals.iter().any(|g| g == option)
    }

    // ── Keywords ────────────────────────────────────────────────────

    /// Toggle a suggested-keyword chip: remove the first occurrence if
    /// present, otherwise append.
    pub fn toggle_keyword(&mut self, keyword: &str) {
        match self.brand_keywords.iter().position(|k| k == keyword) {
            Some(idx) => {
                self.brand_keywords.remove(idx);
            }
            None => self.brand_keywords.push(keyword.to_string()),
        }
    }

    /// Commit comma-separated free-form keywords: split, trim, drop empty
    /// fragments, append. Duplicates are kept.
    pub fn commit_keywords(&mut self, text: &str) {
        self.brand_keywords.extend(
            text.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
    }

    /// At the final step the niche list mirrors the brand list exactly.
    pub fn mirror_niche_keywords(&mut self) {
        self.niche_keywords = self.brand_keywords.clone();
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.brand_keywords.iter().any(|k| k == keyword)
    }

    // ── Company ─────────────────────────────────────────────────────

    /// Live edit of the company field (trimmed).
    pub fn set_company(&mut self, value: &str) {
        self.company = value.trim().to_string();
    }

    /// Blur normalization: collapse internal whitespace runs and
    /// title-case each token (first character uppercased, remainder
    /// untouched).
    pub fn normalize_company(&mut self) {
        self.company = self
            .company
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
    }

    // ── Defaults ────────────────────────────────────────────────────

    /// Fill unset fields before a generation-triggered save.
    pub fn fill_defaults(&mut self, config: &AppConfig) {
        if self.industry.is_empty() {
            self.industry = config.default_industry.clone();
        }
        if self.tone.is_empty() {
            self.tone = config.default_tone.clone();
        }
        if self.platforms.is_empty() {
            self.platforms = vec![config.default_platform.clone()];
        }
    }
}
