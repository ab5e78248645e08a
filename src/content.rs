//! External content documents: feature flags, wizard configuration, and
//! content-pack metadata.
//!
//! Flags are best-effort (a failed fetch is swallowed and every flag reads
//! false); the wizard configuration is required and a failed fetch aborts
//! initialization. Nothing is cached beyond this struct — a fresh load is
//! always requested so config changes land between sessions.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::api::ApiClient;
use crate::error::ConfigError;

/// Reserved question key with multi-select semantics. Every other chip
/// question is single-select.
pub const GOALS_KEY: &str = "goals";

/// An industry choice with its keyword suggestions and note placeholder.
#[derive(Debug, Clone, Deserialize)]
pub struct Industry {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub suggested_keywords: Vec<String>,
    #[serde(default)]
    pub note_placeholder: Option<String>,
}

/// A tone choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Tone {
    pub key: String,
    pub label: String,
}

/// A platform choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Platform {
    pub key: String,
    pub label: String,
}

/// Rendering kind of an industry question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Chips,
    Text,
}

/// One industry-specific question. Question keys are unique within an
/// industry's list.
#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub label: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl Question {
    /// Whether selections toggle membership in a set rather than replace
    /// each other.
    pub fn is_multi_select(&self) -> bool {
        self.kind == QuestionKind::Chips && self.key == GOALS_KEY
    }
}

/// The wizard configuration document (`config.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WizardConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub industries: Vec<Industry>,
    #[serde(default)]
    pub tones: Vec<Tone>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub questions: BTreeMap<String, Vec<Question>>,
}

impl WizardConfig {
    pub fn industry(&self, key: &str) -> Option<&Industry> {
        self.industries.iter().find(|i| i.key == key)
    }

    /// Ordered question list for an industry; empty when unmapped.
    pub fn questions_for(&self, industry_key: &str) -> &[Question] {
        self.questions
            .get(industry_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The feature-flags document (`flags.json`). Absent flags read false.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureFlags(serde_json::Map<String, serde_json::Value>);

impl FeatureFlags {
    pub fn enabled(&self, name: &str) -> bool {
        self.0.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// 7-day access requires paid status.
    pub fn gate_seven_day_to_paid(&self) -> bool {
        self.enabled("gate7DayToPaid")
    }

    /// The 7-day option is offered in the UI at all.
    pub fn show_seven_day_option(&self) -> bool {
        self.enabled("show7DayOption")
    }
}

/// Content-pack metadata from `/api/content`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentMeta {
    #[serde(default)]
    pub version: Option<String>,
}

/// Loaded configuration, read-only for the rest of the session.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    pub config: WizardConfig,
    pub flags: FeatureFlags,
    pub content_meta: Option<ContentMeta>,
}

impl ConfigStore {
    /// Fetch flags (best-effort), then the wizard configuration
    /// (required), then content metadata (best-effort).
    pub async fn load(api: &ApiClient) -> Result<Self, ConfigError> {
        let flags = match Self::fetch_flags(api).await {
            Ok(flags) => flags,
            Err(e) => {
                tracing::warn!("flags.json unavailable, flags default to false: {e}");
                FeatureFlags::default()
            }
        };

        let config = Self::fetch_config(api)
            .await
            .map_err(|e| ConfigError::WizardConfig(e.to_string()))?;

        let content_meta = match api.get_json::<ContentMeta>("/api/content").await {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!("content metadata unavailable: {e}");
                None
            }
        };

        Ok(Self {
            config,
            flags,
            content_meta,
        })
    }

    async fn fetch_flags(api: &ApiClient) -> Result<FeatureFlags, anyhow::Error> {
        let resp = api.get_no_store("/static/content/flags.json").await?;
        if !resp.status().is_success() {
            anyhow::bail!("HTTP {}", resp.status().as_u16());
        }
        Ok(resp.json::<FeatureFlags>().await?)
    }

    async fn fetch_config(api: &ApiClient) -> Result<WizardConfig, anyhow::Error> {
        let resp = api.get_no_store("/static/content/config.json").await?;
        if !resp.status().is_success() {
            anyhow::bail!("HTTP {}", resp.status().as_u16());
        }
        Ok(resp.json::<WizardConfig>().await?)
    }

    /// Active content version: `/api/content` wins, then the config
    /// document's own version, then the configured fallback.
    pub fn content_version<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.content_meta
            .as_ref()
            .and_then(|m| m.version.as_deref())
            .or(self.config.version.as_deref())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> WizardConfig {
        serde_json::from_value(serde_json::json!({
            "version": "2024-06",
            "industries": [
                {
                    "key": "bakery",
                    "label": "Bakery",
                    "icon": "🥐",
                    "suggested_keywords": ["sourdough", "pastry", "fresh", "local", "seasonal"],
                    "note_placeholder": "e.g. we mill our own flour"
                },
                {"key": "realtor", "label": "Realtor"}
            ],
            "tones": [{"key": "friendly", "label": "Friendly"}],
            "platforms": [
                {"key": "instagram", "label": "Instagram"},
                {"key": "tiktok", "label": "TikTok"}
            ],
            "questions": {
                "bakery": [
                    {"key": "goals", "type": "chips", "label": "Goals",
                     "options": ["More foot traffic", "Online orders"]},
                    {"key": "specialty", "type": "chips", "label": "Specialty",
                     "options": ["Bread", "Cakes"]},
                    {"key": "note", "type": "text", "label": "Anything else?"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn config_document_parses() {
        let cfg = sample_config();
        assert_eq!(cfg.industries.len(), 2);
        assert_eq!(cfg.industry("bakery").unwrap().label, "Bakery");
        assert_eq!(cfg.questions_for("bakery").len(), 3);
        assert!(cfg.questions_for("realtor").is_empty());
    }

    #[test]
    fn goals_is_the_only_multi_select_chip() {
        let cfg = sample_config();
        let qs = cfg.questions_for("bakery");
        assert!(qs[0].is_multi_select());
        assert!(!qs[1].is_multi_select());
        assert!(!qs[2].is_multi_select());
    }

    #[test]
    fn absent_flags_read_false() {
        let flags = FeatureFlags::default();
        assert!(!flags.gate_seven_day_to_paid());
        assert!(!flags.show_seven_day_option());
    }

    #[test]
    fn flags_document_parses() {
        let flags: FeatureFlags =
            serde_json::from_str(r#"{"gate7DayToPaid": true, "show7DayOption": false}"#).unwrap();
        assert!(flags.gate_seven_day_to_paid());
        assert!(!flags.show_seven_day_option());
        assert!(!flags.enabled("unknown"));
    }

    #[test]
    fn non_boolean_flag_values_read_false() {
        let flags: FeatureFlags = serde_json::from_str(r#"{"gate7DayToPaid": "yes"}"#).unwrap();
        assert!(!flags.gate_seven_day_to_paid());
    }

    #[test]
    fn content_version_fallback_chain() {
        let mut store = ConfigStore {
            config: sample_config(),
            flags: FeatureFlags::default(),
            content_meta: Some(ContentMeta {
                version: Some("pack-9".into()),
            }),
        };
        assert_eq!(store.content_version("local"), "pack-9");

        store.content_meta = None;
        assert_eq!(store.content_version("local"), "2024-06");

        store.config.version = None;
        assert_eq!(store.content_version("local"), "local");
    }
}
