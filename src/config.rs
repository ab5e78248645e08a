//! Client runtime settings.

/// Settings for a client session, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the backend, no trailing slash.
    pub base_url: String,
    /// Platform restored whenever the selection would become empty.
    pub default_platform: String,
    /// Industry label assumed when generating with an unset draft.
    pub default_industry: String,
    /// Tone key assumed when generating with an unset draft.
    pub default_tone: String,
    /// Content version reported when no document supplies one.
    pub fallback_content_version: String,
}

impl AppConfig {
    /// Read settings from `TOGETHERLY_*` environment variables, falling
    /// back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("TOGETHERLY_BASE_URL")
                .unwrap_or(defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            default_platform: std::env::var("TOGETHERLY_DEFAULT_PLATFORM")
                .unwrap_or(defaults.default_platform),
            default_industry: defaults.default_industry,
            default_tone: defaults.default_tone,
            fallback_content_version: defaults.fallback_content_version,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            default_platform: "instagram".to_string(),
            default_industry: "Business".to_string(),
            default_tone: "friendly".to_string(),
            fallback_content_version: "local".to_string(),
        }
    }
}
