//! ProfileSync — reconciles the local draft with the server-held profile.
//!
//! `load` prefills the draft from any existing server profile (best-effort
//! read, failures swallowed); `save` pushes the full draft as a
//! state-replacing write and maps the server's structured validation
//! errors back to fields. The cached server snapshot is replaced wholesale
//! on every successful save and never partially applied.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::content::ConfigStore;
use crate::error::SaveError;
use crate::profile::validate::validate_company;
use crate::wizard::draft::DraftProfile;
use crate::wizard::view;

/// Cached snapshot of the backend's persisted profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub industry_key: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub brand_keywords: Vec<String>,
    #[serde(default)]
    pub niche_keywords: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub include_images: Option<bool>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub profile_id: Option<String>,
    /// Content version the save was issued against.
    pub content_version: String,
    /// Completion summary rows for the setup modal.
    pub summary: Vec<(&'static str, String)>,
}

#[derive(Debug, Deserialize)]
struct SaveAck {
    #[serde(default)]
    profile_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

/// Reconciles draft answers with the server profile.
#[derive(Debug, Default)]
pub struct ProfileSync {
    server: Option<ServerProfile>,
}

impl ProfileSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(&self) -> Option<&ServerProfile> {
        self.server.as_ref()
    }

    /// Fetch any saved profile for this session and prefill the draft.
    ///
    /// Best-effort: absent profiles and transport failures leave the draft
    /// untouched. Runs after configuration load so industry keys resolve.
    pub async fn load(&mut self, api: &ApiClient, store: &ConfigStore, draft: &mut DraftProfile) {
        let resp = match api.get("/api/profile").await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("profile prefill skipped: {e}");
                return;
            }
        };
        if !resp.status().is_success() {
            return;
        }
        let profile: ServerProfile = match resp.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("profile prefill skipped, bad body: {e}");
                return;
            }
        };
        if profile.id.is_none() {
            return;
        }
        merge_into(&profile, draft, store);
        self.server = Some(profile);
    }

    /// Validate locally and push the full draft as a state-replacing
    /// write. Failures are propagated so callers such as generate can
    /// refuse to proceed.
    pub async fn save(
        &mut self,
        api: &ApiClient,
        store: &ConfigStore,
        app: &AppConfig,
        draft: &mut DraftProfile,
    ) -> Result<SaveOutcome, SaveError> {
        if let Some(message) = validate_company(&draft.company) {
            return Err(SaveError::Invalid {
                field: "company".to_string(),
                message: message.to_string(),
            });
        }

        draft.mirror_niche_keywords();
        let version = store
            .content_version(&app.fallback_content_version)
            .to_string();

        let resp = api
            .post_query("/api/profile", &[("content_version", version.as_str())], draft)
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(rejection_from_body(status.as_u16(), &body));
        }

        let ack: SaveAck = resp
            .json()
            .await
            .map_err(|e| crate::error::ApiError::InvalidBody(e.to_string()))?;
        let profile_id = ack.profile_id.or(ack.id);

        // Replace the cached server snapshot wholesale.
        self.server = Some(snapshot_from_draft(draft, profile_id.clone()));

        Ok(SaveOutcome {
            profile_id,
            content_version: version,
            summary: view::summary(draft),
        })
    }
}

/// Merge a server profile into the draft: fill-if-empty for company and
/// keywords, direct overwrite for industry, tone, platforms, goals, and
/// details once present.
fn merge_into(profile: &ServerProfile, draft: &mut DraftProfile, store: &ConfigStore) {
    if draft.company.is_empty() && !profile.company.is_empty() {
        draft.company = profile.company.clone();
    }
    if draft.brand_keywords.is_empty() && !profile.brand_keywords.is_empty() {
        draft.brand_keywords = profile.brand_keywords.clone();
    }
    if !profile.industry.is_empty() {
        draft.industry = profile.industry.clone();
        draft.industry_key = if !profile.industry_key.is_empty() {
            profile.industry_key.clone()
        } else {
            store
                .config
                .industries
                .iter()
                .find(|i| i.label == profile.industry)
                .map(|i| i.key.clone())
                .unwrap_or_default()
        };
    }
    if !profile.tone.is_empty() {
        draft.tone = profile.tone.clone();
    }
    if !profile.platforms.is_empty() {
        draft.platforms = profile.platforms.clone();
    }
    if !profile.goals.is_empty() {
        draft.goals = profile.goals.clone();
    }
    if !profile.details.is_empty() {
        draft.details = profile.details.clone();
    }
    if let Some(include_images) = profile.include_images {
        draft.include_images = include_images;
    }
}

/// Map a failed save response to a [`SaveError`]: structured
/// `{error, errors:{field: msg}}` when present, otherwise a single message
/// with the HTTP status as fallback text.
fn rejection_from_body(status: u16, body: &str) -> SaveError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()))
        .map(String::from)
        .unwrap_or_else(|| format!("Save failed (HTTP {status})"));
    let field_errors = parsed
        .as_ref()
        .and_then(|v| v.get("errors").and_then(|e| e.as_object()))
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect::<BTreeMap<_, _>>()
        })
        .unwrap_or_default();
    SaveError::Rejected {
        message,
        field_errors,
    }
}

fn snapshot_from_draft(draft: &DraftProfile, id: Option<String>) -> ServerProfile {
    ServerProfile {
        id,
        industry: draft.industry.clone(),
        industry_key: draft.industry_key.clone(),
        tone: draft.tone.clone(),
        platforms: draft.platforms.clone(),
        brand_keywords: draft.brand_keywords.clone(),
        niche_keywords: draft.niche_keywords.clone(),
        goals: draft.goals.clone(),
        company: draft.company.clone(),
        include_images: Some(draft.include_images),
        details: draft.details.clone(),
    }
}
