//! Generation requests and tiered response handling.
//!
//! A generation always rides on a saved draft: unset fields are
//! default-filled and a save is forced first, so the server generates
//! from the same profile the user will see on reload. Responses are
//! interpreted per status — 401 means sign-in, 403 means entitlement —
//! and results are returned for the caller to overwrite its rendered
//! state wholesale (concurrent requests are not de-duplicated; the last
//! completion wins).

use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::auth::UserSnapshot;
use crate::config::AppConfig;
use crate::content::{ConfigStore, FeatureFlags};
use crate::entitlement::{Decision, Tier, evaluate};
use crate::error::{ApiError, GenerateError};
use crate::generate::reel::ReelPlan;
use crate::profile::ProfileSync;
use crate::wizard::draft::DraftProfile;

/// Platform scope sent for the reels-only shortcut.
pub const REELS_PLATFORM: &str = "short_video";

/// One generated post.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub day_index: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub pillar: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Raw reel object; shape varies by server version.
    #[serde(default)]
    pub reel: Option<serde_json::Value>,
}

impl Post {
    /// Normalized reel plan, when the post carries one with content.
    pub fn reel_plan(&self) -> Option<ReelPlan> {
        self.reel
            .as_ref()
            .map(ReelPlan::from_value)
            .filter(|plan| !plan.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    posts: Vec<Post>,
}

#[derive(serde::Serialize)]
struct FeedbackBody<'a> {
    rating: i32,
    post_day: u32,
    platform: &'a str,
}

/// Issues generation requests against a saved draft.
pub struct GenerationPipeline {
    api: ApiClient,
}

impl GenerationPipeline {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Evaluate the entitlement gate for a tier and, when allowed, run the
    /// generation. Blocking decisions return before any `/api/generate`
    /// call.
    #[allow(clippy::too_many_arguments)]
    pub async fn generate_tier(
        &self,
        store: &ConfigStore,
        app: &AppConfig,
        sync: &mut ProfileSync,
        draft: &mut DraftProfile,
        tier: Tier,
        user: Option<&UserSnapshot>,
        flags: &FeatureFlags,
    ) -> Result<Vec<Post>, GenerateError> {
        match evaluate(tier, user, flags) {
            Decision::Allow => {}
            Decision::RequireSignIn => return Err(GenerateError::AuthRequired),
            Decision::Blocked { message } => return Err(GenerateError::Gated { message }),
            Decision::OpenPaywall { message } => {
                return Err(GenerateError::EntitlementDenied { message });
            }
        }
        let platform_override = match tier {
            Tier::ReelsOnly => Some(vec![REELS_PLATFORM.to_string()]),
            _ => None,
        };
        self.generate(store, app, sync, draft, tier.days(), platform_override.as_deref())
            .await
    }

    /// Default-fill, force a save, then request `days` of posts. The
    /// platform override replaces the draft's platform set for this one
    /// request only and is never persisted.
    pub async fn generate(
        &self,
        store: &ConfigStore,
        app: &AppConfig,
        sync: &mut ProfileSync,
        draft: &mut DraftProfile,
        days: u32,
        platform_override: Option<&[String]>,
    ) -> Result<Vec<Post>, GenerateError> {
        draft.fill_defaults(app);
        sync.save(&self.api, store, app, draft).await?;

        let mut body = serde_json::to_value(&*draft)
            .map_err(|e| ApiError::InvalidBody(e.to_string()))
            .map_err(GenerateError::Api)?;
        body["days"] = days.into();
        if let Some(platforms) = platform_override {
            body["platforms"] = serde_json::json!(platforms);
        }

        let resp = self.api.post("/api/generate", &body).await.map_err(GenerateError::Api)?;
        let status = resp.status().as_u16();
        match status {
            401 => Err(GenerateError::AuthRequired),
            403 => {
                let text = resp.text().await.unwrap_or_default();
                let message = serde_json::from_str::<serde_json::Value>(&text)
                    .ok()
                    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                    .unwrap_or_else(|| "Subscribe to unlock this plan.".to_string());
                Err(GenerateError::EntitlementDenied { message })
            }
            s if !(200..300).contains(&s) => Err(GenerateError::Http { status: s }),
            _ => {
                let parsed: GenerateResponse = resp
                    .json()
                    .await
                    .map_err(|e| ApiError::InvalidBody(e.to_string()))
                    .map_err(GenerateError::Api)?;
                // An empty list is a valid outcome, not an error.
                Ok(parsed.posts)
            }
        }
    }

    /// Fire-and-forget post rating. Failures are logged and swallowed.
    pub async fn send_feedback(&self, rating: i32, post_day: u32, platform: &str) {
        let body = FeedbackBody {
            rating,
            post_day,
            platform,
        };
        match self.api.post("/api/feedback", &body).await {
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!(status = resp.status().as_u16(), "feedback not recorded");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("feedback not recorded: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_parses_with_optional_reel() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "day_index": 1,
            "date": "2026-08-06",
            "platform": "instagram",
            "pillar": "Educational",
            "caption": "Tip of the day",
            "image_prompt": "bright flat-lay",
            "image_url": null
        }))
        .unwrap();
        assert_eq!(post.day_index, 1);
        assert_eq!(post.date.to_string(), "2026-08-06");
        assert!(post.reel.is_none());
        assert!(post.reel_plan().is_none());
    }

    #[test]
    fn reel_plan_is_normalized_lazily() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "day_index": 1,
            "date": "2026-08-06",
            "platform": "short_video",
            "pillar": "Story",
            "caption": "",
            "reel": {"hooks": ["H"], "scriptBeats": ["a"], "shots": ["close-up"]}
        }))
        .unwrap();
        let plan = post.reel_plan().unwrap();
        assert_eq!(plan.hook, "H");
    }

    #[test]
    fn contentless_reel_object_yields_none() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "day_index": 1, "date": "2026-08-06", "platform": "", "pillar": "", "caption": "",
            "reel": {"unexpected": "shape"}
        }))
        .unwrap();
        assert!(post.reel_plan().is_none());
    }

    #[test]
    fn empty_generate_response_is_valid() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"count": 0, "posts": []}"#).unwrap();
        assert!(parsed.posts.is_empty());
        let parsed: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.posts.is_empty());
    }
}
