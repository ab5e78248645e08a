//! Reel-plan normalization.
//!
//! Server reel objects carry several historical aliases for the same
//! semantic field (`hook` vs `hooks` vs ranked hooks; shot entries as bare
//! strings or three different object shapes). Each alias set resolves
//! through a fixed precedence order into one canonical [`ReelPlan`];
//! unknown shapes fail closed to empty defaults rather than erroring.

use serde::{Deserialize, Serialize};

/// Canonical short-video content plan attached to a generated post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReelPlan {
    pub hook: String,
    /// Ordered script beats (spoken lines).
    pub script_beats: Vec<String>,
    pub shot_list: Vec<Shot>,
    pub on_screen_text: Vec<String>,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
    pub thumbnail_prompt: String,
    pub subtitle_prompt: String,
    /// Alternative hooks, best first.
    pub ranked_hooks: Vec<String>,
}

/// One entry in the canonical shot list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Shot {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl ReelPlan {
    /// Normalize a raw server value. Anything unparseable yields the
    /// empty plan.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value::<RawReel>(value.clone())
            .map(ReelPlan::from)
            .unwrap_or_default()
    }

    /// Whether the plan carries nothing worth rendering.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ── Source shapes ───────────────────────────────────────────────────

/// A reel object as the server sends it, all known aliases included.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawReel {
    #[serde(default)]
    hook: Option<String>,
    #[serde(default)]
    hooks: Option<Vec<String>>,
    #[serde(default, alias = "rankedHooks")]
    ranked_hooks: Option<Vec<HookSource>>,
    #[serde(default)]
    script_beats: Option<Vec<BeatSource>>,
    #[serde(default, rename = "scriptBeats")]
    script_beats_camel: Option<Vec<BeatSource>>,
    #[serde(default)]
    beats: Option<Vec<BeatSource>>,
    #[serde(default)]
    shot_list: Option<Vec<ShotSource>>,
    #[serde(default)]
    shots: Option<Vec<ShotSource>>,
    #[serde(default, alias = "onScreenText")]
    on_screen_text: Option<Vec<String>>,
    #[serde(default)]
    hashtags: Option<Vec<String>>,
    #[serde(default, alias = "call_to_action")]
    cta: Option<String>,
    #[serde(default, alias = "thumbnailPrompt")]
    thumbnail_prompt: Option<String>,
    #[serde(default)]
    srt: Option<String>,
    #[serde(default, alias = "srt_prompt")]
    subtitle_prompt: Option<String>,
}

/// A ranked-hook entry: bare string or `{hook}`/`{text}` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum HookSource {
    Text(String),
    Keyed {
        #[serde(alias = "text")]
        hook: String,
    },
    Other(serde_json::Value),
}

impl HookSource {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            Self::Keyed { hook } => Some(hook),
            Self::Other(_) => None,
        }
    }
}

/// A script-beat entry: bare line or a timed `{start_s, end_s, line}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BeatSource {
    Line(String),
    Timed {
        line: String,
    },
    Other(serde_json::Value),
}

impl BeatSource {
    fn into_line(self) -> Option<String> {
        match self {
            Self::Line(line) | Self::Timed { line } => Some(line),
            Self::Other(_) => None,
        }
    }
}

/// A shot-list entry in any of its historical shapes, precedence:
/// bare string, `{type, description}`, `{shot_type, notes}`, `{type, notes}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ShotSource {
    Plain(String),
    Typed {
        #[serde(rename = "type")]
        kind: String,
        description: String,
    },
    ShotTyped {
        shot_type: String,
        #[serde(default)]
        notes: String,
    },
    TypeNotes {
        #[serde(rename = "type")]
        kind: String,
        notes: String,
    },
    Other(serde_json::Value),
}

impl ShotSource {
    fn into_shot(self) -> Shot {
        match self {
            Self::Plain(kind) => Shot {
                kind,
                description: String::new(),
            },
            Self::Typed { kind, description } => Shot { kind, description },
            Self::ShotTyped { shot_type, notes } => Shot {
                kind: shot_type,
                description: notes,
            },
            Self::TypeNotes { kind, notes } => Shot {
                kind,
                description: notes,
            },
            Self::Other(_) => Shot::default(),
        }
    }
}

// ── Normalization ───────────────────────────────────────────────────

impl From<RawReel> for ReelPlan {
    fn from(raw: RawReel) -> Self {
        let hooks = raw.hooks.unwrap_or_default();
        let ranked: Vec<String> = raw
            .ranked_hooks
            .unwrap_or_default()
            .into_iter()
            .filter_map(HookSource::into_text)
            .collect();

        // hook ← `hook`, then first of `hooks`, then first ranked hook.
        let hook = raw
            .hook
            .filter(|h| !h.is_empty())
            .or_else(|| hooks.first().cloned())
            .or_else(|| ranked.first().cloned())
            .unwrap_or_default();

        let script_beats = raw
            .script_beats
            .or(raw.script_beats_camel)
            .or(raw.beats)
            .unwrap_or_default()
            .into_iter()
            .filter_map(BeatSource::into_line)
            .collect();

        let shot_list: Vec<Shot> = raw
            .shot_list
            .or(raw.shots)
            .unwrap_or_default()
            .into_iter()
            .map(ShotSource::into_shot)
            .filter(|s| !s.kind.is_empty() || !s.description.is_empty())
            .collect();

        let ranked_hooks = if !ranked.is_empty() { ranked } else { hooks };

        Self {
            hook,
            script_beats,
            shot_list,
            on_screen_text: raw.on_screen_text.unwrap_or_default(),
            hashtags: raw.hashtags.unwrap_or_default(),
            call_to_action: raw.cta.unwrap_or_default(),
            thumbnail_prompt: raw.thumbnail_prompt.unwrap_or_default(),
            subtitle_prompt: raw.srt.or(raw.subtitle_prompt).unwrap_or_default(),
            ranked_hooks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(value: serde_json::Value) -> ReelPlan {
        ReelPlan::from_value(&value)
    }

    #[test]
    fn camel_case_alias_set_normalizes() {
        let plan = normalize(serde_json::json!({
            "hooks": ["H"],
            "scriptBeats": ["a", "b"],
            "shots": ["close-up"]
        }));
        assert_eq!(plan.hook, "H");
        assert_eq!(plan.script_beats, vec!["a", "b"]);
        assert_eq!(
            plan.shot_list,
            vec![Shot {
                kind: "close-up".into(),
                description: String::new()
            }]
        );
    }

    #[test]
    fn hook_precedence_is_fixed() {
        let plan = normalize(serde_json::json!({
            "hook": "direct",
            "hooks": ["from-list"],
            "ranked_hooks": ["ranked"]
        }));
        assert_eq!(plan.hook, "direct");

        let plan = normalize(serde_json::json!({
            "hooks": ["from-list"],
            "ranked_hooks": ["ranked"]
        }));
        assert_eq!(plan.hook, "from-list");

        let plan = normalize(serde_json::json!({
            "ranked_hooks": [{"hook": "ranked"}]
        }));
        assert_eq!(plan.hook, "ranked");
    }

    #[test]
    fn timed_beats_keep_their_lines_in_order() {
        let plan = normalize(serde_json::json!({
            "beats": [
                {"start_s": 0, "end_s": 3, "line": "first"},
                {"start_s": 3, "end_s": 6, "line": "second"}
            ]
        }));
        assert_eq!(plan.script_beats, vec!["first", "second"]);
    }

    #[test]
    fn snake_case_beats_win_over_legacy_beats() {
        let plan = normalize(serde_json::json!({
            "script_beats": ["canonical"],
            "beats": [{"line": "legacy"}]
        }));
        assert_eq!(plan.script_beats, vec!["canonical"]);
    }

    #[test]
    fn every_shot_shape_resolves() {
        let plan = normalize(serde_json::json!({
            "shot_list": [
                "pan across the counter",
                {"type": "close-up", "description": "hands kneading dough"},
                {"shot_type": "wide", "notes": "storefront at dawn"},
                {"type": "detail", "notes": "steam off the loaf"}
            ]
        }));
        assert_eq!(
            plan.shot_list,
            vec![
                Shot {
                    kind: "pan across the counter".into(),
                    description: String::new()
                },
                Shot {
                    kind: "close-up".into(),
                    description: "hands kneading dough".into()
                },
                Shot {
                    kind: "wide".into(),
                    description: "storefront at dawn".into()
                },
                Shot {
                    kind: "detail".into(),
                    description: "steam off the loaf".into()
                },
            ]
        );
    }

    #[test]
    fn full_legacy_generator_shape_normalizes() {
        let plan = normalize(serde_json::json!({
            "ranked_hooks": ["best", "second"],
            "hook": "best",
            "beats": [{"start_s": 0, "end_s": 4, "line": "open on the oven"}],
            "shot_list": [{"shot_type": "b-roll", "notes": "tray out of oven"}],
            "srt": "1\n00:00:00,000 --> 00:00:04,000\nopen on the oven",
            "thumbnail_prompt": "golden loaf on slate",
            "cta": "Order by Friday",
            "hashtags": ["#bakery"],
            "on_screen_text": ["Fresh today"]
        }));
        assert_eq!(plan.hook, "best");
        assert_eq!(plan.ranked_hooks, vec!["best", "second"]);
        assert_eq!(plan.script_beats, vec!["open on the oven"]);
        assert!(plan.subtitle_prompt.starts_with("1\n"));
        assert_eq!(plan.thumbnail_prompt, "golden loaf on slate");
        assert_eq!(plan.call_to_action, "Order by Friday");
        assert_eq!(plan.on_screen_text, vec!["Fresh today"]);
    }

    #[test]
    fn ranked_hooks_fall_back_to_hooks_list() {
        let plan = normalize(serde_json::json!({"hooks": ["a", "b"]}));
        assert_eq!(plan.ranked_hooks, vec!["a", "b"]);
    }

    #[test]
    fn unknown_shapes_fail_closed_to_defaults() {
        assert_eq!(normalize(serde_json::json!(null)), ReelPlan::default());
        assert_eq!(normalize(serde_json::json!("just a string")), ReelPlan::default());
        assert_eq!(normalize(serde_json::json!(42)), ReelPlan::default());

        // Unknown entry shapes are dropped, not fatal.
        let plan = normalize(serde_json::json!({
            "shots": [{"unexpected": true}, "usable"],
            "script_beats": [7, "line"]
        }));
        assert_eq!(plan.shot_list.len(), 1);
        assert_eq!(plan.shot_list[0].kind, "usable");
        assert_eq!(plan.script_beats, vec!["line"]);
    }

    #[test]
    fn empty_plan_detection() {
        assert!(ReelPlan::default().is_empty());
        assert!(!normalize(serde_json::json!({"hook": "h"})).is_empty());
    }
}
