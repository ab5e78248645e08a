//! Rendering projection of wizard state.
//!
//! Pure functions from `(WizardState, ConfigStore)` to display models —
//! no presentation concern leaks into the state machine itself.

use crate::content::{ConfigStore, Question, QuestionKind};
use crate::wizard::draft::DraftProfile;
use crate::wizard::state::{WizardState, WizardStep};

/// A selectable choice (industry, tone, platform, chip option).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

/// A rendered industry question.
#[derive(Debug, Clone)]
pub struct QuestionView {
    pub key: String,
    pub label: String,
    pub kind: QuestionKind,
    /// Chip options with selection state; empty for text questions.
    pub options: Vec<ChoiceView>,
    /// Current free-text value; empty for chip questions.
    pub value: String,
    /// Placeholder for text questions: the question's own, falling back
    /// to the selected industry's note placeholder.
    pub placeholder: Option<String>,
}

/// Navigation affordances for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavView {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub next_label: &'static str,
}

pub fn nav(state: &WizardState) -> NavView {
    NavView {
        prev_enabled: !state.step.is_first(),
        next_enabled: state.can_advance(),
        next_label: if state.step.is_last() { "Finish" } else { "Next" },
    }
}

pub fn industry_choices(draft: &DraftProfile, store: &ConfigStore) -> Vec<ChoiceView> {
    store
        .config
        .industries
        .iter()
        .map(|i| ChoiceView {
            key: i.key.clone(),
            label: i.label.clone(),
            selected: (!draft.industry_key.is_empty() && draft.industry_key == i.key)
                || (draft.industry_key.is_empty() && draft.industry == i.label),
        })
        .collect()
}

pub fn tone_choices(draft: &DraftProfile, store: &ConfigStore) -> Vec<ChoiceView> {
    store
        .config
        .tones
        .iter()
        .map(|t| ChoiceView {
            key: t.key.clone(),
            label: t.label.clone(),
            selected: draft.tone == t.key,
        })
        .collect()
}

pub fn platform_choices(draft: &DraftProfile, store: &ConfigStore) -> Vec<ChoiceView> {
    store
        .config
        .platforms
        .iter()
        .map(|p| ChoiceView {
            key: p.key.clone(),
            label: p.label.clone(),
            selected: draft.platforms.iter().any(|k| k == &p.key),
        })
        .collect()
}

/// The industry-specific question set, re-rendered from configuration
/// whenever the industry changes, with answers resolved from the draft.
pub fn industry_questions(draft: &DraftProfile, store: &ConfigStore) -> Vec<QuestionView> {
    let note_placeholder = store
        .config
        .industry(&draft.industry_key)
        .and_then(|i| i.note_placeholder.clone());

    store
        .config
        .questions_for(&draft.industry_key)
        .iter()
        .map(|q| question_view(q, draft, note_placeholder.as_deref()))
        .collect()
}

fn question_view(q: &Question, draft: &DraftProfile, note_placeholder: Option<&str>) -> QuestionView {
    let options = match q.kind {
        QuestionKind::Chips => q
            .options
            .iter()
            .map(|opt| ChoiceView {
                key: opt.clone(),
                label: opt.clone(),
                selected: if q.is_multi_select() {
                    draft.has_goal(opt)
                } else {
                    draft.choice(&q.key) == Some(opt.as_str())
                },
            })
            .collect(),
        QuestionKind::Text => Vec::new(),
    };

    QuestionView {
        key: q.key.clone(),
        label: q.label.clone(),
        kind: q.kind,
        options,
        value: match q.kind {
            QuestionKind::Text => draft.choice(&q.key).unwrap_or("").to_string(),
            QuestionKind::Chips => String::new(),
        },
        placeholder: q
            .placeholder
            .clone()
            .or_else(|| note_placeholder.map(String::from)),
    }
}

/// Placeholder for the keyword field: the industry's suggestions, shown
/// only while the user has typed nothing.
pub fn keyword_placeholder(draft: &DraftProfile, store: &ConfigStore) -> Option<String> {
    if !draft.brand_keywords.is_empty() {
        return None;
    }
    store
        .config
        .industry(&draft.industry_key)
        .filter(|i| !i.suggested_keywords.is_empty())
        .map(|i| i.suggested_keywords.join(", "))
}

/// Summary rows for the completion modal, with em-dash fallbacks.
pub fn summary(draft: &DraftProfile) -> Vec<(&'static str, String)> {
    let or_dash = |s: String| if s.is_empty() { "—".to_string() } else { s };
    vec![
        ("Industry", or_dash(draft.industry.clone())),
        ("Tone", or_dash(draft.tone.clone())),
        ("Platforms", or_dash(draft.platforms.join(", "))),
        ("Goals", or_dash(draft.goals.join(", "))),
        ("Company", or_dash(draft.company.clone())),
    ]
}

/// Progress dots: active through the current step.
pub fn progress(state: &WizardState) -> Vec<bool> {
    let current = state.step.number();
    (1..=WizardStep::KeywordsCompany.number())
        .map(|n| n <= current)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ConfigStore, FeatureFlags, WizardConfig};
    use crate::wizard::state::WizardState;

    fn store() -> ConfigStore {
        let config: WizardConfig = serde_json::from_value(serde_json::json!({
            "industries": [
                {"key": "bakery", "label": "Bakery",
                 "suggested_keywords": ["sourdough", "pastry"],
                 "note_placeholder": "e.g. we mill our own flour"},
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
        .unwrap();
        ConfigStore {
            config,
            flags: FeatureFlags::default(),
            content_meta: None,
        }
    }

    #[test]
    fn questions_re_render_with_draft_answers_resolved() {
        let store = store();
        let mut state = WizardState::new("instagram");
        let bakery = store.config.industry("bakery").unwrap().clone();
        state.draft.select_industry(&bakery);
        state.draft.toggle_goal("Online orders");
        state.draft.select_choice("specialty", "Bread");
        state.draft.set_detail_text("note", "open since 1998");

        let questions = industry_questions(&state.draft, &store);
        assert_eq!(questions.len(), 3);
        assert!(questions[0].options[1].selected);
        assert!(!questions[0].options[0].selected);
        assert!(questions[1].options[0].selected);
        assert_eq!(questions[2].value, "open since 1998");
        assert_eq!(
            questions[2].placeholder.as_deref(),
            Some("e.g. we mill our own flour")
        );
    }

    #[test]
    fn unknown_industry_renders_no_questions() {
        let store = store();
        let state = WizardState::new("instagram");
        assert!(industry_questions(&state.draft, &store).is_empty());
    }

    #[test]
    fn keyword_placeholder_hidden_once_keywords_exist() {
        let store = store();
        let mut state = WizardState::new("instagram");
        state.draft.industry_key = "bakery".to_string();
        assert_eq!(
            keyword_placeholder(&state.draft, &store).as_deref(),
            Some("sourdough, pastry")
        );
        state.draft.commit_keywords("croissant");
        assert!(keyword_placeholder(&state.draft, &store).is_none());
    }

    #[test]
    fn nav_labels_and_enablement() {
        let mut state = WizardState::new("instagram");
        let n = nav(&state);
        assert!(!n.prev_enabled);
        assert_eq!(n.next_label, "Next");

        state.next();
        state.next();
        state.next();
        let n = nav(&state);
        assert!(n.prev_enabled);
        assert_eq!(n.next_label, "Finish");

        state.draft.company = "Bad<Name>".to_string();
        assert!(!nav(&state).next_enabled);
    }

    #[test]
    fn summary_rows_fall_back_to_dash() {
        let state = WizardState::new("instagram");
        let rows = summary(&state.draft);
        assert_eq!(rows[0], ("Industry", "—".to_string()));
        assert_eq!(rows[2], ("Platforms", "instagram".to_string()));
    }
}
