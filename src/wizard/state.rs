//! Wizard step state machine.
//!
//! Progresses linearly: Industry → IndustryDetails → ToneAndPlatforms →
//! KeywordsCompany. Forward navigation on the last step yields a terminal
//! finish action instead of advancing; rendering is a pure projection of
//! this state (see [`super::view`]).

use crate::profile::validate::validate_company;
use crate::wizard::draft::DraftProfile;

/// The four wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Industry,
    IndustryDetails,
    ToneAndPlatforms,
    KeywordsCompany,
}

impl WizardStep {
    /// 1-based step number as shown in the progress bar.
    pub fn number(&self) -> u8 {
        match self {
            Self::Industry => 1,
            Self::IndustryDetails => 2,
            Self::ToneAndPlatforms => 3,
            Self::KeywordsCompany => 4,
        }
    }

    pub fn is_first(&self) -> bool {
        matches!(self, Self::Industry)
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Self::KeywordsCompany)
    }

    /// Next step in the linear progression, if any.
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            Self::Industry => Some(Self::IndustryDetails),
            Self::IndustryDetails => Some(Self::ToneAndPlatforms),
            Self::ToneAndPlatforms => Some(Self::KeywordsCompany),
            Self::KeywordsCompany => None,
        }
    }

    /// Previous step, if any.
    pub fn prev(&self) -> Option<WizardStep> {
        match self {
            Self::Industry => None,
            Self::IndustryDetails => Some(Self::Industry),
            Self::ToneAndPlatforms => Some(Self::IndustryDetails),
            Self::KeywordsCompany => Some(Self::ToneAndPlatforms),
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::Industry
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Industry => "industry",
            Self::IndustryDetails => "industry_details",
            Self::ToneAndPlatforms => "tone_and_platforms",
            Self::KeywordsCompany => "keywords_company",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a forward navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given step.
    Moved(WizardStep),
    /// Already at the last step — validate and persist, then optionally
    /// show the results view.
    Finish,
    /// Navigation is disabled while a field is invalid.
    Blocked,
}

/// Current step plus the draft answer aggregate.
#[derive(Debug, Clone)]
pub struct WizardState {
    pub step: WizardStep,
    pub draft: DraftProfile,
}

impl WizardState {
    /// Initial state: step 1, empty draft except the default platform.
    pub fn new(default_platform: &str) -> Self {
        Self {
            step: WizardStep::default(),
            draft: DraftProfile::new(default_platform),
        }
    }

    /// Whether forward navigation is currently allowed. The company field
    /// blocks it while invalid.
    pub fn can_advance(&self) -> bool {
        validate_company(&self.draft.company).is_none()
    }

    /// Advance one step, or yield [`Advance::Finish`] on the last step.
    pub fn next(&mut self) -> Advance {
        if !self.can_advance() {
            return Advance::Blocked;
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                Advance::Moved(step)
            }
            None => Advance::Finish,
        }
    }

    /// Retreat one step; no-op at step 1.
    pub fn prev(&mut self) -> WizardStep {
        if let Some(step) = self.step.prev() {
            self.step = step;
        }
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_walk_forward_and_back() {
        use WizardStep::*;
        let mut step = Industry;
        for expected in [IndustryDetails, ToneAndPlatforms, KeywordsCompany] {
            step = step.next().unwrap();
            assert_eq!(step, expected);
        }
        assert!(step.next().is_none());

        for expected in [ToneAndPlatforms, IndustryDetails, Industry] {
            step = step.prev().unwrap();
            assert_eq!(step, expected);
        }
        assert!(step.prev().is_none());
    }

    #[test]
    fn step_numbers_are_one_based() {
        assert_eq!(WizardStep::Industry.number(), 1);
        assert_eq!(WizardStep::KeywordsCompany.number(), 4);
    }

    #[test]
    fn next_on_last_step_yields_finish() {
        let mut state = WizardState::new("instagram");
        assert_eq!(state.next(), Advance::Moved(WizardStep::IndustryDetails));
        assert_eq!(state.next(), Advance::Moved(WizardStep::ToneAndPlatforms));
        assert_eq!(state.next(), Advance::Moved(WizardStep::KeywordsCompany));
        assert_eq!(state.next(), Advance::Finish);
        // Finish does not move the step.
        assert_eq!(state.step, WizardStep::KeywordsCompany);
    }

    #[test]
    fn prev_floors_at_step_one() {
        let mut state = WizardState::new("instagram");
        assert_eq!(state.prev(), WizardStep::Industry);
        state.next();
        assert_eq!(state.prev(), WizardStep::Industry);
    }

    #[test]
    fn invalid_company_blocks_forward_navigation() {
        let mut state = WizardState::new("instagram");
        state.draft.company = "Bad<Name>".to_string();
        assert!(!state.can_advance());
        assert_eq!(state.next(), Advance::Blocked);
        assert_eq!(state.step, WizardStep::Industry);

        state.draft.company = "Acme, Inc.".to_string();
        assert!(state.can_advance());
        assert_eq!(state.next(), Advance::Moved(WizardStep::IndustryDetails));
    }

    #[test]
    fn initial_draft_has_default_platform_only() {
        let state = WizardState::new("instagram");
        assert_eq!(state.step, WizardStep::Industry);
        assert_eq!(state.draft.platforms, vec!["instagram".to_string()]);
        assert!(state.draft.industry.is_empty());
        assert!(state.draft.include_images);
    }
}
