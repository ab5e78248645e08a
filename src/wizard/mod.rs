//! Wizard state machine: step navigation, the draft answer aggregate, and
//! the rendering projection.

pub mod draft;
pub mod state;
pub mod view;

pub use draft::DraftProfile;
pub use state::{Advance, WizardState, WizardStep};
