//! Profile reconciliation: local draft vs. server-persisted profile.

pub mod sync;
pub mod validate;

pub use sync::{ProfileSync, SaveOutcome, ServerProfile};
