//! Tiered generation gating and the paywall/subscription sub-flow.

pub mod gate;
pub mod paywall;

pub use gate::{Decision, Tier, evaluate, is_offered};
pub use paywall::{PaymentClient, PaymentProvider, PaywallFlow, SubscriptionOutcome};
