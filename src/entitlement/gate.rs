//! Entitlement decisions for generation tiers.
//!
//! Pure over the inputs it consults — the user snapshot and feature flags
//! are read, never mutated here. A blocking decision must short-circuit
//! before any `/api/generate` call is made.

use crate::auth::UserSnapshot;
use crate::content::FeatureFlags;

/// A requested generation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// 1-day sample.
    Sample,
    /// 7-day plan, offered only behind a flag.
    SevenDay,
    /// 30-day plan.
    ThirtyDay,
    /// Reels-only shortcut (1 day, short-video platform scope).
    ReelsOnly,
}

impl Tier {
    /// Day count sent with the generation request.
    pub fn days(&self) -> u32 {
        match self {
            Self::Sample | Self::ReelsOnly => 1,
            Self::SevenDay => 7,
            Self::ThirtyDay => 30,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sample => "1-day sample",
            Self::SevenDay => "7-day plan",
            Self::ThirtyDay => "30-day plan",
            Self::ReelsOnly => "reels",
        };
        write!(f, "{s}")
    }
}

/// Outcome of evaluating a tier against the current entitlement state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed with the generation request.
    Allow,
    /// Anonymous — prompt sign-in and abort.
    RequireSignIn,
    /// Authenticated but out of quota — show the upsell message.
    Blocked { message: String },
    /// Authenticated but unpaid — open the paywall sub-flow.
    OpenPaywall { message: String },
}

/// Whether a tier appears in the UI at all.
pub fn is_offered(tier: Tier, flags: &FeatureFlags) -> bool {
    match tier {
        Tier::SevenDay => flags.show_seven_day_option(),
        _ => true,
    }
}

/// Evaluate the decision table for a requested tier.
pub fn evaluate(tier: Tier, user: Option<&UserSnapshot>, flags: &FeatureFlags) -> Decision {
    let Some(user) = user else {
        return Decision::RequireSignIn;
    };
    if user.is_paid {
        return Decision::Allow;
    }
    match tier {
        Tier::Sample => {
            if user.free_sample_used {
                Decision::Blocked {
                    message: "Your free sample has been used. Subscribe to keep generating."
                        .to_string(),
                }
            } else {
                Decision::Allow
            }
        }
        Tier::SevenDay => {
            // Gated by the paid flag regardless of sample usage.
            if flags.gate_seven_day_to_paid() {
                Decision::OpenPaywall {
                    message: "The 7-day plan is for subscribers. Subscribe to unlock it."
                        .to_string(),
                }
            } else {
                Decision::Allow
            }
        }
        Tier::ThirtyDay => Decision::OpenPaywall {
            message: "The 30-day plan requires a subscription.".to_string(),
        },
        Tier::ReelsOnly => Decision::OpenPaywall {
            message: "Reel plans require a subscription.".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_paid: bool, free_sample_used: bool) -> UserSnapshot {
        UserSnapshot {
            id: "u1".to_string(),
            email: "u@example.com".to_string(),
            is_paid,
            free_sample_used,
        }
    }

    fn flags(json: serde_json::Value) -> FeatureFlags {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn anonymous_always_prompts_sign_in() {
        let flags = flags(serde_json::json!({"gate7DayToPaid": true}));
        for tier in [Tier::Sample, Tier::SevenDay, Tier::ThirtyDay, Tier::ReelsOnly] {
            assert_eq!(evaluate(tier, None, &flags), Decision::RequireSignIn);
        }
    }

    #[test]
    fn paid_user_is_always_allowed() {
        let flags = flags(serde_json::json!({"gate7DayToPaid": true}));
        let user = user(true, true);
        for tier in [Tier::Sample, Tier::SevenDay, Tier::ThirtyDay, Tier::ReelsOnly] {
            assert_eq!(evaluate(tier, Some(&user), &flags), Decision::Allow);
        }
    }

    #[test]
    fn sample_allowed_until_used_then_blocked() {
        let flags = FeatureFlags::default();
        let fresh = user(false, false);
        assert_eq!(evaluate(Tier::Sample, Some(&fresh), &flags), Decision::Allow);

        let used = user(false, true);
        match evaluate(Tier::Sample, Some(&used), &flags) {
            Decision::Blocked { message } => assert!(message.contains("Subscribe")),
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn seven_day_gated_by_flag_regardless_of_sample_usage() {
        let gated = flags(serde_json::json!({"gate7DayToPaid": true}));
        let ungated = FeatureFlags::default();

        for sample_used in [false, true] {
            let u = user(false, sample_used);
            assert!(matches!(
                evaluate(Tier::SevenDay, Some(&u), &gated),
                Decision::OpenPaywall { .. }
            ));
            assert_eq!(evaluate(Tier::SevenDay, Some(&u), &ungated), Decision::Allow);
        }
    }

    #[test]
    fn thirty_day_and_reels_require_subscription_when_unpaid() {
        let flags = FeatureFlags::default();
        let u = user(false, false);
        assert!(matches!(
            evaluate(Tier::ThirtyDay, Some(&u), &flags),
            Decision::OpenPaywall { .. }
        ));
        assert!(matches!(
            evaluate(Tier::ReelsOnly, Some(&u), &flags),
            Decision::OpenPaywall { .. }
        ));
    }

    #[test]
    fn seven_day_offered_only_behind_flag() {
        assert!(!is_offered(Tier::SevenDay, &FeatureFlags::default()));
        assert!(is_offered(
            Tier::SevenDay,
            &flags(serde_json::json!({"show7DayOption": true}))
        ));
        assert!(is_offered(Tier::Sample, &FeatureFlags::default()));
        assert!(is_offered(Tier::ThirtyDay, &FeatureFlags::default()));
    }

    #[test]
    fn tier_day_counts() {
        assert_eq!(Tier::Sample.days(), 1);
        assert_eq!(Tier::SevenDay.days(), 7);
        assert_eq!(Tier::ThirtyDay.days(), 30);
        assert_eq!(Tier::ReelsOnly.days(), 1);
    }
}
