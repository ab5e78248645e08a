//! Togetherly — client core for the content-planning onboarding wizard.

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod entitlement;
pub mod error;
pub mod generate;
pub mod profile;
pub mod wizard;
