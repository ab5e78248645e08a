//! Generation pipeline: tiered requests, response normalization, and the
//! display model.

pub mod display;
pub mod pipeline;
pub mod reel;

pub use display::{DayGroup, group_by_day};
pub use pipeline::{GenerationPipeline, Post, REELS_PLATFORM};
pub use reel::{ReelPlan, Shot};
