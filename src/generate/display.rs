//! Display model: day grouping and clipboard text.

use chrono::NaiveDate;

use crate::generate::pipeline::Post;
use crate::generate::reel::ReelPlan;

/// Notice rendered when a successful generation returns no posts.
pub const EMPTY_NOTICE: &str = "No posts yet.";

/// Posts for one day, in response order.
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub day_index: u32,
    pub date: NaiveDate,
    pub posts: Vec<Post>,
}

/// Group posts by day index, ascending, preserving response order within
/// a day. The date comes from the first post of the group.
pub fn group_by_day(posts: Vec<Post>) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for post in posts {
        match groups.iter_mut().find(|g| g.day_index == post.day_index) {
            Some(group) => group.posts.push(post),
            None => groups.push(DayGroup {
                day_index: post.day_index,
                date: post.date,
                posts: vec![post],
            }),
        }
    }
    groups.sort_by_key(|g| g.day_index);
    groups
}

/// Clipboard text for a reel script: hook, numbered beats, call to action.
pub fn script_copy_text(plan: &ReelPlan) -> String {
    let mut lines = Vec::new();
    if !plan.hook.is_empty() {
        lines.push(format!("Hook: {}", plan.hook));
    }
    for (i, beat) in plan.script_beats.iter().enumerate() {
        lines.push(format!("{}. {beat}", i + 1));
    }
    if !plan.call_to_action.is_empty() {
        lines.push(format!("CTA: {}", plan.call_to_action));
    }
    lines.join("\n")
}

/// Clipboard text for the subtitle/SRT prompt.
pub fn subtitle_copy_text(plan: &ReelPlan) -> &str {
    &plan.subtitle_prompt
}

/// Clipboard text for the thumbnail prompt.
pub fn thumbnail_copy_text(plan: &ReelPlan) -> &str {
    &plan.thumbnail_prompt
}
