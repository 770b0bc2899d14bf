//! Display helpers shared by every front end. Pure functions over domain values and store
//! snapshots; no state of their own.

use chrono::{DateTime, Utc};
use shared::domain::{CustomerTier, FeedbackItem, JiraTicket, Sentiment};

use crate::store::InsightState;

pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "Show me critical issues from enterprise customers",
    "What are the top billing problems this month?",
    "Show negative feedback about API performance",
    "List high priority items from North America",
];

/// Visual emphasis for a value; front ends pick the concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Primary,
    Secondary,
    Neutral,
}

pub fn sentiment_tone(sentiment: Sentiment) -> Tone {
    match sentiment {
        Sentiment::Positive => Tone::Success,
        Sentiment::Negative => Tone::Error,
        Sentiment::Neutral => Tone::Neutral,
    }
}

pub fn priority_tone(priority: u8) -> Tone {
    match priority {
        4..=u8::MAX => Tone::Error,
        3 => Tone::Warning,
        2 => Tone::Info,
        _ => Tone::Neutral,
    }
}

pub fn tier_tone(tier: CustomerTier) -> Tone {
    match tier {
        CustomerTier::Enterprise => Tone::Primary,
        CustomerTier::Professional => Tone::Secondary,
        CustomerTier::Starter | CustomerTier::Free => Tone::Neutral,
    }
}

pub fn magnitude_tone(magnitude: f64) -> Tone {
    if magnitude >= 7.0 {
        Tone::Error
    } else if magnitude >= 5.0 {
        Tone::Warning
    } else {
        Tone::Neutral
    }
}

/// `None` for a missing or zero magnitude, which the views hide.
pub fn impact_label(magnitude: Option<f64>) -> Option<String> {
    magnitude
        .filter(|m| *m != 0.0 && !m.is_nan())
        .map(|m| format!("Impact: {m:.1}"))
}

/// `Mar 1, 2024` style date.
pub fn format_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%b %-d, %Y").to_string()
}

/// Highest priority first, then newest first; ties keep their original order.
pub fn sorted_preview(items: &[FeedbackItem]) -> Vec<&FeedbackItem> {
    let mut sorted: Vec<&FeedbackItem> = items.iter().collect();
    sorted.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub fn preview_caption(count: usize) -> String {
    format!("Showing {} feedback {}", count, if count == 1 { "item" } else { "items" })
}

pub fn actions_caption(state: &InsightState) -> String {
    format!(
        "{} available, {} selected",
        plural(state.actions().len(), "action", "actions"),
        state.selected_action_indices.len()
    )
}

/// Success notice derived from the created-ticket list; `None` hides the notice.
pub fn ticket_notice(tickets: &[JiraTicket]) -> Option<String> {
    if tickets.is_empty() {
        return None;
    }
    Some(format!(
        "Successfully created {}!",
        plural(tickets.len(), "JIRA ticket", "JIRA tickets")
    ))
}
