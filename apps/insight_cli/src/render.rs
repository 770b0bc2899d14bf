//! Turns store snapshots into terminal output.

use clap::ValueEnum;
use client_core::{
    view::{
        actions_caption, format_date, impact_label, magnitude_tone, preview_caption,
        priority_tone, sentiment_tone, sorted_preview, ticket_notice, tier_tone, Tone,
    },
    InsightState,
};
use colored::{ColoredString, Colorize};
use serde_json::json;
use shared::{domain::FeedbackItem, error::ApiError};
use tabled::{settings::Style, Table, Tabled};

const SUMMARY_CELL_WIDTH: usize = 60;
const TOPIC_CELL_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Sentiment")]
    sentiment: String,
    #[tabled(rename = "Product Area")]
    product_area: String,
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Summary")]
    summary: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Source")]
    source: String,
}

impl From<&FeedbackItem> for PreviewRow {
    fn from(item: &FeedbackItem) -> Self {
        Self {
            id: item.id.clone(),
            date: format_date(&item.created_at),
            priority: paint(&item.priority.to_string(), priority_tone(item.priority)).to_string(),
            sentiment: paint(item.sentiment.as_str(), sentiment_tone(item.sentiment)).to_string(),
            product_area: item.product_area.to_string(),
            topic: truncate(&item.topic, TOPIC_CELL_WIDTH),
            summary: truncate(&item.summary, SUMMARY_CELL_WIDTH),
            tier: paint(item.customer_tier.as_str(), tier_tone(item.customer_tier)).to_string(),
            region: item.region.to_string(),
            source: item.source.to_string(),
        }
    }
}

pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Success => text.green(),
        Tone::Error => text.red(),
        Tone::Warning => text.yellow(),
        Tone::Info => text.cyan(),
        Tone::Primary => text.blue().bold(),
        Tone::Secondary => text.magenta(),
        Tone::Neutral => text.normal(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

fn error_block(title: &str, err: &ApiError, dismiss_hint: &str) -> String {
    let mut out = format!("{} {}", title.red().bold(), err.message);
    if let Some(status) = err.status {
        out.push_str(&format!(" (Error Code: {status})"));
    }
    out.push_str(&format!("  [{dismiss_hint}]"));
    out
}

fn render_table(state: &InsightState) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(err) = &state.error {
        sections.push(error_block("Error:", err, ":dismiss"));
    }
    if state.loading {
        sections.push("Analyzing...".dimmed().to_string());
    }

    let (Some(question), Some(response)) = (&state.current_question, &state.last_response) else {
        if !state.loading {
            sections.push(format!(
                "{}\n{}",
                "Ready to analyze your feedback data".bold(),
                "Enter a natural language question to get started (:examples for ideas)"
            ));
        }
        return sections.join("\n\n");
    };

    sections.push(format!(
        "{}\n{} {}\n\n{}",
        "Insight Summary".bold(),
        "Question:".dimmed(),
        question.italic(),
        response.summary
    ));

    if !response.data_preview.is_empty() {
        let rows: Vec<PreviewRow> = sorted_preview(&response.data_preview)
            .into_iter()
            .map(PreviewRow::from)
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        sections.push(format!(
            "{}\n{}\n{}",
            "Data Preview".bold(),
            preview_caption(response.data_preview.len()).dimmed(),
            table
        ));
    }

    if !response.recommendations.is_empty() {
        let lines: Vec<String> = response
            .recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| format!("  {}. {rec}", i + 1))
            .collect();
        sections.push(format!("{}\n{}", "Recommendations".bold(), lines.join("\n")));
    }

    if !response.actions.is_empty() {
        let mut block = vec![
            "Actionable Items".bold().to_string(),
            actions_caption(state).dimmed().to_string(),
        ];
        if let Some(err) = &state.ticket_error {
            block.push(error_block(
                "Failed to Create JIRA Tickets:",
                err,
                ":dismiss ticket-error",
            ));
        }
        for (index, action) in response.actions.iter().enumerate() {
            let checkbox = if state.is_selected(index) { "[x]" } else { "[ ]" };
            let mut line = format!("  {checkbox} {}. {}", index + 1, action.title.bold());
            if let (Some(label), Some(magnitude)) = (impact_label(action.magnitude), action.magnitude)
            {
                line.push_str(&format!("  {}", paint(&label, magnitude_tone(magnitude))));
            }
            block.push(line);
            block.push(format!("       {}", action.description));
        }
        if state.creating_tickets {
            block.push("Creating...".dimmed().to_string());
        }
        sections.push(block.join("\n"));
    }

    if let Some(notice) = ticket_notice(&state.tickets_created) {
        let links: Vec<String> = state
            .tickets_created
            .iter()
            .map(|t| format!("  {} {}", t.ticket_key.green().bold(), t.ticket_url))
            .collect();
        sections.push(format!(
            "{}\n{}  [:dismiss tickets]",
            notice.green(),
            links.join("\n")
        ));
    }

    sections.join("\n\n")
}

fn render_json(state: &InsightState) -> String {
    let value = json!({
        "current_question": state.current_question,
        "last_response": state.last_response,
        "loading": state.loading,
        "error": state.error,
        "selected_action_indices": state.selected_action_indices,
        "creating_tickets": state.creating_tickets,
        "tickets_created": state.tickets_created,
        "ticket_error": state.ticket_error,
    });
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

pub fn render(state: &InsightState, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(state),
        OutputFormat::Json => render_json(state),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use client_core::InsightStore;
    use shared::{
        domain::{Action, CustomerTier, FeedbackSource, ProductArea, Region, Sentiment},
        protocol::AskResponse,
    };

    use super::*;

    fn answered_state() -> InsightState {
        colored::control::set_override(false);
        let store = InsightStore::new();
        let seq = store.begin_question();
        store.complete_question(
            seq,
            "What are top billing issues?".into(),
            AskResponse {
                question: "What are top billing issues?".into(),
                data_preview: vec![FeedbackItem {
                    id: "fb-1".into(),
                    created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
                    customer_tier: CustomerTier::Enterprise,
                    priority: 5,
                    product_area: ProductArea::Billing,
                    region: Region::NorthAmerica,
                    sentiment: Sentiment::Negative,
                    source: FeedbackSource::Zendesk,
                    summary: "Charged twice".into(),
                    topic: "duplicate charges".into(),
                }],
                summary: "Billing errors dominate".into(),
                recommendations: vec!["Audit invoices".into()],
                actions: vec![Action {
                    title: "Fix invoice bug".into(),
                    description: "Rounding".into(),
                    magnitude: Some(8.0),
                }],
            },
        );
        store.toggle_action_selection(0);
        store.snapshot()
    }

    #[test]
    fn empty_state_prompts_for_a_question() {
        colored::control::set_override(false);
        let out = render(&InsightState::default(), OutputFormat::Table);
        assert!(out.contains("Ready to analyze your feedback data"));
    }

    #[test]
    fn answered_state_renders_every_section() {
        let out = render(&answered_state(), OutputFormat::Table);
        assert!(out.contains("Insight Summary"));
        assert!(out.contains("Mar 1, 2024"));
        assert!(out.contains("1. Audit invoices"));
        assert!(out.contains("[x] 1. Fix invoice bug"));
        assert!(out.contains("Impact: 8.0"));
        assert!(out.contains("1 action available, 1 selected"));
    }

    #[test]
    fn json_output_is_machine_readable() {
        let out = render(&answered_state(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["selected_action_indices"][0], 0);
        assert_eq!(value["last_response"]["actions"][0]["title"], "Fix invoice bug");
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
