use serde::{Deserialize, Serialize};

use crate::domain::{Action, FeedbackItem, JiraTicket};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Answer produced for one question. Replaced as a whole on every new question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    #[serde(default)]
    pub data_preview: Vec<FeedbackItem>,
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Action as sent to the ticket endpoint; magnitude is not forwarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketAction {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JiraTicketMeta {
    pub project_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJiraTicketsRequest {
    pub question: String,
    pub data_preview: Vec<FeedbackItem>,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub actions: Vec<TicketAction>,
    pub meta: JiraTicketMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateJiraTicketsResponse {
    #[serde(default)]
    pub ticket_specs: Vec<JiraTicket>,
    #[serde(default)]
    pub created_tickets: Vec<JiraTicket>,
}

/// Error body shape the backend may return on failure. Either field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Server-supplied text, `message` taking precedence over `error`.
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.filter(|e| !e.is_empty()))
    }
}
