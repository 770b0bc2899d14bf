use std::sync::Arc;

use shared::{
    error::ApiError,
    protocol::{CreateJiraTicketsRequest, JiraTicketMeta, TicketAction},
};
use tracing::{debug, info, warn};

use crate::{
    gateway::InsightGateway,
    sanitize::clean_text,
    store::{FiledActions, InsightState, InsightStore, RequestSeq},
};

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one action to create tickets";
pub const NO_TICKETS_CREATED_MESSAGE: &str =
    "No tickets were created. Please try again or contact support if the issue persists.";
pub const ENDPOINT_MISSING_MESSAGE: &str =
    "JIRA ticket creation endpoint not found. Please check your backend configuration.";
pub const AUTH_FAILED_MESSAGE: &str =
    "Authentication failed. Please check your JIRA credentials and permissions.";
pub const INVALID_REQUEST_MESSAGE: &str =
    "Invalid request data. Please try selecting different actions or contact support.";
pub const SERVER_ERROR_MESSAGE: &str =
    "Server error occurred while creating tickets. Please try again later.";
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection and try again.";
pub const FORMATTING_ERROR_MESSAGE: &str =
    "Data formatting error. Please try again or contact support if the issue persists.";

/// A ticket submission whose loading flag is already set in the store.
#[derive(Debug)]
pub struct PendingTickets {
    seq: RequestSeq,
    payload: CreateJiraTicketsRequest,
    filed: FiledActions,
}

impl PendingTickets {
    pub fn seq(&self) -> RequestSeq {
        self.seq
    }
}

/// Files the currently selected actions as tracker tickets.
#[derive(Clone)]
pub struct TicketController {
    store: Arc<InsightStore>,
    gateway: Arc<dyn InsightGateway>,
    project_key: String,
}

impl TicketController {
    pub fn new(
        store: Arc<InsightStore>,
        gateway: Arc<dyn InsightGateway>,
        project_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            project_key: project_key.into(),
        }
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Validates the current selection and marks ticket creation as started. Returns `None`
    /// after recording a validation error.
    pub fn begin(&self) -> Option<PendingTickets> {
        let snapshot = self.store.snapshot();
        let Some((payload, filed)) = build_ticket_request(&snapshot, &self.project_key) else {
            self.store
                .reject_ticket_creation(ApiError::validation(EMPTY_SELECTION_MESSAGE));
            return None;
        };

        let seq = self.store.begin_ticket_creation();
        info!(
            "tickets: submitting seq={} actions={} project={}",
            seq.0,
            payload.actions.len(),
            self.project_key
        );
        Some(PendingTickets {
            seq,
            payload,
            filed,
        })
    }

    /// Sends a submission started with [`TicketController::begin`] and records the outcome.
    pub async fn send(&self, pending: PendingTickets) {
        let PendingTickets {
            seq,
            payload,
            filed,
        } = pending;
        debug!(
            "tickets: payload={}",
            serde_json::to_string(&payload).unwrap_or_default()
        );

        match self.gateway.create_tickets(&payload).await {
            Ok(response) if response.created_tickets.is_empty() => {
                warn!(
                    "tickets: backend reported no created tickets seq={} specs={}",
                    seq.0,
                    response.ticket_specs.len()
                );
                self.store.fail_ticket_creation(
                    seq,
                    ApiError::validation(NO_TICKETS_CREATED_MESSAGE).with_status(200),
                );
            }
            Ok(response) => {
                let keys: Vec<&str> = response
                    .created_tickets
                    .iter()
                    .map(|ticket| ticket.ticket_key.as_str())
                    .collect();
                info!("tickets: created seq={} keys={}", seq.0, keys.join(","));
                self.store
                    .complete_ticket_creation(seq, &filed, response.created_tickets);
            }
            Err(err) => {
                warn!(
                    "tickets: failed seq={} status={:?} message={}",
                    seq.0, err.status, err.message
                );
                self.store
                    .fail_ticket_creation(seq, user_facing_ticket_error(err));
            }
        }
    }

    pub async fn submit(&self) {
        if let Some(pending) = self.begin() {
            self.send(pending).await;
        }
    }
}

/// Builds the sanitized request from a state snapshot, or `None` when there is nothing to file.
pub fn build_ticket_request(
    state: &InsightState,
    project_key: &str,
) -> Option<(CreateJiraTicketsRequest, FiledActions)> {
    let response = state.last_response.as_ref()?;
    let question = state.current_question.as_deref()?;

    let selected = state.selected_actions();
    if selected.is_empty() {
        return None;
    }

    let (indices, actions): (Vec<usize>, Vec<TicketAction>) = selected
        .into_iter()
        .map(|(index, action)| {
            (
                index,
                TicketAction {
                    title: clean_text(&action.title),
                    description: clean_text(&action.description),
                },
            )
        })
        .unzip();

    let request = CreateJiraTicketsRequest {
        question: clean_text(question),
        data_preview: response.data_preview.clone(),
        summary: clean_text(&response.summary),
        recommendations: response
            .recommendations
            .iter()
            .map(|rec| clean_text(rec))
            .collect(),
        actions,
        meta: JiraTicketMeta {
            project_key: project_key.to_string(),
        },
    };

    let filed = FiledActions {
        response_generation: state.response_generation(),
        indices,
    };

    Some((request, filed))
}

/// Maps a gateway failure to the message shown next to the ticket controls. The
/// status is kept.
pub fn user_facing_ticket_error(err: ApiError) -> ApiError {
    let message = match err.status {
        Some(404) => ENDPOINT_MISSING_MESSAGE.to_string(),
        Some(401) | Some(403) => AUTH_FAILED_MESSAGE.to_string(),
        Some(400) => INVALID_REQUEST_MESSAGE.to_string(),
        Some(500) => SERVER_ERROR_MESSAGE.to_string(),
        None | Some(0) => CONNECTIVITY_MESSAGE.to_string(),
        Some(_) if err.message.contains("Failed to parse") => {
            FORMATTING_ERROR_MESSAGE.to_string()
        }
        Some(_) => err.message,
    };

    ApiError {
        kind: err.kind,
        message,
        status: err.status,
    }
}

#[cfg(test)]
#[path = "tests/tickets_tests.rs"]
mod tests;
