use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use shared::{
    domain::{Action, JiraTicket},
    error::ApiError,
    protocol::{AskResponse, CreateJiraTicketsRequest, CreateJiraTicketsResponse},
};
use tokio::sync::{Mutex, Notify};

use crate::gateway::InsightGateway;

pub(crate) struct ScriptedAsk {
    pub wait_for: Option<Arc<Notify>>,
    pub result: Result<AskResponse, ApiError>,
}

/// In-memory gateway that records every request and replays scripted results.
pub(crate) struct RecordingGateway {
    ask_script: Mutex<VecDeque<ScriptedAsk>>,
    ask_default: Result<AskResponse, ApiError>,
    ticket_result: Result<CreateJiraTicketsResponse, ApiError>,
    ticket_wait_for: Option<Arc<Notify>>,
    pub asks: Mutex<Vec<String>>,
    pub ticket_requests: Mutex<Vec<CreateJiraTicketsRequest>>,
}

impl RecordingGateway {
    pub fn answering(response: AskResponse) -> Self {
        Self {
            ask_script: Mutex::new(VecDeque::new()),
            ask_default: Ok(response),
            ticket_result: Ok(CreateJiraTicketsResponse::default()),
            ticket_wait_for: None,
            asks: Mutex::new(Vec::new()),
            ticket_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_ask(err: ApiError) -> Self {
        let mut gateway = Self::answering(answer(&[]));
        gateway.ask_default = Err(err);
        gateway
    }

    pub fn with_tickets(mut self, tickets: Vec<JiraTicket>) -> Self {
        self.ticket_result = Ok(CreateJiraTicketsResponse {
            ticket_specs: tickets.clone(),
            created_tickets: tickets,
        });
        self
    }

    pub fn with_ticket_error(mut self, err: ApiError) -> Self {
        self.ticket_result = Err(err);
        self
    }

    pub fn with_ticket_gate(mut self, gate: Arc<Notify>) -> Self {
        self.ticket_wait_for = Some(gate);
        self
    }

    pub async fn script_ask(&self, step: ScriptedAsk) {
        self.ask_script.lock().await.push_back(step);
    }

    pub async fn ask_count(&self) -> usize {
        self.asks.lock().await.len()
    }

    pub async fn ticket_count(&self) -> usize {
        self.ticket_requests.lock().await.len()
    }

    pub async fn last_ticket_request(&self) -> Option<CreateJiraTicketsRequest> {
        self.ticket_requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl InsightGateway for RecordingGateway {
    async fn ask(&self, question: &str) -> Result<AskResponse, ApiError> {
        // Pop before recording so a visible ask count means the script step is claimed.
        let step = self.ask_script.lock().await.pop_front();
        self.asks.lock().await.push(question.to_string());
        match step {
            Some(step) => {
                if let Some(gate) = step.wait_for {
                    gate.notified().await;
                }
                step.result
            }
            None => self.ask_default.clone(),
        }
    }

    async fn create_tickets(
        &self,
        payload: &CreateJiraTicketsRequest,
    ) -> Result<CreateJiraTicketsResponse, ApiError> {
        self.ticket_requests.lock().await.push(payload.clone());
        if let Some(gate) = &self.ticket_wait_for {
            gate.notified().await;
        }
        self.ticket_result.clone()
    }
}

pub(crate) fn answer(action_titles: &[&str]) -> AskResponse {
    AskResponse {
        question: "What are top billing issues?".into(),
        data_preview: Vec::new(),
        summary: "S".into(),
        recommendations: Vec::new(),
        actions: action_titles
            .iter()
            .map(|title| Action::new(*title, "..."))
            .collect(),
    }
}

pub(crate) fn ticket(title: &str, key: &str) -> JiraTicket {
    JiraTicket {
        action_title: title.into(),
        ticket_key: key.into(),
        ticket_url: format!("https://jira.example.com/browse/{key}"),
    }
}
