use std::sync::Arc;

use anyhow::Result;

pub mod config;
pub mod gateway;
pub mod question;
pub mod sanitize;
pub mod store;
pub mod tickets;
pub mod view;

pub use config::{load_settings, Settings, SettingsError};
pub use gateway::{HttpGateway, InsightGateway};
pub use question::{PendingQuestion, QuestionController};
pub use store::{FiledActions, InsightState, InsightStore, RequestSeq};
pub use tickets::{PendingTickets, TicketController};

/// One store wired to both lifecycle controllers over a shared gateway.
#[derive(Clone)]
pub struct InsightClient {
    store: Arc<InsightStore>,
    questions: QuestionController,
    tickets: TicketController,
}

impl InsightClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let gateway = HttpGateway::new(settings)?;
        Ok(Self::new_with_gateway(
            Arc::new(gateway),
            settings.jira_project_key.clone(),
        ))
    }

    pub fn new_with_gateway(
        gateway: Arc<dyn InsightGateway>,
        project_key: impl Into<String>,
    ) -> Self {
        let store = Arc::new(InsightStore::new());
        Self {
            questions: QuestionController::new(Arc::clone(&store), Arc::clone(&gateway)),
            tickets: TicketController::new(Arc::clone(&store), gateway, project_key),
            store,
        }
    }

    pub fn store(&self) -> &Arc<InsightStore> {
        &self.store
    }

    pub fn questions(&self) -> &QuestionController {
        &self.questions
    }

    pub fn tickets(&self) -> &TicketController {
        &self.tickets
    }

    pub async fn ask(&self, question: &str) {
        self.questions.submit(question).await;
    }

    pub async fn create_tickets(&self) {
        self.tickets.submit().await;
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
