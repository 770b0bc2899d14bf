use std::sync::Arc;

use shared::error::ApiError;
use tracing::{info, warn};

use crate::{
    gateway::InsightGateway,
    store::{InsightStore, RequestSeq},
};

pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question";

/// A question whose loading flag is already set in the store.
#[derive(Debug)]
pub struct PendingQuestion {
    seq: RequestSeq,
    question: String,
}

impl PendingQuestion {
    pub fn seq(&self) -> RequestSeq {
        self.seq
    }
}

/// Drives one question from validation through the remote call into the store.
#[derive(Clone)]
pub struct QuestionController {
    store: Arc<InsightStore>,
    gateway: Arc<dyn InsightGateway>,
}

impl QuestionController {
    pub fn new(store: Arc<InsightStore>, gateway: Arc<dyn InsightGateway>) -> Self {
        Self { store, gateway }
    }

    /// Validates `question` and marks it as loading. Returns `None` after recording a
    /// validation error.
    pub fn begin(&self, question: &str) -> Option<PendingQuestion> {
        if question.trim().is_empty() {
            self.store
                .reject_question(ApiError::validation(EMPTY_QUESTION_MESSAGE));
            return None;
        }

        let seq = self.store.begin_question();
        info!("ask: submitting seq={} chars={}", seq.0, question.len());
        Some(PendingQuestion {
            seq,
            question: question.to_string(),
        })
    }

    pub async fn send(&self, pending: PendingQuestion) {
        let PendingQuestion { seq, question } = pending;
        match self.gateway.ask(&question).await {
            Ok(response) => {
                info!(
                    "ask: answered seq={} preview={} actions={}",
                    seq.0,
                    response.data_preview.len(),
                    response.actions.len()
                );
                self.store.complete_question(seq, question, response);
            }
            Err(err) => {
                warn!(
                    "ask: failed seq={} status={:?} message={}",
                    seq.0, err.status, err.message
                );
                self.store.fail_question(seq, err);
            }
        }
    }

    /// Outcomes land in the store's question slots; nothing is returned to the caller.
    pub async fn submit(&self, question: &str) {
        if let Some(pending) = self.begin(question) {
            self.send(pending).await;
        }
    }
}
