//! Observable application state shared by the presentation layer and both lifecycle
//! controllers.
//!
//! Every mutator is one `watch::Sender::send_if_modified` call, so subscribers only ever see
//! whole transitions. Requests are sequence-stamped: a completion carrying an older stamp than
//! the latest `begin_*` call for its lifecycle is dropped.

use shared::{
    domain::{Action, JiraTicket},
    error::ApiError,
    protocol::AskResponse,
};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSeq(pub u64);

/// The actions a ticket submission was built from, tied to the response they indexed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiledActions {
    pub response_generation: u64,
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightState {
    pub current_question: Option<String>,
    pub last_response: Option<AskResponse>,
    pub loading: bool,
    pub error: Option<ApiError>,
    /// Kept in the order the user picked them.
    pub selected_action_indices: Vec<usize>,
    pub creating_tickets: bool,
    pub tickets_created: Vec<JiraTicket>,
    pub ticket_error: Option<ApiError>,
    response_generation: u64,
    question_seq: u64,
    ticket_seq: u64,
}

impl InsightState {
    pub fn actions(&self) -> &[Action] {
        self.last_response
            .as_ref()
            .map(|response| response.actions.as_slice())
            .unwrap_or_default()
    }

    pub fn has_tickets(&self) -> bool {
        !self.tickets_created.is_empty()
    }

    pub fn has_selected_actions(&self) -> bool {
        !self.selected_action_indices.is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_action_indices.contains(&index)
    }

    /// Selected actions with their indices, in selection order.
    pub fn selected_actions(&self) -> Vec<(usize, &Action)> {
        let actions = self.actions();
        self.selected_action_indices
            .iter()
            .filter_map(|&index| actions.get(index).map(|action| (index, action)))
            .collect()
    }

    /// Bumped every time `last_response` is replaced or cleared.
    pub fn response_generation(&self) -> u64 {
        self.response_generation
    }

    fn retain_actions_except(&mut self, indices: &[usize]) {
        if let Some(response) = self.last_response.as_mut() {
            let mut position = 0;
            response.actions.retain(|_| {
                let keep = !indices.contains(&position);
                position += 1;
                keep
            });
            self.selected_action_indices.clear();
        }
    }
}

pub struct InsightStore {
    state: watch::Sender<InsightState>,
}

impl Default for InsightStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(InsightState::default());
        Self { state }
    }

    pub fn snapshot(&self) -> InsightState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InsightState> {
        self.state.subscribe()
    }

    /// Stream of snapshots, starting with the current one.
    pub fn changes(&self) -> WatchStream<InsightState> {
        WatchStream::new(self.subscribe())
    }

    pub fn begin_question(&self) -> RequestSeq {
        let mut seq = RequestSeq(0);
        self.state.send_modify(|s| {
            s.question_seq += 1;
            seq = RequestSeq(s.question_seq);
            s.loading = true;
            s.error = None;
        });
        seq
    }

    pub fn complete_question(
        &self,
        seq: RequestSeq,
        question: String,
        response: AskResponse,
    ) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if seq.0 != s.question_seq {
                return false;
            }
            s.current_question = Some(question);
            s.last_response = Some(response);
            s.response_generation += 1;
            s.loading = false;
            s.error = None;
            s.selected_action_indices.clear();
            s.tickets_created.clear();
            true
        });
        if !applied {
            debug!("store: dropped stale question response seq={}", seq.0);
        }
        applied
    }

    pub fn fail_question(&self, seq: RequestSeq, error: ApiError) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if seq.0 != s.question_seq {
                return false;
            }
            s.error = Some(error);
            s.loading = false;
            true
        });
        if !applied {
            debug!("store: dropped stale question failure seq={}", seq.0);
        }
        applied
    }

    /// Local validation failure; an in-flight question keeps its loading flag.
    pub fn reject_question(&self, error: ApiError) {
        self.state.send_modify(|s| s.error = Some(error));
    }

    /// Adds or removes `index`. Indices outside the current actions are ignored.
    pub fn toggle_action_selection(&self, index: usize) {
        self.state.send_if_modified(|s| {
            if index >= s.actions().len() {
                return false;
            }
            match s.selected_action_indices.iter().position(|&i| i == index) {
                Some(position) => {
                    s.selected_action_indices.remove(position);
                }
                None => s.selected_action_indices.push(index),
            }
            true
        });
    }

    pub fn clear_action_selection(&self) {
        self.state.send_if_modified(|s| {
            let changed = !s.selected_action_indices.is_empty();
            s.selected_action_indices.clear();
            changed
        });
    }

    /// Drops the given positions from the current actions and clears the selection. No-op
    /// without a response.
    pub fn remove_actions(&self, indices: &[usize]) {
        self.state.send_if_modified(|s| {
            if s.last_response.is_none() {
                return false;
            }
            s.retain_actions_except(indices);
            true
        });
    }

    pub fn begin_ticket_creation(&self) -> RequestSeq {
        let mut seq = RequestSeq(0);
        self.state.send_modify(|s| {
            s.ticket_seq += 1;
            seq = RequestSeq(s.ticket_seq);
            s.creating_tickets = true;
            s.ticket_error = None;
        });
        seq
    }

    /// Publishes created tickets and removes the filed actions. When the response the
    /// submission was built from has been replaced meanwhile, the new response and its
    /// selection are left alone.
    pub fn complete_ticket_creation(
        &self,
        seq: RequestSeq,
        filed: &FiledActions,
        tickets: Vec<JiraTicket>,
    ) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if seq.0 != s.ticket_seq {
                return false;
            }
            if filed.response_generation == s.response_generation {
                s.retain_actions_except(&filed.indices);
            } else {
                debug!(
                    "store: response replaced during ticket creation, keeping actions generation={}",
                    s.response_generation
                );
            }
            s.tickets_created = tickets;
            s.creating_tickets = false;
            s.ticket_error = None;
            true
        });
        if !applied {
            debug!("store: dropped stale ticket response seq={}", seq.0);
        }
        applied
    }

    pub fn fail_ticket_creation(&self, seq: RequestSeq, error: ApiError) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if seq.0 != s.ticket_seq {
                return false;
            }
            s.ticket_error = Some(error);
            s.creating_tickets = false;
            true
        });
        if !applied {
            debug!("store: dropped stale ticket failure seq={}", seq.0);
        }
        applied
    }

    pub fn reject_ticket_creation(&self, error: ApiError) {
        self.state.send_modify(|s| s.ticket_error = Some(error));
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    pub fn clear_ticket_error(&self) {
        self.state.send_if_modified(|s| s.ticket_error.take().is_some());
    }

    pub fn clear_tickets(&self) {
        self.state.send_if_modified(|s| {
            let changed = !s.tickets_created.is_empty();
            s.tickets_created.clear();
            changed
        });
    }

    /// Back to the initial state. Requests still in flight are treated as stale.
    pub fn reset(&self) {
        self.state.send_modify(|s| {
            *s = InsightState {
                response_generation: s.response_generation + 1,
                question_seq: s.question_seq + 1,
                ticket_seq: s.ticket_seq + 1,
                ..InsightState::default()
            };
        });
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
