//! Routes shell commands into the client. Remote work is spawned so the question and ticket
//! lifecycles can overlap. The loading flags guard re-entry from the same command, and are set
//! before anything is spawned.

use client_core::{view::EXAMPLE_QUESTIONS, InsightClient};
use tracing::debug;

use crate::commands::{DismissTarget, ShellCommand, HELP};

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Print this text directly; it is not part of the rendered view.
    Message(String),
    Render,
    Quit,
}

pub fn dispatch(client: &InsightClient, cmd: ShellCommand) -> Flow {
    let state = client.store().snapshot();
    debug!(?cmd, "shell: dispatch");

    match cmd {
        ShellCommand::Ask(question) => {
            if state.loading {
                return Flow::Message("A question is already being analyzed; please wait.".into());
            }
            spawn_ask(client, question);
            Flow::Continue
        }
        ShellCommand::Example(n) => match n.checked_sub(1).and_then(|i| EXAMPLE_QUESTIONS.get(i)) {
            Some(question) if !state.loading => {
                spawn_ask(client, question.to_string());
                Flow::Continue
            }
            Some(_) => {
                Flow::Message("A question is already being analyzed; please wait.".into())
            }
            None => Flow::Message(format!(
                "There are only {} example questions.",
                EXAMPLE_QUESTIONS.len()
            )),
        },
        ShellCommand::Toggle(n) => {
            match n.checked_sub(1).filter(|i| *i < state.actions().len()) {
                Some(index) => client.store().toggle_action_selection(index),
                None => return Flow::Message(format!("No action number {n}.")),
            }
            Flow::Continue
        }
        ShellCommand::CreateTickets => {
            if state.creating_tickets {
                return Flow::Message("Tickets are already being created; please wait.".into());
            }
            if let Some(pending) = client.tickets().begin() {
                let tickets = client.tickets().clone();
                tokio::spawn(async move { tickets.send(pending).await });
            }
            Flow::Continue
        }
        ShellCommand::Dismiss(target) => {
            let store = client.store();
            match target {
                DismissTarget::Error => store.clear_error(),
                DismissTarget::TicketError => store.clear_ticket_error(),
                DismissTarget::Tickets => store.clear_tickets(),
                DismissTarget::All => {
                    store.clear_error();
                    store.clear_ticket_error();
                    store.clear_tickets();
                }
            }
            Flow::Continue
        }
        ShellCommand::Show => Flow::Render,
        ShellCommand::Examples => Flow::Message(
            EXAMPLE_QUESTIONS
                .iter()
                .enumerate()
                .map(|(i, q)| format!("  {}. {q}", i + 1))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        ShellCommand::Reset => {
            client.store().reset();
            Flow::Continue
        }
        ShellCommand::Help => Flow::Message(HELP.to_string()),
        ShellCommand::Quit => Flow::Quit,
    }
}

fn spawn_ask(client: &InsightClient, question: String) {
    if let Some(pending) = client.questions().begin(&question) {
        let questions = client.questions().clone();
        tokio::spawn(async move { questions.send(pending).await });
    }
}
