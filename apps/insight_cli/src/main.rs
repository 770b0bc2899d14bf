use std::path::PathBuf;

mod commands;
mod orchestration;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, InsightClient, Settings};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::parse_command;
use orchestration::{dispatch, Flow};
use render::{render, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "goinsight", about = "Ask questions about customer feedback and file JIRA tickets")]
struct Cli {
    /// Backend base URL. Overrides the settings file and environment.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    /// JIRA project key used when filing tickets.
    #[arg(long, global = true)]
    project_key: Option<String>,
    /// Settings file; defaults to ./goinsight.toml when present.
    #[arg(long, global = true, env = "GOINSIGHT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask one question, print the answer and exit.
    Ask {
        question: String,
        /// Action number to file as a ticket after the answer arrives. Repeatable.
        #[arg(long = "file", value_name = "N")]
        file: Vec<usize>,
    },
    /// Interactive session (default).
    Shell,
}

fn settings_from(cli: &Cli) -> Result<Settings> {
    let mut settings = load_settings(cli.config.as_deref()).context("loading settings")?;
    if let Some(url) = cli.api_base_url.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        settings.api_base_url = url.to_string();
    }
    if let Some(key) = cli.project_key.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        settings.jira_project_key = key.to_string();
    }
    settings.base_url()?;
    Ok(settings)
}

async fn run_once(client: &InsightClient, question: &str, file: &[usize], format: OutputFormat) {
    client.ask(question).await;

    if !file.is_empty() && client.store().snapshot().last_response.is_some() {
        let actions = client.store().snapshot().actions().len();
        for n in file {
            match n.checked_sub(1).filter(|i| *i < actions) {
                Some(index) if !client.store().snapshot().is_selected(index) => {
                    client.store().toggle_action_selection(index)
                }
                Some(_) => {}
                None => warn!("cli: ignoring unknown action number={n}"),
            }
        }
        client.create_tickets().await;
    }

    println!("{}", render(&client.store().snapshot(), format));
}

async fn run_shell(client: &InsightClient, format: OutputFormat) -> Result<()> {
    let mut changes = client.store().changes();
    let renderer = tokio::spawn(async move {
        let mut last = String::new();
        while let Some(state) = changes.next().await {
            let view = render(&state, format);
            if view != last {
                println!("\n{view}");
                last = view;
            }
        }
    });

    println!("Type a question, or :help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match dispatch(client, cmd) {
            Flow::Continue => {}
            Flow::Message(text) => println!("{text}"),
            Flow::Render => println!("\n{}", render(&client.store().snapshot(), format)),
            Flow::Quit => break,
        }
    }

    renderer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = settings_from(&cli)?;
    info!(
        "cli: api_base_url={} project_key={}",
        settings.api_base_url, settings.jira_project_key
    );

    let client = InsightClient::new(&settings)?;
    match cli.command {
        Some(Command::Ask { question, file }) => {
            run_once(&client, &question, &file, cli.format).await
        }
        Some(Command::Shell) | None => run_shell(&client, cli.format).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_is_the_default_subcommand() {
        let cli = Cli::try_parse_from(["goinsight"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn ask_accepts_repeated_file_flags_and_global_options() {
        let cli = Cli::try_parse_from([
            "goinsight",
            "ask",
            "What are top billing issues?",
            "--file",
            "1",
            "--file",
            "3",
            "--format",
            "json",
            "--project-key",
            "OPS",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.project_key.as_deref(), Some("OPS"));
        match cli.command {
            Some(Command::Ask { question, file }) => {
                assert_eq!(question, "What are top billing issues?");
                assert_eq!(file, vec![1, 3]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
