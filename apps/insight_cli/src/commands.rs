//! Shell input parsing. Plain text is a question; lines starting with `:` are commands.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTarget {
    Error,
    TicketError,
    Tickets,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Ask(String),
    /// 1-based index into the example questions.
    Example(usize),
    /// 1-based index as shown next to each action.
    Toggle(usize),
    CreateTickets,
    Dismiss(DismissTarget),
    Show,
    Examples,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command ':{0}' (try :help)")]
    Unknown(String),
    #[error(":{command} needs a number, got '{value}'")]
    InvalidNumber { command: &'static str, value: String },
    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("unknown dismiss target '{0}' (error, tickets-error, tickets, all)")]
    UnknownDismissTarget(String),
}

pub const HELP: &str = "\
Type a question and press enter to ask it.
Commands:
  :toggle N      select or unselect action N
  :create        file the selected actions as JIRA tickets
  :dismiss [error|ticket-error|tickets|all]
  :example N     ask example question N
  :examples      list example questions
  :show          render the current view again
  :reset         clear everything
  :help          this text
  :quit          leave the shell";

fn parse_index(command: &'static str, value: Option<&str>) -> Result<usize, CommandError> {
    let value = value.ok_or(CommandError::MissingArgument(command))?;
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidNumber {
            command,
            value: value.to_string(),
        }),
    }
}

/// `Ok(None)` for blank input.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let Some(rest) = trimmed.strip_prefix(':') else {
        return Ok(Some(ShellCommand::Ask(line.trim_end_matches(&['\r', '\n'][..]).to_string())));
    };

    let mut parts = rest.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();

    let command = match verb.as_str() {
        "toggle" | "t" => ShellCommand::Toggle(parse_index("toggle", arg)?),
        "example" => ShellCommand::Example(parse_index("example", arg)?),
        "create" | "c" => ShellCommand::CreateTickets,
        "dismiss" | "d" => ShellCommand::Dismiss(match arg.map(str::to_ascii_lowercase).as_deref() {
            None | Some("error") => DismissTarget::Error,
            Some("ticket-error") | Some("tickets-error") => DismissTarget::TicketError,
            Some("tickets") | Some("notice") => DismissTarget::Tickets,
            Some("all") => DismissTarget::All,
            Some(other) => return Err(CommandError::UnknownDismissTarget(other.to_string())),
        }),
        "show" | "s" => ShellCommand::Show,
        "examples" => ShellCommand::Examples,
        "reset" => ShellCommand::Reset,
        "help" | "h" | "?" => ShellCommand::Help,
        "quit" | "q" | "exit" => ShellCommand::Quit,
        _ => return Err(CommandError::Unknown(verb)),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question_even_when_it_starts_with_a_verb() {
        assert_eq!(
            parse_command("Show me critical issues\n"),
            Ok(Some(ShellCommand::Ask("Show me critical issues".into())))
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   \n"), Ok(None));
    }

    #[test]
    fn toggle_requires_positive_number() {
        assert_eq!(parse_command(":toggle 2"), Ok(Some(ShellCommand::Toggle(2))));
        assert_eq!(
            parse_command(":toggle 0"),
            Err(CommandError::InvalidNumber {
                command: "toggle",
                value: "0".into()
            })
        );
        assert_eq!(
            parse_command(":t"),
            Err(CommandError::MissingArgument("toggle"))
        );
    }

    #[test]
    fn dismiss_targets() {
        assert_eq!(
            parse_command(":dismiss"),
            Ok(Some(ShellCommand::Dismiss(DismissTarget::Error)))
        );
        assert_eq!(
            parse_command(":d tickets"),
            Ok(Some(ShellCommand::Dismiss(DismissTarget::Tickets)))
        );
        assert_eq!(
            parse_command(":dismiss ALL"),
            Ok(Some(ShellCommand::Dismiss(DismissTarget::All)))
        );
        assert!(matches!(
            parse_command(":dismiss everything"),
            Err(CommandError::UnknownDismissTarget(_))
        ));
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_command(":launch"),
            Err(CommandError::Unknown("launch".into()))
        );
    }
}
