use thiserror::Error;

use crate::{
    cli::selection::{SelectionError, parse_rows},
    mailbox::{Intent, PrincipalId},
};

pub const HELP: &str = "\
commands:
  connect              open a session with the tenant
  disconnect           close the session and forget the mailboxes
  refresh              fetch the directory synced mailboxes again
  page [N]             show the current page or jump to page N
  next | prev          move one page forward or back
  cloud <rows>         make the rows on this page cloud managed, e.g. cloud 1,3,5-7
  onprem <rows>        make the rows on this page on-premises managed
  set <id> cloud|onprem
                       set a single mailbox by identity
  status               show session and mailbox counts
  help                 show this text
  quit                 disconnect and leave";

#[derive(Debug, PartialEq)]
pub enum PromptCommand {
    Help,
    Connect,
    Disconnect,
    Refresh,
    Page(Option<usize>),
    Next,
    Prev,
    Convert { intent: Intent, rows: Vec<usize> },
    Set { id: PrincipalId, intent: Intent },
    Status,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum PromptError {
    #[error("unknown command {0}, try help")]
    Unknown(String),
    #[error("{0}")]
    Rows(#[from] SelectionError),
    #[error("{0} is not a page number")]
    Page(String),
    #[error("usage: set <id> cloud|onprem")]
    SetUsage,
}

/// Parses one prompt line. Empty lines yield `None`.
///
/// Row lists may not go past `max_row`, the page size.
pub fn parse_command(line: &str, max_row: usize) -> Result<Option<PromptCommand>, PromptError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "help" | "?" => PromptCommand::Help,
        "connect" => PromptCommand::Connect,
        "disconnect" => PromptCommand::Disconnect,
        "refresh" => PromptCommand::Refresh,
        "page" if rest.is_empty() => PromptCommand::Page(None),
        "page" => PromptCommand::Page(Some(
            rest.parse()
                .map_err(|_| PromptError::Page(rest.to_string()))?,
        )),
        "next" | "n" => PromptCommand::Next,
        "prev" | "p" => PromptCommand::Prev,
        "cloud" => PromptCommand::Convert {
            intent: Intent::SetCloudManaged,
            rows: parse_rows(rest, max_row)?,
        },
        "onprem" | "on-prem" => PromptCommand::Convert {
            intent: Intent::SetOnPremManaged,
            rows: parse_rows(rest, max_row)?,
        },
        "set" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(id), Some(target), None) => PromptCommand::Set {
                    id: id.parse().map_err(|_| PromptError::SetUsage)?,
                    intent: target.parse().map_err(|_| PromptError::SetUsage)?,
                },
                _ => return Err(PromptError::SetUsage),
            }
        }
        "status" => PromptCommand::Status,
        "quit" | "exit" | "q" => PromptCommand::Quit,
        _ => return Err(PromptError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}
