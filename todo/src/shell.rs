//! Line-oriented front end for the list.
//!
//! Reads one command per line, sends the matching action to the store and
//! prints the list. `move` is the keyboard version of dragging an item: it
//! computes the complete new order and sends it as a single `Reorder`.

use crate::TodoStore;
use crate::types::{TodoAction, TodoItem};
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "\
commands:
  add <text>         add an item
  toggle <text>      mark an item done / not done
  delete <text>      remove an item
  move <from> <to>   move the item at position <from> to position <to>
  list               show the list
  help               show this help
  quit               exit
";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <text>`; the text may be empty
    Add(String),
    /// `toggle <text>`
    Toggle(String),
    /// `delete <text>`
    Delete(String),
    /// `move <from> <to>` with 1-based positions
    Move {
        /// Current position of the item
        from: usize,
        /// Position the item should end up at
        to: usize,
    },
    /// `list`
    List,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Reasons a line is not a valid command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank input line
    #[error("empty command")]
    Empty,

    /// First word is not a known command
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    /// A required argument is absent
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// A position is not a positive integer
    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

fn parse_position(raw: Option<&str>, name: &'static str) -> Result<usize, CommandError> {
    let raw = raw.ok_or(CommandError::MissingArgument(name))?;
    match raw.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(CommandError::InvalidPosition(raw.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();

        match word {
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" if rest.is_empty() => Err(CommandError::MissingArgument("text")),
            "toggle" => Ok(Self::Toggle(rest.to_string())),
            "delete" if rest.is_empty() => Err(CommandError::MissingArgument("text")),
            "delete" => Ok(Self::Delete(rest.to_string())),
            "move" => {
                let mut parts = rest.split_whitespace();
                let from = parse_position(parts.next(), "from")?;
                let to = parse_position(parts.next(), "to")?;
                Ok(Self::Move { from, to })
            },
            "list" => Ok(Self::List),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Moves the item at index `from` to index `to`, shifting the items between.
///
/// Returns `None` when either index is out of range.
#[must_use]
pub fn move_item(items: &[TodoItem], from: usize, to: usize) -> Option<Vec<TodoItem>> {
    if from >= items.len() || to >= items.len() {
        return None;
    }
    let mut reordered = items.to_vec();
    let item = reordered.remove(from);
    reordered.insert(to, item);
    Some(reordered)
}

/// Renders the list, one numbered line per item
#[must_use]
pub fn render(items: &[TodoItem]) -> String {
    if items.is_empty() {
        return "(empty)\n".to_string();
    }
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let mark = if item.complete { 'x' } else { ' ' };
        let _ = writeln!(out, "{:>3}. [{mark}] {}", index + 1, item.text);
    }
    out
}

/// Reads commands from `input` until `quit` or end of input.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
pub async fn run<I, O>(store: &TodoStore, input: I, mut output: O) -> std::io::Result<()>
where
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let items = store.state(|s| s.items.clone()).await;
    output.write_all(render(&items).as_bytes()).await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(error) => {
                output.write_all(format!("{error}\n").as_bytes()).await?;
                output.flush().await?;
                continue;
            },
        };

        let action = match command {
            Command::Quit => break,
            Command::Help => {
                output.write_all(HELP.as_bytes()).await?;
                output.flush().await?;
                continue;
            },
            Command::List => None,
            Command::Add(text) => Some(TodoAction::Add { text }),
            Command::Toggle(text) => Some(TodoAction::Toggle { text }),
            Command::Delete(text) => Some(TodoAction::Delete { text }),
            Command::Move { from, to } => {
                let items = store.state(|s| s.items.clone()).await;
                if let Some(items) = move_item(&items, from - 1, to - 1) {
                    Some(TodoAction::Reorder { items })
                } else {
                    output
                        .write_all(format!("no item at position {from} or {to}\n").as_bytes())
                        .await?;
                    output.flush().await?;
                    continue;
                }
            },
        };

        if let Some(action) = action {
            if let Err(error) = store.send(action).await {
                tracing::warn!(error = %error, "Store stopped accepting input");
                break;
            }
        }

        let items = store.state(|s| s.items.clone()).await;
        output.write_all(render(&items).as_bytes()).await?;
        output.flush().await?;
    }

    Ok(())
}
