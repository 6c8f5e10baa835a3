//! # Vault Commands
//!
//! Line commands typed at the vault prompt, and how each one drives the
//! view-state holder.
//!
//! ## Command Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command        Holder Operation                                        │
//! │  ───────        ────────────────                                        │
//! │  refresh        refresh_amiibos()                                      │
//! │  more           load_next_page()                                       │
//! │  retry          retry_load_more()                                      │
//! │  size <n>       set_page_size(n)                                       │
//! │  search <q>     on_search_query_changed(q)                             │
//! │  clear          on_search_query_changed("")                            │
//! │  status         (print current state)                                  │
//! │  help           (print usage)                                          │
//! │  quit           (exit)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use amiibo_core::{DisplayState, ListFooter};
use thiserror::Error;
use tracing::debug;

use crate::state::{AmiiboViewModel, ViewState};

pub const USAGE: &str = "commands: refresh | more | retry | size <20|50|100> | search <text> | clear | status | help | quit";

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    More,
    Retry,
    Size(u32),
    Search(String),
    Clear,
    Status,
    Help,
    Quit,
}

/// Why a prompt line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid page size '{0}'")]
    InvalidPageSize(String),
}

/// Parses one prompt line.
///
/// ## Returns
/// * `Ok(None)` - blank line
/// * `Ok(Some(cmd))` - recognised command
/// * `Err(_)` - unknown command or bad argument
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "refresh" | "r" => Command::Refresh,
        "more" | "m" => Command::More,
        "retry" => Command::Retry,
        "size" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("size"));
            }
            let n = rest
                .parse()
                .map_err(|_| CommandError::InvalidPageSize(rest.to_string()))?;
            Command::Size(n)
        }
        "search" | "s" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("search"));
            }
            Command::Search(rest.to_string())
        }
        "clear" => Command::Clear,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// What the prompt loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading; print the message if there is one.
    Continue(Option<String>),
    Quit,
}

/// Runs `command` against the holder.
pub fn dispatch(vm: &AmiiboViewModel, command: Command) -> Outcome {
    debug!(?command, "Dispatching command");

    let message = match command {
        Command::Refresh => {
            vm.refresh_amiibos();
            None
        }
        Command::More => {
            let before = vm.snapshot().pagination;
            vm.load_next_page();
            if before.can_load_more() {
                None
            } else if before.pagination_error.is_some() {
                Some("last page failed; type 'retry'".to_string())
            } else if before.is_loading_more {
                Some("already loading".to_string())
            } else {
                Some("no more pages".to_string())
            }
        }
        Command::Retry => {
            vm.retry_load_more();
            None
        }
        Command::Size(n) => Some(match vm.set_page_size(n) {
            Ok(true) => format!("page size set to {n}"),
            Ok(false) => format!("page size is already {n}"),
            Err(e) => e.to_string(),
        }),
        Command::Search(query) => match vm.on_search_query_changed(&query) {
            Ok(true) => None,
            Ok(false) => Some(format!("already showing '{}'", query.trim())),
            Err(e) => Some(e.to_string()),
        },
        Command::Clear => match vm.on_search_query_changed("") {
            Ok(true) => None,
            Ok(false) => Some("no search active".to_string()),
            Err(e) => Some(e.to_string()),
        },
        Command::Status => Some(summarize(&vm.snapshot())),
        Command::Help => Some(USAGE.to_string()),
        Command::Quit => return Outcome::Quit,
    };
    Outcome::Continue(message)
}

/// One-line summary of a state, as printed on every change.
///
/// ## Examples
/// ```text
/// loading
/// 40 amiibos | page 2 | size 20 | search "mario" | loading more
/// 20 amiibos | page 1 | size 20 | refreshing
/// error [network] Network error: timeout | 20 cached | retryable
/// ```
pub fn summarize(state: &ViewState) -> String {
    let pagination = &state.pagination;

    let mut line = match &state.display {
        DisplayState::Loading => "loading".to_string(),
        DisplayState::Success {
            items,
            is_refreshing,
        } => {
            let mut line = format!(
                "{} amiibos | page {} | size {}",
                items.len(),
                pagination.current_page + 1,
                pagination.page_size
            );
            if let Some(query) = &pagination.query {
                line.push_str(&format!(" | search \"{query}\""));
            }
            if *is_refreshing {
                line.push_str(" | refreshing");
            }
            line
        }
        DisplayState::Error {
            message,
            kind,
            is_retryable,
            cached_items,
        } => {
            let mut line = format!("error [{kind}] {message}");
            if !cached_items.is_empty() {
                line.push_str(&format!(" | {} cached", cached_items.len()));
            }
            if *is_retryable {
                line.push_str(" | retryable");
            }
            line
        }
    };

    match state.footer() {
        ListFooter::None => {}
        ListFooter::Loading => line.push_str(" | loading more"),
        ListFooter::Error(message) => {
            line.push_str(&format!(" | load more failed: {message} (type 'retry')"))
        }
        ListFooter::EndOfList(count) => line.push_str(&format!(" | end of list ({count} items)")),
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use amiibo_core::{Amiibo, AmiiboError, PaginationState};

    fn items(count: usize) -> Vec<Amiibo> {
        (0..count)
            .map(|i| Amiibo {
                id: format!("{i:016x}"),
                name: format!("Figure {i}"),
                game_series: String::new(),
                amiibo_series: String::new(),
                character: String::new(),
                image_url: String::new(),
                amiibo_type: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_parse_every_command() {
        assert_eq!(parse_command("refresh"), Ok(Some(Command::Refresh)));
        assert_eq!(parse_command("more"), Ok(Some(Command::More)));
        assert_eq!(parse_command("retry"), Ok(Some(Command::Retry)));
        assert_eq!(parse_command("size 50"), Ok(Some(Command::Size(50))));
        assert_eq!(
            parse_command("search  super mario "),
            Ok(Some(Command::Search("super mario".to_string())))
        );
        assert_eq!(parse_command("clear"), Ok(Some(Command::Clear)));
        assert_eq!(parse_command("status"), Ok(Some(Command::Status)));
        assert_eq!(parse_command("help"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("QUIT"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_command("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert_eq!(parse_command("size"), Err(CommandError::MissingArgument("size")));
        assert_eq!(
            parse_command("size big"),
            Err(CommandError::InvalidPageSize("big".to_string()))
        );
        assert_eq!(
            parse_command("search"),
            Err(CommandError::MissingArgument("search"))
        );
    }

    #[test]
    fn test_summarize_loading() {
        assert_eq!(summarize(&ViewState::default()), "loading");
    }

    #[test]
    fn test_summarize_success_with_footer() {
        let mut pagination = PaginationState::default();
        pagination.loaded_items = items(15);
        pagination.has_more_pages = false;
        pagination.query = Some("mario".to_string());

        let state = ViewState {
            display: DisplayState::success(items(15)),
            pagination,
        };
        assert_eq!(
            summarize(&state),
            "15 amiibos | page 1 | size 20 | search \"mario\" | end of list (15 items)"
        );
    }

    #[test]
    fn test_summarize_error() {
        let state = ViewState {
            display: DisplayState::from_error(&AmiiboError::network("timeout"), items(20)),
            pagination: PaginationState::default(),
        };
        assert_eq!(
            summarize(&state),
            "error [network] Network error: timeout | 20 cached | retryable"
        );
    }
}
