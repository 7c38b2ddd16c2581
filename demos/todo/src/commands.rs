//! Command parsing for the CLI demo.
//!
//! The view-to-core contract lives here: raw input is trimmed and titles
//! are rejected when empty *before* anything reaches the store, and tasks
//! are addressed by their 1-based list position, which the view maps to an
//! opaque task id itself.

use thiserror::Error;

/// One parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task with the given (already trimmed) title
    Add(String),
    /// Toggle the completion flag of the task at a 1-based position
    Toggle(usize),
    /// Remove the task at a 1-based position
    Remove(usize),
    /// Log the stub identity in
    Login,
    /// Log out
    Logout,
    /// Print the task list
    List,
    /// Print usage
    Help,
    /// Exit the demo
    Quit,
}

/// Errors produced while parsing a command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The task title was empty after trimming
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// A command that needs an argument was given none
    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),

    /// The task position was not a number
    #[error("invalid task number: {0}")]
    InvalidIndex(String),

    /// The command word was not recognized
    #[error("unknown command: {0}")]
    Unknown(String),
}

impl Command {
    /// Parse one line of user input.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command word is unknown, a
    /// required argument is missing or malformed, or an `add` title is
    /// empty after trimming.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "add" => {
                if rest.is_empty() {
                    Err(CommandError::EmptyTitle)
                } else {
                    Ok(Self::Add(rest.to_string()))
                }
            }
            "toggle" | "done" => parse_index("toggle", rest).map(Self::Toggle),
            "rm" | "remove" => parse_index("remove", rest).map(Self::Remove),
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "ls" | "list" => Ok(Self::List),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_index(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    rest.parse()
        .map_err(|_| CommandError::InvalidIndex(rest.to_string()))
}

/// Header line showing the live task count
#[must_use]
pub fn header_line(count: usize) -> String {
    match count {
        0 => "No tasks registered!".to_string(),
        1 => "1 task registered!".to_string(),
        n => format!("{n} tasks registered!"),
    }
}
