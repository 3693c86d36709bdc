//! Commands a founder can type in place of an answer.

/// Parsed answer line.
///
/// Keywords are matched on the trimmed, case-insensitive line; anything
/// else is an answer and is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundCommand {
    /// An answer to the current question.
    Answer(String),
    /// Keep the pitch, restart Q&A in a new session.
    Refresh,
    /// Drop every session and restart numbering at 1.
    Reset,
    /// List active sessions.
    Sessions,
    /// Show registry statistics.
    Stats,
    /// Show the command list.
    Help,
    /// Skip the remaining questions and go to verdicts.
    Exit,
}

impl RoundCommand {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "refresh" => Self::Refresh,
            "reset" => Self::Reset,
            "sessions" => Self::Sessions,
            "stats" => Self::Stats,
            "help" => Self::Help,
            "exit" => Self::Exit,
            _ => Self::Answer(input.to_string()),
        }
    }
}

/// Command list shown by `help`.
pub const HELP_TEXT: &str = "Commands you can type instead of an answer:
  refresh  - keep your pitch, restart Q&A in a new session
  reset    - clear all sessions and start again at session #1
  sessions - list active sessions
  stats    - show session statistics
  help     - show this message
  exit     - skip remaining questions and go to verdicts";
