//! Console port - line-oriented conversation with the founder.

use async_trait::async_trait;

/// Port for user-facing text I/O.
///
/// The interactive round never touches stdin/stdout directly, so it can be
/// driven by a script in tests.
#[async_trait]
pub trait Console: Send + Sync {
    /// Show `prompt` and read one line (without the trailing newline).
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` when input is exhausted.
    async fn prompt(&self, prompt: &str) -> std::io::Result<String>;

    /// Show a line of output.
    async fn say(&self, line: &str) -> std::io::Result<()>;
}
