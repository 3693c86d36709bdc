//! Console over the process's stdin/stdout.

use async_trait::async_trait;
use std::io;
use tokio::io::{stdin, stdout, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::ports::Console;

/// Line-oriented console on stdin/stdout.
pub struct StdioConsole {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdioConsole {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(stdin()).lines()),
        }
    }
}

impl Default for StdioConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdioConsole {
    async fn prompt(&self, prompt: &str) -> io::Result<String> {
        let mut out = stdout();
        out.write_all(prompt.as_bytes()).await?;
        out.flush().await?;

        match self.lines.lock().await.next_line().await? {
            Some(line) => Ok(line),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")),
        }
    }

    async fn say(&self, line: &str) -> io::Result<()> {
        let mut out = stdout();
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await
    }
}
