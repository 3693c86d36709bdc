//! Console driven by a fixed script of input lines.
//!
//! Used by tests and non-interactive runs; everything shown is captured.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Mutex, MutexGuard};

use crate::ports::Console;

/// Console that answers prompts from a script and records all output.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: Mutex<VecDeque<String>>,
    output: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: Mutex::new(inputs.into_iter().map(Into::into).collect()),
            output: Mutex::new(Vec::new()),
        }
    }

    /// Everything shown so far, prompts included, one entry per call.
    pub fn output(&self) -> Vec<String> {
        lock(&self.output).clone()
    }

    /// All output joined with newlines.
    pub fn transcript(&self) -> String {
        self.output().join("\n")
    }

    /// Input lines not yet consumed.
    pub fn remaining_inputs(&self) -> usize {
        lock(&self.inputs).len()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn prompt(&self, prompt: &str) -> io::Result<String> {
        lock(&self.output).push(prompt.to_string());
        lock(&self.inputs)
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    async fn say(&self, line: &str) -> io::Result<()> {
        lock(&self.output).push(line.to_string());
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_inputs_and_records_output() {
        let console = ScriptedConsole::new(["first", "second"]);

        assert_eq!(console.prompt("? ").await.unwrap(), "first");
        console.say("hello").await.unwrap();
        assert_eq!(console.prompt("? ").await.unwrap(), "second");

        assert_eq!(console.output(), vec!["? ", "hello", "? "]);
        assert_eq!(console.remaining_inputs(), 0);
    }

    #[tokio::test]
    async fn exhausted_script_is_eof() {
        let console = ScriptedConsole::new(Vec::<String>::new());

        let err = console.prompt("? ").await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
