//! Interactive session management menu.
//!
//! Lets an operator inspect, refresh and reset sessions outside a round,
//! and check that the pitch store is reachable.

use serde_json::Value;
use std::io;
use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{SessionId, SessionNumber};
use crate::domain::session::{Session, SharedSessionRegistry};
use crate::ports::{Console, PitchRepository};

const RULE: &str = "============================================================";

/// Menu entries, numbered 1 to 7 on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ViewAll,
    ViewDetails,
    Refresh,
    Reset,
    Statistics,
    TestDatabase,
    Exit,
}

impl MenuChoice {
    /// Parses the option number typed by the operator.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::ViewAll),
            "2" => Some(Self::ViewDetails),
            "3" => Some(Self::Refresh),
            "4" => Some(Self::Reset),
            "5" => Some(Self::Statistics),
            "6" => Some(Self::TestDatabase),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Session management menu over a shared registry.
pub struct SessionMenu {
    registry: SharedSessionRegistry,
    repository: Arc<dyn PitchRepository>,
    console: Arc<dyn Console>,
}

impl SessionMenu {
    pub fn new(
        registry: SharedSessionRegistry,
        repository: Arc<dyn PitchRepository>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            registry,
            repository,
            console,
        }
    }

    /// Runs the menu until the operator exits or input ends.
    pub async fn run(&self) -> io::Result<()> {
        loop {
            self.show_menu().await?;

            let input = match self.console.prompt("\nSelect an option (1-7): ").await {
                Ok(input) => input,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            };

            match MenuChoice::parse(&input) {
                Some(MenuChoice::ViewAll) => self.view_all().await?,
                Some(MenuChoice::ViewDetails) => self.view_details().await?,
                Some(MenuChoice::Refresh) => self.refresh().await?,
                Some(MenuChoice::Reset) => self.reset().await?,
                Some(MenuChoice::Statistics) => self.statistics().await?,
                Some(MenuChoice::TestDatabase) => self.test_database().await?,
                Some(MenuChoice::Exit) => break,
                None => self.console.say("Invalid option. Please select 1-7.").await?,
            }
        }

        self.console.say("\nGoodbye!").await
    }

    async fn show_menu(&self) -> io::Result<()> {
        let lines = [
            RULE,
            "Shark Tank Session Manager",
            RULE,
            "1. View all sessions",
            "2. View session details",
            "3. Refresh a session (keep pitch, reset Q&A)",
            "4. Reset to session 1",
            "5. View session statistics",
            "6. Test database connection",
            "7. Exit",
            RULE,
        ];
        self.console.say(&format!("\n{}", lines.join("\n"))).await
    }

    async fn view_all(&self) -> io::Result<()> {
        let sessions = self.registry.list_active().await;
        self.console.say("\nActive Sessions:").await?;
        if sessions.is_empty() {
            return self.console.say("  No active sessions found.").await;
        }
        for listing in sessions {
            self.console.say(&format!("\n{}", listing.render())).await?;
        }
        Ok(())
    }

    /// Accepts either a session id or a session number (`3` or `#3`).
    async fn lookup(&self, input: &str) -> Option<Session> {
        let input = input.trim();
        if let Ok(number) = input.trim_start_matches('#').parse::<u32>() {
            return self.registry.get_by_number(SessionNumber::new(number)).await;
        }
        let id: SessionId = input.parse().ok()?;
        self.registry.get(&id).await
    }

    async fn view_details(&self) -> io::Result<()> {
        let input = self
            .console
            .prompt("\nEnter session ID or number (or press Enter to skip): ")
            .await?;
        if input.trim().is_empty() {
            return Ok(());
        }

        let Some(session) = self.lookup(&input).await else {
            return self
                .console
                .say(&format!("Session {} not found.", input.trim()))
                .await;
        };

        self.console.say(&render_details(&session)).await
    }

    async fn refresh(&self) -> io::Result<()> {
        let input = self.console.prompt("\nEnter session ID to refresh: ").await?;
        if input.trim().is_empty() {
            return Ok(());
        }

        let old_id = match self.lookup(&input).await {
            Some(session) => *session.id(),
            None => {
                return self
                    .console
                    .say(&format!("Error refreshing session: Session {} not found", input.trim()))
                    .await
            }
        };

        match self.registry.refresh(&old_id).await {
            Ok(new_id) => {
                let number = self
                    .registry
                    .get(&new_id)
                    .await
                    .map(|s| s.number().to_string())
                    .unwrap_or_else(|| "?".to_string());
                self.console
                    .say(&format!(
                        "Session refreshed successfully!\n  Old Session ID: {}\n  New Session ID: {}\n  New Session Number: #{}\n  Pitch data preserved, Q&A reset to round 1",
                        old_id, new_id, number
                    ))
                    .await
            }
            Err(e) => {
                self.console
                    .say(&format!("Error refreshing session: {}", e))
                    .await
            }
        }
    }

    async fn reset(&self) -> io::Result<()> {
        let confirm = self
            .console
            .prompt("\nThis will clear ALL active sessions. Are you sure? (yes/no): ")
            .await?;
        if !confirm.trim().eq_ignore_ascii_case("yes") {
            return self.console.say("Reset cancelled.").await;
        }

        let new_id = self.registry.reset().await;
        info!(session_id = %new_id, "Sessions reset from menu");
        self.console
            .say(&format!(
                "Reset to session 1 successful!\n  New Session ID: {}\n  All previous sessions cleared\n  Starting fresh with session #1",
                new_id
            ))
            .await
    }

    async fn statistics(&self) -> io::Result<()> {
        let stats = self.registry.stats().await;
        self.console
            .say(&format!("\nSession Statistics:\n{}", stats.render()))
            .await
    }

    async fn test_database(&self) -> io::Result<()> {
        self.console.say("\nTesting Database Connection...").await?;
        match self.repository.health_check().await {
            Ok(()) => {
                self.console
                    .say("Database connection successful!\nDatabase tables accessible!")
                    .await
            }
            Err(e) => {
                self.console
                    .say(&format!(
                        "Database connection failed: {}\n  Please ensure PostgreSQL is running and accessible.",
                        e
                    ))
                    .await
            }
        }
    }
}

/// Detail block for one session.
fn render_details(session: &Session) -> String {
    let mut lines = vec![
        format!("\nSession #{} Details:", session.number()),
        format!("  ID: {}", session.id()),
        format!("  Created: {}", session.created_at()),
        format!("  Current Round: {}", session.current_round()),
        format!("  Total Q&A Rounds: {}", session.qa_rounds().len()),
    ];

    if !session.pitch_data().is_empty() {
        lines.push("\n  Pitch Data:".to_string());
        for (key, value) in session.pitch_data().iter() {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(format!("    {}: {}", key, value));
        }
    }

    if !session.qa_rounds().is_empty() {
        lines.push("\n  Q&A History:".to_string());
        for qa in session.qa_rounds() {
            lines.push(format!("    Round {}: {}", qa.round_number, qa.shark));
            lines.push(format!("      Q: {}", qa.question));
            lines.push(format!("      A: {}", qa.answer));
            lines.push(format!("      Time: {}", qa.timestamp));
        }
    }

    lines.join("\n")
}
