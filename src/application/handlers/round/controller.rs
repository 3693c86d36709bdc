//! InteractiveRoundController - drives one pitch round end to end.
//!
//! The controller owns no session state of its own beyond the id of the
//! session it is working on. Every lifecycle change goes through the shared
//! registry; persistence and text generation happen between registry calls,
//! never while the registry is locked.

use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::command::{RoundCommand, HELP_TEXT};
use crate::domain::foundation::{PitchRecordId, SessionId, SessionNumber};
use crate::domain::panel::{Offers, Panel, Shark, Verdict};
use crate::domain::pitch::{render_transcript, PitchData, QaRound};
use crate::domain::session::SharedSessionRegistry;
use crate::ports::{
    context, Console, GenerationError, GenerationRequest, PitchRepository, QaEntry, TaskKind,
    TextGenerator,
};

/// Prompt shown when waiting for an answer.
pub const ANSWER_PROMPT: &str = "Your answer (type 'exit' to skip to verdicts, 'help' for commands): ";

/// Errors that abort a round.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("text generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
}

/// Result of a completed round.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// The session the round finished in (already cleaned up).
    pub session_id: SessionId,
    /// `None` if the session was gone from the registry by verdict time.
    pub session_number: Option<SessionNumber>,
    /// The generated pitch presentation.
    pub pitch: String,
    /// Conversation summary the verdicts were based on.
    pub transcript: String,
    pub offers: Offers,
    /// Moderator recap.
    pub recap: String,
}

/// The session the round is currently working in.
struct WorkingSession {
    id: SessionId,
    pitch_record: Option<PitchRecordId>,
}

/// What the Q&A loop does after handling one input line.
enum Flow {
    /// Move on to the next shark.
    Next,
    /// Ask the same question again.
    Reprompt,
    /// Start over from the first shark.
    Restart,
    /// Stop asking and go to verdicts.
    Verdicts,
}

/// Drives one interactive round over the shared registry.
pub struct InteractiveRoundController {
    registry: SharedSessionRegistry,
    generator: Arc<dyn TextGenerator>,
    repository: Arc<dyn PitchRepository>,
    console: Arc<dyn Console>,
    panel: Panel,
}

impl InteractiveRoundController {
    pub fn new(
        registry: SharedSessionRegistry,
        generator: Arc<dyn TextGenerator>,
        repository: Arc<dyn PitchRepository>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            registry,
            generator,
            repository,
            console,
            panel: Panel::classic(),
        }
    }

    /// Replaces the default six-shark panel.
    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panel = panel;
        self
    }

    /// Runs a round for `pitch_data`.
    ///
    /// The working session is cleaned up however the round ends.
    ///
    /// # Errors
    ///
    /// - `Generation` if the text generator fails
    /// - `Console` if reading or writing the console fails
    pub async fn run(&self, pitch_data: PitchData) -> Result<RoundOutcome, RoundError> {
        let id = self.registry.create(pitch_data.clone()).await;
        let pitch_record = self.persist_pitch(&id, &pitch_data).await;
        let mut working = WorkingSession { id, pitch_record };

        info!(session_id = %working.id, provider = self.generator.provider_name(), "Round started");

        let result = self.play(&mut working, &pitch_data).await;
        self.registry.cleanup(&working.id).await;

        match &result {
            Ok(outcome) => info!(
                session_id = %outcome.session_id,
                session_number = ?outcome.session_number,
                "Round completed"
            ),
            Err(e) => warn!(session_id = %working.id, error = %e, "Round aborted"),
        }
        result
    }

    async fn play(
        &self,
        working: &mut WorkingSession,
        pitch_data: &PitchData,
    ) -> Result<RoundOutcome, RoundError> {
        self.console.say("\nStarting Interactive Shark Tank Round...").await?;

        let pitch = self
            .generate(
                GenerationRequest::new(TaskKind::Pitch)
                    .with_context(context::PITCH_TEXT, pitch_data.pitch_text().unwrap_or_default())
                    .with_context(context::INVESTMENT_REQUEST, pitch_data.investment_request()),
            )
            .await?;
        self.console.say(&format!("\nPitch Result: {}", pitch)).await?;

        let answered = self.question_sharks(working, pitch_data, &pitch).await?;
        self.deliver_verdicts(working, pitch_data, pitch, &answered).await
    }

    /// Q&A phase. Returns the names of the sharks that got an answer in the
    /// session the phase ended in.
    async fn question_sharks(
        &self,
        working: &mut WorkingSession,
        pitch_data: &PitchData,
        pitch: &str,
    ) -> Result<HashSet<String>, RoundError> {
        let mut answered = HashSet::new();

        'round: loop {
            answered.clear();

            for shark in self.panel.sharks() {
                let question = self
                    .generate(
                        GenerationRequest::new(TaskKind::Question {
                            shark: shark.name.clone(),
                        })
                        .with_context(context::PITCH, pitch)
                        .with_context(context::PERSONA, shark.persona.as_str()),
                    )
                    .await?;
                self.console
                    .say(&format!("\n{} Shark asks: {}", shark.name, question))
                    .await?;

                loop {
                    let input = self.console.prompt(ANSWER_PROMPT).await?;
                    let flow = self
                        .handle_input(RoundCommand::parse(&input), working, pitch_data, shark, &question)
                        .await?;

                    match flow {
                        Flow::Next => {
                            answered.insert(shark.name.clone());
                            break;
                        }
                        Flow::Reprompt => continue,
                        Flow::Restart => continue 'round,
                        Flow::Verdicts => break 'round,
                    }
                }
            }
            break;
        }

        Ok(answered)
    }

    async fn handle_input(
        &self,
        command: RoundCommand,
        working: &mut WorkingSession,
        pitch_data: &PitchData,
        shark: &Shark,
        question: &str,
    ) -> Result<Flow, RoundError> {
        match command {
            RoundCommand::Answer(answer) => {
                if let Some(round) = self
                    .registry
                    .add_qa_round(&working.id, shark.name.as_str(), question, answer.as_str())
                    .await
                {
                    self.persist_round(working, &round).await;
                }
                Ok(Flow::Next)
            }
            RoundCommand::Refresh => match self.registry.refresh(&working.id).await {
                Ok(new_id) => {
                    self.switch_session(working, new_id, pitch_data).await;
                    let number = self.session_number(&working.id).await;
                    self.console
                        .say(&format!(
                            "\nSession refreshed! Now in session #{}. Your pitch is kept and Q&A restarts from the first shark.",
                            number
                        ))
                        .await?;
                    Ok(Flow::Restart)
                }
                Err(e) => {
                    self.console
                        .say(&format!("Could not refresh session: {}", e))
                        .await?;
                    Ok(Flow::Reprompt)
                }
            },
            RoundCommand::Reset => {
                let fresh = self.registry.reset().await;
                let new_id = self
                    .registry
                    .continue_session(&fresh, pitch_data.clone())
                    .await;
                self.switch_session(working, new_id, pitch_data).await;
                self.console
                    .say("\nAll sessions cleared. Starting over in session #1 with your pitch.")
                    .await?;
                Ok(Flow::Restart)
            }
            RoundCommand::Sessions => {
                let sessions = self.registry.list_active().await;
                let body = if sessions.is_empty() {
                    "  No active sessions found.".to_string()
                } else {
                    sessions
                        .iter()
                        .map(|s| s.render())
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                self.console.say(&format!("\nActive Sessions:\n{}", body)).await?;
                Ok(Flow::Reprompt)
            }
            RoundCommand::Stats => {
                let stats = self.registry.stats().await;
                self.console
                    .say(&format!("\nSession Statistics:\n{}", stats.render()))
                    .await?;
                Ok(Flow::Reprompt)
            }
            RoundCommand::Help => {
                self.console.say(HELP_TEXT).await?;
                Ok(Flow::Reprompt)
            }
            RoundCommand::Exit => {
                self.console
                    .say("\nExiting Q&A early. Moving directly to verdicts...")
                    .await?;
                Ok(Flow::Verdicts)
            }
        }
    }

    async fn deliver_verdicts(
        &self,
        working: &WorkingSession,
        pitch_data: &PitchData,
        pitch: String,
        answered: &HashSet<String>,
    ) -> Result<RoundOutcome, RoundError> {
        let (session_number, transcript) = match self.registry.summarize(&working.id).await {
            Some(summary) => (Some(summary.session_number), summary.conversation_summary),
            None => {
                warn!(session_id = %working.id, "Working session vanished before verdicts");
                (None, render_transcript::<QaRound>(None, pitch_data, &[]))
            }
        };

        let mut offers = Offers::new();
        for shark in self.panel.sharks() {
            if !answered.contains(&shark.name) {
                self.console
                    .say(&format!("\n{} Shark Verdict: No (skipped Q&A)", shark.name))
                    .await?;
                offers.record(shark.name.clone(), Verdict::Declined);
                continue;
            }

            let decision = self
                .generate(
                    GenerationRequest::new(TaskKind::Verdict {
                        shark: shark.name.clone(),
                    })
                    .with_context(context::CONVERSATION, transcript.as_str())
                    .with_context(context::PERSONA, shark.persona.as_str()),
                )
                .await?;
            let verdict = Verdict::Decision(decision);
            self.console
                .say(&format!("\n{} Shark Verdict: {}", shark.name, verdict))
                .await?;
            offers.record(shark.name.clone(), verdict);
        }

        let recap = self
            .generate(
                GenerationRequest::new(TaskKind::ModeratorSummary)
                    .with_context(context::CONVERSATION, transcript.as_str())
                    .with_context(context::OFFERS, offers.render()),
            )
            .await?;
        self.console.say(&format!("\nFinal Recap:\n{}", recap)).await?;

        Ok(RoundOutcome {
            session_id: working.id,
            session_number,
            pitch,
            transcript,
            offers,
            recap,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        debug!(
            task = %request.task,
            provider = self.generator.provider_name(),
            "Generating text"
        );
        let text = self.generator.generate(request).await?;
        Ok(text.trim().to_string())
    }

    async fn session_number(&self, id: &SessionId) -> String {
        self.registry
            .get(id)
            .await
            .map(|s| s.number().to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Points the round at a replacement session and stores its pitch.
    async fn switch_session(&self, working: &mut WorkingSession, new_id: SessionId, pitch_data: &PitchData) {
        info!(old = %working.id, new = %new_id, "Working session replaced");
        working.id = new_id;
        working.pitch_record = self.persist_pitch(&new_id, pitch_data).await;
    }

    /// Stores the pitch; failures are reported and the round goes on.
    async fn persist_pitch(&self, id: &SessionId, pitch_data: &PitchData) -> Option<PitchRecordId> {
        let submission = match pitch_data.to_submission() {
            Ok(submission) => submission,
            Err(e) => {
                warn!(session_id = %id, error = %e, "Pitch not persisted");
                return None;
            }
        };

        match self.repository.append_pitch(id, &submission).await {
            Ok(record) => {
                debug!(session_id = %id, pitch_id = %record, "Pitch persisted");
                Some(record)
            }
            Err(e) => {
                self.persistence_warning("save pitch", &e.to_string()).await;
                None
            }
        }
    }

    async fn persist_round(&self, working: &WorkingSession, round: &QaRound) {
        let Some(pitch_id) = working.pitch_record else {
            return;
        };
        let entry = QaEntry {
            shark: round.shark.clone(),
            question: round.question.clone(),
            answer: round.answer.clone(),
            round_number: round.round_number,
        };
        if let Err(e) = self.repository.append_qa(pitch_id, &entry).await {
            self.persistence_warning("save Q&A", &e.to_string()).await;
        }
    }

    async fn persistence_warning(&self, action: &str, error: &str) {
        warn!(action, error, "Persistence failed; continuing in memory");
        let _ = self
            .console
            .say(&format!("Warning: could not {} to database: {}", action, error))
            .await;
    }
}
