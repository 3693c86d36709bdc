//! Integration tests for a full interactive round.
//!
//! These tests wire the round controller to real adapters:
//! 1. Scripted console stands in for the founder
//! 2. Offline and mock generators stand in for the sharks
//! 3. The in-memory repository records what a database would store
//! 4. History queries read the stored conversation back

use std::sync::Arc;

use shark_tank::adapters::{
    InMemoryPitchRepository, MockTextGenerator, OfflineTextGenerator, ScriptedConsole,
};
use shark_tank::application::{
    GetConversationHandler, GetConversationQuery, InteractiveRoundController,
    ListPitchHistoryHandler, ListPitchHistoryQuery,
};
use shark_tank::domain::foundation::SessionNumber;
use shark_tank::domain::panel::{Panel, Verdict};
use shark_tank::domain::pitch::PitchData;
use shark_tank::domain::session::SharedSessionRegistry;
use shark_tank::ports::{GenerationError, TaskKind};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn pitch() -> PitchData {
    PitchData::from_pitch("Reusable coffee pods for offices", 200_000, 15)
}

fn answers(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Answer number {}", i)).collect()
}

// =============================================================================
// Full panel
// =============================================================================

#[tokio::test]
async fn full_panel_round_with_offline_generator() {
    let registry = SharedSessionRegistry::new();
    let repository = Arc::new(InMemoryPitchRepository::new());
    let console = Arc::new(ScriptedConsole::new(answers(6)));
    let controller = InteractiveRoundController::new(
        registry.clone(),
        Arc::new(OfflineTextGenerator::new(Panel::classic())),
        repository.clone(),
        console.clone(),
    );

    let outcome = controller.run(pitch()).await.unwrap();

    assert_eq!(outcome.offers.len(), 6);
    assert!(outcome.offers.iter().all(|(_, v)| !v.is_declined()));
    assert!(outcome.pitch.contains("Reusable coffee pods for offices"));
    assert!(outcome.recap.contains("of 6 sharks made an offer"));
    assert!(outcome.transcript.contains("Daymond John (Round 6):"));
    assert_eq!(registry.stats().await.total_active_sessions, 0);
    assert_eq!(console.remaining_inputs(), 0);

    // Persisted copy matches the live transcript minus the session header.
    let conversation = GetConversationHandler::new(repository.clone())
        .handle(GetConversationQuery {
            session_id: outcome.session_id,
        })
        .await
        .unwrap();
    assert_eq!(conversation.qa_history.len(), 6);
    assert_eq!(
        format!("Session #1\n{}", conversation.conversation_summary),
        outcome.transcript
    );
}

#[tokio::test]
async fn early_exit_gives_default_no_to_the_rest() {
    let registry = SharedSessionRegistry::new();
    let mut script = answers(2);
    script.push("EXIT".to_string());
    let console = Arc::new(ScriptedConsole::new(script));
    let generator = MockTextGenerator::new();
    let controller = InteractiveRoundController::new(
        registry,
        Arc::new(generator.clone()),
        Arc::new(InMemoryPitchRepository::new()),
        console.clone(),
    );

    let outcome = controller.run(pitch()).await.unwrap();

    let declined: Vec<_> = outcome
        .offers
        .iter()
        .filter(|(_, v)| v.is_declined())
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(
        declined,
        vec!["Barbara Corcoran", "Robert Herjavec", "Kevin O'Leary", "Daymond John"]
    );
    assert_eq!(outcome.offers.get("Kevin O'Leary").unwrap().to_string(), "No");

    let verdict_sharks: Vec<_> = generator
        .get_calls()
        .into_iter()
        .filter_map(|c| match c.task {
            TaskKind::Verdict { shark } => Some(shark),
            _ => None,
        })
        .collect();
    assert_eq!(verdict_sharks, vec!["Mark Cuban", "Lori Greiner"]);
}

// =============================================================================
// Lifecycle commands mid-round
// =============================================================================

#[tokio::test]
async fn reset_then_refresh_during_round() {
    let registry = SharedSessionRegistry::new();
    let repository = Arc::new(InMemoryPitchRepository::new());
    let script = vec!["one", "reset", "two", "refresh", "exit"];
    let controller = InteractiveRoundController::new(
        registry.clone(),
        Arc::new(MockTextGenerator::new()),
        repository.clone(),
        Arc::new(ScriptedConsole::new(script)),
    );

    let outcome = controller.run(pitch()).await.unwrap();

    // reset -> #1 again, refresh -> #2
    assert_eq!(outcome.session_number, Some(SessionNumber::new(2)));
    assert!(outcome.offers.iter().all(|(_, v)| *v == Verdict::Declined));
    assert!(outcome.transcript.contains("Pitch: Reusable coffee pods for offices"));
    assert!(!outcome.transcript.contains("Q&A History"));

    let history = ListPitchHistoryHandler::new(repository)
        .handle(ListPitchHistoryQuery { limit: 10 })
        .await
        .unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].session_id, outcome.session_id);
}

#[tokio::test]
async fn generator_error_aborts_round_and_cleans_up_session() {
    let registry = SharedSessionRegistry::new();
    let generator = MockTextGenerator::new().with_error(GenerationError::unavailable("overloaded"));
    let controller = InteractiveRoundController::new(
        registry.clone(),
        Arc::new(generator),
        Arc::new(InMemoryPitchRepository::new()),
        Arc::new(ScriptedConsole::new(answers(6))),
    );

    let err = controller.run(pitch()).await.unwrap_err();

    assert!(err.to_string().contains("overloaded"));
    assert!(registry.list_active().await.is_empty());
}
