//! Offline generator - deterministic persona templates.
//!
//! Lets the simulation run end to end without network access or an API key.
//! Output is stable for a given request so runs are reproducible.

use async_trait::async_trait;

use crate::domain::panel::Panel;
use crate::ports::{context, GenerationError, GenerationRequest, TaskKind, TextGenerator};

/// Question templates, picked by the shark's position on the panel.
const QUESTIONS: &[&str] = &[
    "How does this scale beyond your first hundred customers?",
    "Do you have a patent, and what stops a big retailer from copying you?",
    "Why are you the person who wins this market?",
    "What does your sales channel look like today?",
    "What are your sales, your margins, and how did you get to that valuation?",
    "How loyal are your customers, and how will you build the brand?",
];

/// Template-driven text generator.
#[derive(Debug, Clone, Default)]
pub struct OfflineTextGenerator {
    panel: Panel,
}

impl OfflineTextGenerator {
    pub fn new(panel: Panel) -> Self {
        Self { panel }
    }

    fn question_for(&self, shark: &str) -> &'static str {
        let position = self
            .panel
            .sharks()
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(shark))
            .unwrap_or(0);
        QUESTIONS[position % QUESTIONS.len()]
    }

    fn verdict_for(shark: &str, conversation: &str) -> String {
        let answers = conversation
            .lines()
            .filter(|line| line.starts_with("A: "))
            .count();
        if answers >= 3 {
            format!(
                "Yes. I like how you handled the questions, so I'm in, subject to {} doing diligence.",
                shark
            )
        } else {
            "No. I haven't heard enough to get comfortable, so I'm out.".to_string()
        }
    }
}

#[async_trait]
impl TextGenerator for OfflineTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let field = |key: &str| request.field(key).unwrap_or("N/A");

        let text = match &request.task {
            TaskKind::Pitch => format!(
                "Hello Sharks! {} {}.",
                field(context::PITCH_TEXT).trim_end_matches('.'),
                field(context::INVESTMENT_REQUEST)
            ),
            TaskKind::Question { shark } => self.question_for(shark).to_string(),
            TaskKind::Verdict { shark } => Self::verdict_for(shark, field(context::CONVERSATION)),
            TaskKind::ModeratorSummary => {
                let offers = request.field(context::OFFERS).unwrap_or_default();
                let total = offers.lines().filter(|l| !l.trim().is_empty()).count();
                let deals = offers
                    .lines()
                    .filter(|l| {
                        l.split_once(": ")
                            .map(|(_, v)| v.trim_start().starts_with("Yes"))
                            .unwrap_or(false)
                    })
                    .count();
                format!(
                    "That's the round. {} of {} sharks made an offer.",
                    deals, total
                )
            }
        };

        Ok(text)
    }

    fn provider_name(&self) -> &str {
        "offline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pitch_includes_text_and_request() {
        let generator = OfflineTextGenerator::default();
        let request = GenerationRequest::new(TaskKind::Pitch)
            .with_context(context::PITCH_TEXT, "Solar-powered coolers.")
            .with_context(
                context::INVESTMENT_REQUEST,
                "Investment Request: $100,000 for 10% equity",
            );

        let text = generator.generate(request).await.unwrap();

        assert_eq!(
            text,
            "Hello Sharks! Solar-powered coolers Investment Request: $100,000 for 10% equity."
        );
    }

    #[tokio::test]
    async fn questions_follow_panel_position() {
        let generator = OfflineTextGenerator::new(Panel::classic());
        let request = GenerationRequest::new(TaskKind::Question {
            shark: "Kevin O'Leary".into(),
        });

        let text = generator.generate(request).await.unwrap();

        assert!(text.contains("valuation"));
    }

    #[tokio::test]
    async fn verdict_depends_on_answers_given() {
        let generator = OfflineTextGenerator::default();
        let thin = GenerationRequest::new(TaskKind::Verdict {
            shark: "Mark Cuban".into(),
        })
        .with_context(context::CONVERSATION, "Pitch: X\nQ: Why?\nA: Because");
        let rich = GenerationRequest::new(TaskKind::Verdict {
            shark: "Mark Cuban".into(),
        })
        .with_context(context::CONVERSATION, "A: one\nA: two\nA: three");

        assert!(generator.generate(thin).await.unwrap().starts_with("No"));
        assert!(generator.generate(rich).await.unwrap().starts_with("Yes"));
    }

    #[tokio::test]
    async fn moderator_counts_offers() {
        let generator = OfflineTextGenerator::default();
        let request = GenerationRequest::new(TaskKind::ModeratorSummary).with_context(
            context::OFFERS,
            "Mark Cuban: Yes, 20%\nLori Greiner: No\nDaymond John: No",
        );

        let text = generator.generate(request).await.unwrap();

        assert_eq!(text, "That's the round. 1 of 3 sharks made an offer.");
    }
}
