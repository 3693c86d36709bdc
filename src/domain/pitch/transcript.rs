//! Human-readable conversation transcript.
//!
//! Shared by the live registry summary and the persisted-history view so both
//! render a pitch and its Q&A history identically.

use super::PitchData;

/// A Q&A exchange as seen by the transcript renderer.
pub trait TranscriptEntry {
    fn shark(&self) -> &str;
    fn question(&self) -> &str;
    fn answer(&self) -> &str;
    fn round_number(&self) -> u32;
}

impl TranscriptEntry for super::QaRound {
    fn shark(&self) -> &str {
        &self.shark
    }
    fn question(&self) -> &str {
        &self.question
    }
    fn answer(&self) -> &str {
        &self.answer
    }
    fn round_number(&self) -> u32 {
        self.round_number
    }
}

/// Renders the pitch lines followed by the Q&A history, one line per element.
///
/// `header`, when given, becomes the first line.
pub fn render_transcript<E: TranscriptEntry>(
    header: Option<String>,
    pitch: &PitchData,
    rounds: &[E],
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4 + rounds.len() * 3);
    parts.extend(header);
    parts.push(format!("Pitch: {}", pitch.pitch_text().unwrap_or("N/A")));
    parts.push(pitch.investment_request());

    if !rounds.is_empty() {
        parts.push("\nQ&A History:".to_string());
        for qa in rounds {
            parts.push(format!("\n{} (Round {}):", qa.shark(), qa.round_number()));
            parts.push(format!("Q: {}", qa.question()));
            parts.push(format!("A: {}", qa.answer()));
        }
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pitch::QaRound;

    #[test]
    fn renders_pitch_without_history() {
        let pitch = PitchData::from_pitch("Smart mugs", 100_000, 10);
        let text = render_transcript::<QaRound>(Some("Session #3".into()), &pitch, &[]);
        assert_eq!(
            text,
            "Session #3\nPitch: Smart mugs\nInvestment Request: $100,000 for 10% equity"
        );
    }

    #[test]
    fn renders_rounds_in_order() {
        let pitch = PitchData::from_pitch("Smart mugs", 100_000, 10);
        let rounds = vec![
            QaRound::new("Mark Cuban", "Sales?", "Ten thousand units", 1),
            QaRound::new("Lori Greiner", "Patent?", "Pending", 2),
        ];
        let text = render_transcript(None, &pitch, &rounds);
        let expected = "Pitch: Smart mugs\n\
                        Investment Request: $100,000 for 10% equity\n\
                        \nQ&A History:\n\
                        \nMark Cuban (Round 1):\n\
                        Q: Sales?\n\
                        A: Ten thousand units\n\
                        \nLori Greiner (Round 2):\n\
                        Q: Patent?\n\
                        A: Pending";
        assert_eq!(text, expected);
    }

    #[test]
    fn missing_pitch_text_reads_not_available() {
        let text = render_transcript::<QaRound>(None, &PitchData::new(), &[]);
        assert!(text.starts_with("Pitch: N/A\n"));
    }
}
