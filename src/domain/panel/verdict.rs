//! Verdicts handed down at the end of a round.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single shark's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Verdict {
    /// The shark never got an answer, so it declines outright.
    Declined,
    /// Free-text decision produced by text generation.
    Decision(String),
}

impl Verdict {
    /// Returns true for the default decline.
    pub fn is_declined(&self) -> bool {
        matches!(self, Verdict::Declined)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Declined => write!(f, "No"),
            Verdict::Decision(text) => write!(f, "{}", text.trim()),
        }
    }
}

/// Verdicts in panel order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offers {
    entries: Vec<(String, Verdict)>,
}

impl Offers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, shark: impl Into<String>, verdict: Verdict) {
        self.entries.push((shark.into(), verdict));
    }

    pub fn get(&self, shark: &str) -> Option<&Verdict> {
        self.entries
            .iter()
            .find(|(name, _)| name == shark)
            .map(|(_, verdict)| verdict)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Verdict)> {
        self.entries.iter().map(|(name, verdict)| (name.as_str(), verdict))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `name: verdict` line per shark, used as moderator context.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, verdict)| format!("{}: {}", name, verdict))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_displays_as_no() {
        assert_eq!(Verdict::Declined.to_string(), "No");
        assert!(Verdict::Declined.is_declined());
    }

    #[test]
    fn offers_render_in_recorded_order() {
        let mut offers = Offers::new();
        offers.record("Mark Cuban", Verdict::Decision(" $100k for 20% \n".into()));
        offers.record("Lori Greiner", Verdict::Declined);

        assert_eq!(offers.render(), "Mark Cuban: $100k for 20%\nLori Greiner: No");
        assert_eq!(offers.get("Lori Greiner"), Some(&Verdict::Declined));
        assert_eq!(offers.len(), 2);
    }
}
