//! The investor panel.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// One simulated investor on the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shark {
    /// Display name, also recorded as the questioner of each Q&A round.
    pub name: String,
    /// Short description of the investor's style, fed to text generation.
    pub persona: String,
}

impl Shark {
    pub fn new(name: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
        }
    }

    /// Snake-case key derived from the name (e.g. `kevin_oleary`).
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(self.name.len());
        for ch in self.name.chars() {
            if ch.is_alphanumeric() {
                key.extend(ch.to_lowercase());
            } else if ch.is_whitespace() && !key.ends_with('_') {
                key.push('_');
            }
        }
        key
    }
}

/// Ordered panel of sharks; questions and verdicts follow this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    sharks: Vec<Shark>,
}

impl Panel {
    /// Builds a panel from an explicit roster.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the roster is empty or a shark has a blank name
    /// - `InvalidFormat` if two sharks share a name
    pub fn new(sharks: Vec<Shark>) -> Result<Self, ValidationError> {
        if sharks.is_empty() {
            return Err(ValidationError::empty_field("sharks"));
        }
        for (i, shark) in sharks.iter().enumerate() {
            if shark.name.trim().is_empty() {
                return Err(ValidationError::empty_field("shark.name"));
            }
            if sharks[..i].iter().any(|s| s.name == shark.name) {
                return Err(ValidationError::invalid_format(
                    "sharks",
                    format!("duplicate shark '{}'", shark.name),
                ));
            }
        }
        Ok(Self { sharks })
    }

    /// The classic six-investor panel.
    pub fn classic() -> Self {
        Self {
            sharks: vec![
                Shark::new(
                    "Mark Cuban",
                    "Tech billionaire who values scalability, hustle and knowing your numbers cold",
                ),
                Shark::new(
                    "Lori Greiner",
                    "Queen of QVC who looks for mass-market consumer products and patent protection",
                ),
                Shark::new(
                    "Barbara Corcoran",
                    "Real-estate mogul who bets on the founder's grit and marketing instinct",
                ),
                Shark::new(
                    "Robert Herjavec",
                    "Cybersecurity entrepreneur who cares about sales channels and execution",
                ),
                Shark::new(
                    "Kevin O'Leary",
                    "Mr. Wonderful: blunt, royalty-loving, obsessed with valuation and cash flow",
                ),
                Shark::new(
                    "Daymond John",
                    "Fashion and branding expert focused on customer loyalty and distribution",
                ),
            ],
        }
    }

    /// Keeps only the sharks named in `names`, in panel order.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if a name is not on the panel
    /// - `EmptyField` if `names` selects nobody
    pub fn select(&self, names: &[String]) -> Result<Self, ValidationError> {
        if let Some(unknown) = names.iter().find(|n| self.find(n).is_none()) {
            return Err(ValidationError::invalid_format(
                "sharks",
                format!("unknown shark '{}'", unknown),
            ));
        }
        let selected = self
            .sharks
            .iter()
            .filter(|s| names.iter().any(|n| n.eq_ignore_ascii_case(&s.name)))
            .cloned()
            .collect();
        Self::new(selected)
    }

    /// Finds a shark by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Shark> {
        self.sharks.iter().find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn sharks(&self) -> &[Shark] {
        &self.sharks
    }

    pub fn len(&self) -> usize {
        self.sharks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sharks.is_empty()
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::classic()
    }
}
