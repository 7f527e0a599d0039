//! Personality presets for the assistant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named behavioral preset controlling the tone of generated text.
///
/// Tags are matched exactly (case-sensitive); anything else means the
/// default persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Professional,
    Casual,
    Enthusiastic,
    Concise,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Professional,
        Personality::Casual,
        Personality::Enthusiastic,
        Personality::Concise,
    ];

    /// Wire tag for this personality.
    pub fn tag(&self) -> &'static str {
        match self {
            Personality::Professional => "professional",
            Personality::Casual => "casual",
            Personality::Enthusiastic => "enthusiastic",
            Personality::Concise => "concise",
        }
    }

    /// Resolve a tag by exact match. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("invalid personality: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personality_roundtrip() {
        for p in Personality::ALL {
            let parsed: Personality = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
        }
    }

    #[test]
    fn test_from_tag_is_exact() {
        assert_eq!(Personality::from_tag("casual"), Some(Personality::Casual));
        assert_eq!(Personality::from_tag("Casual"), None);
        assert_eq!(Personality::from_tag(" casual"), None);
        assert_eq!(Personality::from_tag("pirate"), None);
    }

    #[test]
    fn test_personality_serde() {
        let json = serde_json::to_string(&Personality::Enthusiastic).unwrap();
        assert_eq!(json, "\"enthusiastic\"");
    }
}
