use crate::error::TutorError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The pedagogical interaction style the tutor is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The tutor explains the topic summary.
    #[default]
    Learn,
    /// The tutor asks the topic's sample question.
    Quiz,
    /// The user explains the topic back to the tutor.
    TeachBack,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Learn, Mode::Quiz, Mode::TeachBack];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Learn => "learn",
            Mode::Quiz => "quiz",
            Mode::TeachBack => "teach_back",
        }
    }

    /// Each mode speaks with its own voice so the user can hear the switch.
    pub fn voice_style(&self) -> VoiceStyle {
        match self {
            Mode::Learn => VoiceStyle::new("en-US-matthew", "Promo"),
            Mode::Quiz => VoiceStyle::new("en-US-alicia", "Conversational"),
            Mode::TeachBack => VoiceStyle::new("en-US-ken", "Promo"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TutorError;

    /// Parses a mode name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "learn" => Ok(Mode::Learn),
            "quiz" => Ok(Mode::Quiz),
            "teach_back" => Ok(Mode::TeachBack),
            _ => Err(TutorError::InvalidMode(s.to_string())),
        }
    }
}

/// A TTS voice and speaking style pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceStyle {
    pub voice_id: String,
    pub style: String,
}

impl VoiceStyle {
    pub fn new(voice_id: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            voice_id: voice_id.into(),
            style: style.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes_case_insensitively() {
        assert_eq!("learn".parse::<Mode>().unwrap(), Mode::Learn);
        assert_eq!("QUIZ".parse::<Mode>().unwrap(), Mode::Quiz);
        assert_eq!("Teach_Back".parse::<Mode>().unwrap(), Mode::TeachBack);
    }

    #[test]
    fn rejects_unknown_modes() {
        for input in ["bogus", "", "teach back", "teachback"] {
            let err = input.parse::<Mode>().unwrap_err();
            assert!(matches!(err, TutorError::InvalidMode(ref m) if m == input));
        }
    }

    #[test]
    fn display_matches_parse() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn voice_styles_per_mode() {
        assert_eq!(Mode::Learn.voice_style(), VoiceStyle::new("en-US-matthew", "Promo"));
        assert_eq!(
            Mode::Quiz.voice_style(),
            VoiceStyle::new("en-US-alicia", "Conversational")
        );
        assert_eq!(Mode::TeachBack.voice_style(), VoiceStyle::new("en-US-ken", "Promo"));
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Mode::TeachBack).unwrap(), "\"teach_back\"");
        assert_eq!(Mode::default(), Mode::Learn);
    }
}
