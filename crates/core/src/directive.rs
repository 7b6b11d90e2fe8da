//! Directive Resolution
//!
//! Turns tool calls against a `TutorState` into the text the LLM should act
//! on next, and pushes the matching voice style to the live voice session.

use crate::{
    content::ContentStore,
    error::TutorError,
    mode::{Mode, VoiceStyle},
    state::TutorState,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TEACH_BACK_INSTRUCTION: &str = "Ask the user to explain the topic in simple words.";
const EVALUATION_INSTRUCTION: &str =
    "Evaluate the explanation, score out of 10, and correct mistakes.";

/// The live voice conversation the tutor can restyle.
///
/// Updates are fire-and-forget; implementations must not block.
#[cfg_attr(test, mockall::automock)]
pub trait VoiceSession: Send + Sync {
    fn update_voice_style(&self, style: &VoiceStyle);
}

/// Instruction text for the LLM plus the voice it should be spoken in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub text: String,
    pub voice: Option<VoiceStyle>,
}

impl Directive {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
        }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<TutorError> for Directive {
    fn from(err: TutorError) -> Self {
        Directive::text(err.to_string())
    }
}

/// Resolves tutor tool calls into directives.
///
/// Holds only the shared content; the per-session state and voice session
/// are passed into each call.
#[derive(Debug, Clone)]
pub struct DirectiveResolver {
    store: Arc<ContentStore>,
}

impl DirectiveResolver {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Selects a topic. Unknown ids produce a directive listing every
    /// available id and leave the state untouched.
    pub fn select_topic(&self, state: &mut TutorState, requested_id: &str) -> Directive {
        match state.select_topic(&self.store, requested_id) {
            Ok(topic) => {
                info!(topic = %topic.id, "Topic selected");
                Directive::text(format!(
                    "Topic set to {}! Do you want to Learn, take a Quiz, or Teach it back?",
                    topic.title
                ))
            }
            Err(e) => {
                debug!(requested = %requested_id, error = %e, "Topic selection failed");
                e.into()
            }
        }
    }

    /// Switches mode and restyles the voice to match.
    ///
    /// Without a voice session the instruction is still produced, the voice
    /// update is skipped and a note is appended.
    pub fn set_mode(
        &self,
        state: &mut TutorState,
        requested_mode: &str,
        session: Option<&dyn VoiceSession>,
    ) -> Directive {
        let mode = match state.set_mode(requested_mode) {
            Ok(mode) => mode,
            Err(e) => {
                debug!(requested = %requested_mode, "Invalid mode requested");
                return e.into();
            }
        };

        let instruction = self.instruction_for(state, mode);
        let voice = mode.voice_style();
        let mut text = format!("Switched to {mode}. {instruction}");

        match session {
            Some(session) => session.update_voice_style(&voice),
            None => {
                warn!(%mode, "No voice session bound; voice style not updated");
                text.push(' ');
                text.push_str(&TutorError::MissingSessionHandle.to_string());
            }
        }

        info!(%mode, voice = %voice.voice_id, style = %voice.style, "Switching mode");
        Directive {
            text,
            voice: Some(voice),
        }
    }

    /// Asks the LLM to grade the user's explanation. Never touches state.
    pub fn evaluate(&self, explanation: &str) -> Directive {
        info!(bytes = explanation.len(), "Evaluating explanation");
        Directive::text(format!("{EVALUATION_INSTRUCTION} Explanation: {explanation}"))
    }

    fn instruction_for(&self, state: &TutorState, mode: Mode) -> String {
        let topic = state.current_topic();
        match (mode, topic) {
            (Mode::Learn, Some(topic)) => format!("Explain: {}", topic.summary),
            (Mode::Quiz, Some(topic)) => format!("Ask: {}", topic.sample_question),
            (Mode::Learn | Mode::Quiz, None) if self.store.is_empty() => {
                TutorError::NoTopicsAvailable.to_string()
            }
            (Mode::Learn | Mode::Quiz, None) => TutorError::NoTopicSelected {
                available: self.store.id_list(),
            }
            .to_string(),
            (Mode::TeachBack, _) => TEACH_BACK_INSTRUCTION.to_string(),
        }
    }
}
