/// Recoverable outcomes of the tutor's tool calls.
///
/// None of these end a session. The resolver turns each one into directive
/// text the LLM can relay to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TutorError {
    #[error("Topic not found. Available topics: {available}")]
    UnknownTopic { requested: String, available: String },
    #[error("Invalid mode.")]
    InvalidMode(String),
    #[error("No session found.")]
    MissingSessionHandle,
    #[error("No topic selected yet. Ask the user to choose a topic first. Available topics: {available}")]
    NoTopicSelected { available: String },
    #[error("No topics are available. The course content could not be loaded.")]
    NoTopicsAvailable,
}
