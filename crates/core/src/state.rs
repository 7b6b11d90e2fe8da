use crate::{content::ContentStore, error::TutorError, mode::Mode, topic::TopicRecord};
use serde::Serialize;

/// Per-session tutoring state.
///
/// The selected topic and the mode are independent: choosing a topic never
/// changes the mode and switching modes never clears the topic. There is no
/// terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TutorState {
    current_topic: Option<TopicRecord>,
    mode: Mode,
}

impl TutorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_topic_id(&self) -> Option<&str> {
        self.current_topic.as_ref().map(|topic| topic.id.as_str())
    }

    pub fn current_topic(&self) -> Option<&TopicRecord> {
        self.current_topic.as_ref()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Selects the topic whose id matches `requested_id` (lowercased).
    ///
    /// On a miss the state is left untouched.
    pub fn select_topic(
        &mut self,
        store: &ContentStore,
        requested_id: &str,
    ) -> Result<&TopicRecord, TutorError> {
        if store.is_empty() {
            return Err(TutorError::NoTopicsAvailable);
        }
        let normalized = requested_id.to_lowercase();
        let topic = store
            .find(&normalized)
            .ok_or_else(|| TutorError::UnknownTopic {
                requested: requested_id.to_string(),
                available: store.id_list(),
            })?;
        Ok(&*self.current_topic.insert(topic.clone()))
    }

    /// Parses and applies a mode. Unknown modes leave the state untouched.
    pub fn set_mode(&mut self, requested_mode: &str) -> Result<Mode, TutorError> {
        let mode = requested_mode.parse::<Mode>()?;
        self.mode = mode;
        Ok(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::default_topics;

    fn store() -> ContentStore {
        ContentStore::from_topics(default_topics())
    }

    #[test]
    fn starts_without_topic_in_learn_mode() {
        let state = TutorState::new();
        assert_eq!(state.current_topic_id(), None);
        assert!(state.current_topic().is_none());
        assert_eq!(state.mode(), Mode::Learn);
    }

    #[test]
    fn every_stored_id_selects_case_insensitively() {
        let store = store();
        for topic in default_topics() {
            let mut state = TutorState::new();
            let upper = topic.id.to_uppercase();
            let selected = state.select_topic(&store, &upper).unwrap();
            assert_eq!(selected, &topic);
            assert_eq!(state.current_topic_id(), Some(topic.id.as_str()));
        }
    }

    #[test]
    fn unknown_topic_leaves_selection_unchanged() {
        let store = store();
        let mut state = TutorState::new();
        state.select_topic(&store, "css").unwrap();

        let err = state.select_topic(&store, "python").unwrap_err();

        assert_eq!(
            err,
            TutorError::UnknownTopic {
                requested: "python".to_string(),
                available: "html, css, js, frontend".to_string(),
            }
        );
        assert_eq!(state.current_topic_id(), Some("css"));
    }

    #[test]
    fn selecting_again_replaces_topic_but_keeps_mode() {
        let store = store();
        let mut state = TutorState::new();
        state.set_mode("quiz").unwrap();
        state.select_topic(&store, "html").unwrap();
        state.select_topic(&store, "js").unwrap();

        assert_eq!(state.current_topic_id(), Some("js"));
        assert_eq!(state.mode(), Mode::Quiz);
    }

    #[test]
    fn invalid_mode_keeps_previous_mode_and_topic() {
        let store = store();
        let mut state = TutorState::new();
        state.select_topic(&store, "html").unwrap();
        state.set_mode("teach_back").unwrap();

        assert!(state.set_mode("bogus").is_err());
        assert_eq!(state.mode(), Mode::TeachBack);
        assert_eq!(state.current_topic_id(), Some("html"));
    }
}
