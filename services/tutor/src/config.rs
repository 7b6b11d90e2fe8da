use std::path::PathBuf;
use tracing::Level;
use tutor_core::session::{SessionConfig, TurnDetection};
use tutor_core::VoiceStyle;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub content_path: PathBuf,
    pub room: String,
    pub session: SessionConfig,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Secrets for the speech and LLM providers live in `.env.local` and are
    /// read by the runtime, not here.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env.local in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::from_filename(".env.local").ok();
        }

        let content_path = std::env::var("CONTENT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("webdev_content.json"));

        let room = std::env::var("ROOM_NAME").unwrap_or_else(|_| "tutor-room".to_string());
        if room.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "ROOM_NAME".to_string(),
                "room name must not be empty".to_string(),
            ));
        }

        let mut session = SessionConfig::default();
        if let Ok(model) = std::env::var("STT_MODEL") {
            session.stt.model = model;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            session.llm.model = model;
        }
        let voice_id = std::env::var("TTS_VOICE").unwrap_or(session.tts.voice.voice_id);
        let style = std::env::var("TTS_STYLE").unwrap_or(session.tts.voice.style);
        session.tts.voice = VoiceStyle::new(voice_id, style);

        if let Ok(value) = std::env::var("TURN_DETECTION") {
            session.turn_detection = match value.to_lowercase().as_str() {
                "multilingual" => TurnDetection::Multilingual,
                "english" => TurnDetection::English,
                "vad_only" => TurnDetection::VadOnly,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "TURN_DETECTION".to_string(),
                        format!("'{}' is not one of multilingual, english, vad_only", value),
                    ));
                }
            };
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            content_path,
            room,
            session,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tutor_core::{ContentStore, default_topics};

    fn clear_env_vars() {
        unsafe {
            env::remove_var("CONTENT_PATH");
            env::remove_var("ROOM_NAME");
            env::remove_var("STT_MODEL");
            env::remove_var("LLM_MODEL");
            env::remove_var("TTS_VOICE");
            env::remove_var("TTS_STYLE");
            env::remove_var("TURN_DETECTION");
            env::remove_var("RUST_LOG");
        }
    }

    #[test]
    fn test_config_error_display() {
        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.content_path, PathBuf::from("webdev_content.json"));
        assert_eq!(config.room, "tutor-room");
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("CONTENT_PATH", "/data/course.json");
            env::set_var("ROOM_NAME", "lesson-7");
            env::set_var("STT_MODEL", "nova-2");
            env::set_var("LLM_MODEL", "gemini-2.0-flash");
            env::set_var("TTS_VOICE", "en-US-ken");
            env::set_var("TURN_DETECTION", "English");
            env::set_var("RUST_LOG", "debug");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.content_path, PathBuf::from("/data/course.json"));
        assert_eq!(config.room, "lesson-7");
        assert_eq!(config.session.stt.model, "nova-2");
        assert_eq!(config.session.llm.model, "gemini-2.0-flash");
        assert_eq!(config.session.tts.voice, VoiceStyle::new("en-US-ken", "Promo"));
        assert_eq!(config.session.turn_detection, TurnDetection::English);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    #[serial]
    fn test_configured_content_path_is_bootstrapped() {
        clear_env_vars();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course.json");
        unsafe {
            env::set_var("CONTENT_PATH", &path);
        }

        let config = Config::from_env().expect("Config should load successfully");
        let store = ContentStore::load(&config.content_path, &default_topics());

        assert_eq!(config.content_path, path);
        assert!(path.exists());
        assert_eq!(store.id_list(), "html, css, js, frontend");
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_turn_detection() {
        clear_env_vars();
        unsafe {
            env::set_var("TURN_DETECTION", "telepathy");
        }

        let err = Config::from_env().unwrap_err();
        let ConfigError::InvalidValue(var, _) = err;
        assert_eq!(var, "TURN_DETECTION");
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        let ConfigError::InvalidValue(var, _) = err;
        assert_eq!(var, "RUST_LOG");
    }

    #[test]
    #[serial]
    fn test_config_empty_room_name() {
        clear_env_vars();
        unsafe {
            env::set_var("ROOM_NAME", "  ");
        }

        let err = Config::from_env().unwrap_err();
        let ConfigError::InvalidValue(var, _) = err;
        assert_eq!(var, "ROOM_NAME");
    }
}
