//! Voice pipeline configuration handed to the agent session runtime.
//!
//! The runtime owns the actual STT, LLM, TTS, turn detection and VAD
//! implementations; these types only describe which ones to use.

use crate::mode::{Mode, VoiceStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SttConfig {
    pub provider: String,
    pub model: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            provider: "deepgram".to_string(),
            model: "nova-3".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsConfig {
    pub provider: String,
    /// The voice a session starts with, before any mode switch.
    pub voice: VoiceStyle,
    pub text_pacing: bool,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: "murf".to_string(),
            voice: Mode::default().voice_style(),
            text_pacing: true,
        }
    }
}

/// End-of-turn detection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDetection {
    #[default]
    Multilingual,
    English,
    /// Rely on VAD silence alone.
    VadOnly,
}

/// Silero VAD parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VadConfig {
    pub sample_rate: u32,
    pub activation_threshold: f32,
    pub min_speech_duration_ms: u64,
    pub min_silence_duration_ms: u64,
    pub prefix_padding_ms: u64,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            activation_threshold: 0.5,
            min_speech_duration_ms: 50,
            min_silence_duration_ms: 550,
            prefix_padding_ms: 500,
        }
    }
}

/// Noise cancellation applied to room input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseCancellation {
    /// Background voice cancellation.
    #[default]
    #[serde(rename = "BVC")]
    Bvc,
    #[serde(rename = "NC")]
    Nc,
    #[serde(rename = "none")]
    Disabled,
}

/// Options for the runtime's room input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomInputOptions {
    pub noise_cancellation: NoiseCancellation,
}

/// The full speech pipeline for one agent session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub stt: SttConfig,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub turn_detection: TurnDetection,
    pub room_input: RoomInputOptions,
}
