//! Worker Process and Job Entrypoint
//!
//! A worker process is prewarmed once, then runs one job per room. Each job
//! gets a fresh `TutorState` and a voice handle bound explicitly into its
//! tool service; only the content store and the prewarmed VAD are shared.

use crate::{
    agent::{AgentDefinition, TutorService},
    content::ContentStore,
    directive::VoiceSession,
    mode::VoiceStyle,
    session::{SessionConfig, VadConfig},
    state::TutorState,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::info;

/// Cache key of the prewarmed VAD.
pub const VAD_KEY: &str = "vad";

type CacheEntry = Arc<dyn Any + Send + Sync>;

/// Process-scoped cache shared by every job on a worker.
#[derive(Default)]
pub struct JobProcess {
    userdata: Mutex<HashMap<String, CacheEntry>>,
}

impl JobProcess {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.entries().insert(key.into(), Arc::new(value));
    }

    /// Returns the entry under `key` if it exists and has type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.entries().get(key).cloned()?.downcast::<T>().ok()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.userdata.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Loads the VAD into the process cache ahead of the first job.
pub fn prewarm(process: &JobProcess, vad: VadConfig) {
    info!(sample_rate = vad.sample_rate, "Prewarming VAD");
    process.insert(VAD_KEY, vad);
}

/// One job: a room to join on a prewarmed worker process.
#[derive(Clone)]
pub struct JobContext {
    pub room: String,
    pub process: Arc<JobProcess>,
}

/// Publishes voice style updates to the runtime's TTS.
///
/// Only the latest style is kept: the TTS always ends up on the voice of the
/// most recent mode switch, however many switches it missed.
pub struct ChannelVoiceSession {
    tx: watch::Sender<VoiceStyle>,
}

impl ChannelVoiceSession {
    pub fn new(tx: watch::Sender<VoiceStyle>) -> Self {
        Self { tx }
    }
}

impl VoiceSession for ChannelVoiceSession {
    fn update_voice_style(&self, style: &VoiceStyle) {
        self.tx.send_replace(style.clone());
    }
}

/// Everything the runtime needs to run one tutoring conversation.
pub struct AgentSession {
    pub pipeline: SessionConfig,
    pub vad: Arc<VadConfig>,
    pub tools: TutorService,
    /// The voice style of the latest mode switch.
    pub voice_updates: watch::Receiver<VoiceStyle>,
}

/// The hosted agent session runtime.
#[async_trait]
pub trait AgentRuntime: Send {
    /// Binds the agent and its session to a room.
    async fn start(
        &mut self,
        agent: AgentDefinition,
        session: AgentSession,
        room: &str,
    ) -> Result<()>;

    /// Joins the room and runs until the conversation ends.
    async fn connect(&mut self) -> Result<()>;
}

/// Runs a single tutoring job on `runtime`.
pub async fn entrypoint<R: AgentRuntime>(
    ctx: &JobContext,
    pipeline: SessionConfig,
    store: Arc<ContentStore>,
    runtime: &mut R,
) -> Result<()> {
    info!(room = %ctx.room, topics = store.len(), "Starting tutor session");

    let vad = ctx
        .process
        .get::<VadConfig>(VAD_KEY)
        .context("VAD was not prewarmed on this worker process")?;

    let (voice_tx, voice_updates) = watch::channel(pipeline.tts.voice.clone());
    let voice_session: Arc<dyn VoiceSession> = Arc::new(ChannelVoiceSession::new(voice_tx));
    let tools = TutorService::new(
        store,
        Arc::new(tokio::sync::Mutex::new(TutorState::new())),
        Some(voice_session),
        None,
    );
    let agent = tools.agent_definition().clone();

    let session = AgentSession {
        pipeline,
        vad,
        tools,
        voice_updates,
    };

    runtime
        .start(agent, session, &ctx.room)
        .await
        .context("Failed to start agent session")?;
    runtime.connect().await.context("Agent session connection failed")?;
    info!(room = %ctx.room, "Tutor session finished");
    Ok(())
}
