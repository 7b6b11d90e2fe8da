//! Hosts a tutor session over MCP on stdin/stdout.
//!
//! The host application (the speech pipeline and LLM) connects as the MCP
//! client and calls the tutor's tools. Voice style changes requested by those
//! tools are drained from the session and handed to the TTS sink.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use rmcp::{ServiceExt, transport::stdio};
use tokio::sync::watch;
use tracing::{Instrument, info};
use tutor_core::{
    VoiceStyle,
    agent::AgentDefinition,
    worker::{AgentRuntime, AgentSession},
};

/// Receives voice style changes for the session's TTS.
pub trait TtsSink: Send + 'static {
    fn apply(&mut self, style: VoiceStyle);
}

/// Default sink: the TTS lives in the host process, so style changes are
/// logged for it to pick up.
#[derive(Debug, Default)]
pub struct LoggingTtsSink;

impl TtsSink for LoggingTtsSink {
    fn apply(&mut self, style: VoiceStyle) {
        info!(voice = %style.voice_id, style = %style.style, "TTS voice style updated");
    }
}

/// Applies the latest voice style to `sink` whenever it changes, until the
/// sender is dropped. Styles superseded before the sink catches up are skipped.
pub async fn forward_voice_updates<S: TtsSink>(
    mut updates: watch::Receiver<VoiceStyle>,
    mut sink: S,
) {
    while updates.changed().await.is_ok() {
        let style = updates.borrow_and_update().clone();
        sink.apply(style);
    }
}

/// Serves the started session's tools over stdio.
pub struct StdioRuntime<S = LoggingTtsSink> {
    session: Option<(AgentSession, String)>,
    sink: Option<S>,
}

impl StdioRuntime {
    pub fn new() -> Self {
        Self::with_sink(LoggingTtsSink)
    }
}

impl Default for StdioRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TtsSink> StdioRuntime<S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            session: None,
            sink: Some(sink),
        }
    }
}

#[async_trait]
impl<S: TtsSink> AgentRuntime for StdioRuntime<S> {
    async fn start(
        &mut self,
        agent: AgentDefinition,
        session: AgentSession,
        room: &str,
    ) -> Result<()> {
        if self.session.is_some() {
            bail!("Session already started for room '{}'", room);
        }
        info!(
            room = %room,
            tools = ?agent.tools,
            pipeline = %serde_json::to_string(&session.pipeline)?,
            vad = ?session.vad,
            "Agent session started"
        );
        self.session = Some((session, room.to_string()));
        Ok(())
    }

    async fn connect(&mut self) -> Result<()> {
        let (session, room) = self
            .session
            .take()
            .context("connect called before start")?;
        let sink = self.sink.take().context("Runtime has already been connected")?;

        let voice_task = tokio::spawn(
            forward_voice_updates(session.voice_updates, sink)
                .instrument(tracing::info_span!("tts", %room)),
        );

        info!(%room, "Serving tutor tools over stdio");
        let service = session
            .tools
            .serve(stdio())
            .await
            .context("Failed to initialize MCP session")?;
        let reason = service.waiting().await?;
        info!(?reason, "MCP session closed");

        voice_task.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tutor_core::{
        ContentStore, Mode, TutorState, default_topics,
        session::{SessionConfig, VadConfig},
    };

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<VoiceStyle>>>);

    impl TtsSink for RecordingSink {
        fn apply(&mut self, style: VoiceStyle) {
            self.0.lock().unwrap().push(style);
        }
    }

    fn session() -> (AgentSession, watch::Sender<VoiceStyle>) {
        let (tx, voice_updates) = watch::channel(Mode::Learn.voice_style());
        let tools = tutor_core::agent::TutorService::new(
            Arc::new(ContentStore::from_topics(default_topics())),
            Arc::new(tokio::sync::Mutex::new(TutorState::new())),
            None,
            None,
        );
        let session = AgentSession {
            pipeline: SessionConfig::default(),
            vad: Arc::new(VadConfig::default()),
            tools,
            voice_updates,
        };
        (session, tx)
    }

    #[tokio::test]
    async fn forwards_latest_update_until_closed() {
        let (tx, rx) = watch::channel(Mode::Learn.voice_style());
        let sink = RecordingSink::default();
        tx.send_replace(Mode::Quiz.voice_style());
        tx.send_replace(Mode::TeachBack.voice_style());
        drop(tx);

        forward_voice_updates(rx, sink.clone()).await;

        assert_eq!(*sink.0.lock().unwrap(), vec![Mode::TeachBack.voice_style()]);
    }

    #[tokio::test]
    async fn sink_follows_each_switch_it_observes() {
        let (tx, rx) = watch::channel(Mode::Learn.voice_style());
        let sink = RecordingSink::default();
        let task = tokio::spawn(forward_voice_updates(rx, sink.clone()));

        tx.send_replace(Mode::Quiz.voice_style());
        while sink.0.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        tx.send_replace(Mode::Learn.voice_style());
        drop(tx);
        task.await.unwrap();

        let applied = sink.0.lock().unwrap();
        assert_eq!(applied.first(), Some(&Mode::Quiz.voice_style()));
        assert_eq!(applied.last(), Some(&Mode::Learn.voice_style()));
    }

    #[tokio::test]
    async fn connect_before_start_fails() {
        let mut runtime: StdioRuntime = StdioRuntime::default();

        let err = runtime.connect().await.unwrap_err();

        assert!(err.to_string().contains("connect called before start"));
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let mut runtime = StdioRuntime::with_sink(RecordingSink::default());
        let store = ContentStore::from_topics(default_topics());
        let agent = AgentDefinition::tutor(&store);

        let (first, _tx1) = session();
        let (second, _tx2) = session();
        runtime.start(agent.clone(), first, "room").await.unwrap();
        let err = runtime.start(agent, second, "room").await.unwrap_err();

        assert!(err.to_string().contains("already started"));
    }
}
