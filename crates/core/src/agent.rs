//! Tutor Agent Service
//!
//! This module exposes the tutor's three tools (topic selection, mode switch
//! and explanation evaluation) over the Model Context Protocol (MCP), and
//! builds the persona instructions the hosting runtime hands to the LLM.

use crate::{
    content::ContentStore,
    directive::{DirectiveResolver, VoiceSession},
    state::TutorState,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};

/// Names of the tools registered by [`TutorService`].
pub const TOOL_NAMES: [&str; 3] = ["select_topic", "set_learning_mode", "evaluate_teaching"];

// --- Agent Definition ---

/// What the runtime needs to stand up the tutor agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDefinition {
    /// System instructions for the LLM.
    pub instructions: String,
    /// Tools the LLM may call.
    pub tools: Vec<String>,
}

impl AgentDefinition {
    /// Builds the web development tutor persona over the loaded topics.
    pub fn tutor(store: &ContentStore) -> Self {
        Self {
            instructions: tutor_instructions(store),
            tools: TOOL_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

fn tutor_instructions(store: &ContentStore) -> String {
    let topic_list = store
        .topics()
        .iter()
        .map(|topic| format!("{} ({})", topic.id, topic.title))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a Web Development Tutor.\n\
         \n\
         TOPICS: {topic_list}\n\
         \n\
         Modes:\n\
         - Learn: Explain the topic\n\
         - Quiz: Ask a question\n\
         - Teach_back: Ask the user to teach you\n\
         \n\
         Always ask which topic the user wants first."
    )
}

// --- Data Structures for Tools ---

#[derive(Deserialize, JsonSchema, Debug)]
pub struct SelectTopicArgs {
    #[schemars(description = "The ID of the topic to study (HTML, CSS, JS, frontend)")]
    pub topic_id: String,
}

#[derive(Deserialize, JsonSchema, Debug)]
pub struct SetLearningModeArgs {
    #[schemars(description = "Mode to switch to: learn, quiz, teach_back")]
    pub mode: String,
}

#[derive(Deserialize, JsonSchema, Debug)]
pub struct EvaluateTeachingArgs {
    #[schemars(description = "The user's explanation of the current topic")]
    pub user_explanation: String,
}

// --- Service and Handler Implementation ---

/// One tutoring session's tool surface.
///
/// Every session gets its own `TutorState`; the content is shared read-only
/// across sessions. The mutex serializes tool calls within the session.
pub struct TutorService {
    resolver: DirectiveResolver,
    agent: AgentDefinition,
    /// This session's tutoring state.
    pub tutor_state: Arc<Mutex<TutorState>>,
    voice_session: Option<Arc<dyn VoiceSession>>,
    /// Optional channel for broadcasting state changes to subscribers.
    pub state_tx: Option<mpsc::Sender<TutorState>>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for TutorService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.agent.instructions.clone()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tool_router]
impl TutorService {
    pub fn new(
        store: Arc<ContentStore>,
        tutor_state: Arc<Mutex<TutorState>>,
        voice_session: Option<Arc<dyn VoiceSession>>,
        state_tx: Option<mpsc::Sender<TutorState>>,
    ) -> Self {
        Self {
            agent: AgentDefinition::tutor(&store),
            resolver: DirectiveResolver::new(store),
            tutor_state,
            voice_session,
            state_tx,
            tool_router: Self::tool_router(),
        }
    }

    pub fn agent_definition(&self) -> &AgentDefinition {
        &self.agent
    }

    #[tool(description = "Select the topic to study by its ID.")]
    pub async fn select_topic(&self, args: Parameters<SelectTopicArgs>) -> Result<String, String> {
        info!(args = ?args.0, "Executing tool 'select_topic'");
        let mut state = self.tutor_state.lock().await;
        let directive = self.resolver.select_topic(&mut state, &args.0.topic_id);
        self.broadcast(&state).await;
        Ok(directive.into_text())
    }

    #[tool(description = "Switch the learning mode: learn, quiz or teach_back.")]
    pub async fn set_learning_mode(
        &self,
        args: Parameters<SetLearningModeArgs>,
    ) -> Result<String, String> {
        info!(args = ?args.0, "Executing tool 'set_learning_mode'");
        let mut state = self.tutor_state.lock().await;
        let directive =
            self.resolver
                .set_mode(&mut state, &args.0.mode, self.voice_session.as_deref());
        self.broadcast(&state).await;
        Ok(directive.into_text())
    }

    #[tool(description = "Evaluate the user's teach-back explanation of the current topic.")]
    pub async fn evaluate_teaching(
        &self,
        args: Parameters<EvaluateTeachingArgs>,
    ) -> Result<String, String> {
        info!("Executing tool 'evaluate_teaching'");
        Ok(self.resolver.evaluate(&args.0.user_explanation).into_text())
    }

    async fn broadcast(&self, state: &TutorState) {
        if let Some(tx) = &self.state_tx {
            if tx.send(state.clone()).await.is_err() {
                warn!("Failed to broadcast state update: receiver dropped.");
            }
        }
    }
}
