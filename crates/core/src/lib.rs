pub mod agent;
pub mod content;
pub mod directive;
pub mod error;
pub mod mode;
pub mod session;
pub mod state;
pub mod topic;
pub mod worker;

pub use content::{ContentLoadError, ContentStore};
pub use directive::{Directive, DirectiveResolver, VoiceSession};
pub use error::TutorError;
pub use mode::{Mode, VoiceStyle};
pub use state::TutorState;
pub use topic::{TopicRecord, default_topics};
