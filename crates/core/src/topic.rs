use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single unit of course content.
///
/// Records are loaded once by the `ContentStore` and never mutated afterwards.
/// The `summary` is read out verbatim in learn mode and the `sample_question`
/// verbatim in quiz mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TopicRecord {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub sample_question: String,
}

impl TopicRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        sample_question: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: summary.into(),
            sample_question: sample_question.into(),
        }
    }
}

/// The web development course written to storage on first run.
pub fn default_topics() -> Vec<TopicRecord> {
    vec![
        TopicRecord::new(
            "html",
            "HTML Basics",
            "HTML (HyperText Markup Language) is used to structure content on the web using tags like <h1>, <p>, <div>, etc.",
            "What does HTML stand for and what is its purpose?",
        ),
        TopicRecord::new(
            "css",
            "CSS Styling",
            "CSS (Cascading Style Sheets) is used to style and design websites including layout, colors, and responsiveness.",
            "What is the role of CSS in web development?",
        ),
        TopicRecord::new(
            "js",
            "JavaScript",
            "JavaScript is a programming language that makes websites interactive. It can modify HTML/CSS dynamically.",
            "Why is JavaScript important in web development?",
        ),
        TopicRecord::new(
            "frontend",
            "Frontend Development",
            "Frontend development focuses on the client-side of websites — what users see and interact with.",
            "Name any two frontend frameworks.",
        ),
    ]
}
