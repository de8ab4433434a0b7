//! The chat front door: route a message to a narrative roadmap, a canned
//! reply, or a live completion backend.
//!
//! A configured backend is always tried first; any failure or timeout
//! falls back to the local path, so chat never errors toward the user.

use std::time::Duration;

use rand::Rng as _;

use crate::completion::{ChatMessage, Completion};

pub mod intent;
pub mod narrative;

const SYSTEM_PROMPT: &str = "You are a study planning assistant. Help users build \
study roadmaps for exams, certifications, job interviews, and technical skills. \
Keep answers practical and structured.";

const MAX_TOKENS: u32 = 1024;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Canned small-talk replies for messages that are not roadmap requests.
const CANNED_REPLIES: &[&str] = &[
    "I can help you build a study roadmap! Tell me what you're preparing for - \
     a board exam, a competitive exam, a company interview, a certification, \
     or a skill you want to learn.",
    "Happy to help with your studies! Ask me for a roadmap, a syllabus \
     breakdown, or a preparation plan for any exam, interview, or skill.",
];

type ReplyPicker = Box<dyn Fn(usize) -> usize + Send + Sync>;

/// Routes chat messages; see the module docs for the decision order.
pub struct ChatRouter {
    backend: Option<Box<dyn Completion>>,
    timeout: Duration,
    picker: ReplyPicker,
}

impl ChatRouter {
    /// A router with no backend: every message is answered locally.
    pub fn local() -> Self {
        Self {
            backend: None,
            timeout: DEFAULT_TIMEOUT,
            picker: Box::new(|n| rand::rng().random_range(0..n)),
        }
    }

    /// A router that tries `backend` first and falls back locally.
    pub fn with_backend(backend: Box<dyn Completion>, timeout: Duration) -> Self {
        Self {
            backend: Some(backend),
            timeout,
            ..Self::local()
        }
    }

    /// Replace the canned-reply picker. Tests use this for determinism.
    pub fn with_picker(mut self, picker: ReplyPicker) -> Self {
        self.picker = picker;
        self
    }

    /// Answer a message. Infallible: backend problems degrade to the local
    /// path rather than surfacing.
    pub async fn respond(&self, message: &str, history: &[ChatMessage]) -> String {
        if let Some(backend) = &self.backend {
            let mut transcript = Vec::with_capacity(history.len() + 2);
            transcript.push(ChatMessage::system(SYSTEM_PROMPT));
            transcript.extend_from_slice(history);
            transcript.push(ChatMessage::user(message));

            match tokio::time::timeout(self.timeout, backend.complete(&transcript, MAX_TOKENS))
                .await
            {
                // An empty reply is as useless as an error; answer locally.
                Ok(Ok(reply)) if !reply.trim().is_empty() => return reply,
                Ok(Ok(_)) => {
                    tracing::warn!(backend = backend.name(), "completion returned an empty reply, answering locally");
                }
                Ok(Err(e)) => {
                    tracing::warn!(backend = backend.name(), error = %e, "completion failed, answering locally");
                }
                Err(_) => {
                    tracing::warn!(backend = backend.name(), timeout = ?self.timeout, "completion timed out, answering locally");
                }
            }
        }

        self.respond_locally(message)
    }

    fn respond_locally(&self, message: &str) -> String {
        if intent::is_roadmap_request(message) {
            narrative::reply_for(message)
        } else {
            let i = (self.picker)(CANNED_REPLIES.len()).min(CANNED_REPLIES.len() - 1);
            CANNED_REPLIES[i].to_owned()
        }
    }
}
