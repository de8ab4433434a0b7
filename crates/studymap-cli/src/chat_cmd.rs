//! One-shot chat from the command line.

use anyhow::Result;
use std::time::Duration;

use studymap_core::completion::OpenAiCompletion;
use studymap_core::ChatRouter;

use crate::config::CompletionSection;

const BACKEND_TIMEOUT: Duration = Duration::from_secs(20);

/// Build a router from the resolved config: live backend when an API key
/// is configured, local-only otherwise.
pub fn build_chat_router(completion: Option<&CompletionSection>) -> ChatRouter {
    match completion {
        Some(section) => {
            let backend = match (&section.endpoint, &section.model) {
                (Some(endpoint), Some(model)) => {
                    OpenAiCompletion::with_endpoint(&section.api_key, endpoint, model)
                }
                (Some(endpoint), None) => {
                    OpenAiCompletion::with_endpoint(&section.api_key, endpoint, "gpt-3.5-turbo")
                }
                (None, Some(model)) => OpenAiCompletion::with_endpoint(
                    &section.api_key,
                    "https://api.openai.com/v1/chat/completions",
                    model,
                ),
                (None, None) => OpenAiCompletion::new(&section.api_key),
            };
            ChatRouter::with_backend(Box::new(backend), BACKEND_TIMEOUT)
        }
        None => ChatRouter::local(),
    }
}

pub async fn run_chat(completion: Option<&CompletionSection>, message: &str) -> Result<()> {
    let router = build_chat_router(completion);
    let reply = router.respond(message, &[]).await;
    println!("{reply}");
    Ok(())
}
