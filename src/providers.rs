//! Backend capability traits consumed by the dispatcher.
//!
//! The dispatcher depends on the two AI backends only through these narrow
//! contracts, so tests substitute in-memory fakes and the state machine stays
//! deterministic without network access.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Text completion backend with per-user conversation memory.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Discards any prior conversation memory for the user. Idempotent.
    async fn start_new_conversation(&self, user_id: i64);

    /// Appends `text` to the user's conversation, completes against the
    /// accumulated history and returns the assistant reply.
    ///
    /// The user's turn stays recorded even when the backend call fails; only
    /// the assistant turn is withheld on failure. Deadlines are imposed by
    /// the caller.
    async fn complete(&self, user_id: i64, text: &str) -> Result<String>;

    /// Rewrites free-form user text into a prompt suitable for the image
    /// backend. Does not touch conversation memory.
    async fn generate_image_prompt(&self, text: &str) -> Result<String>;
}

/// Parameters for one image generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub ratio: String,
}

/// Image generation backend. A single blocking call: the remote side is asked
/// to finish the generation before responding.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Submits the prompt and returns the URL of the generated image.
    async fn generate_image(&self, request: &ImageRequest) -> Result<String>;
}
