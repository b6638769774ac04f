//! OpenAI-backed completion service with per-user conversation memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

use crate::config::OpenAiConfig;
use crate::providers::CompletionProvider;

/// Instruction used to turn free text into an image generation prompt.
const IMAGE_PROMPT_INSTRUCTION: &str = "Rewrite the user's request as a short, vivid English \
prompt for a text-to-image model. Reply with the prompt only.";

/// Masks an API key for logging: first 7 chars + "***" + last 4 chars.
/// Keys of 11 chars or fewer are fully masked.
pub fn mask_token(token: &str) -> String {
    if token.len() <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[token.len() - 4..])
    }
}

/// Ordered per-user turn history used as completion context.
///
/// Appends for one user serialize on that user's async mutex; different
/// users never contend with each other beyond the brief map lookup.
#[derive(Default)]
pub struct ConversationMemory {
    turns: Mutex<HashMap<i64, Arc<AsyncMutex<Vec<ChatCompletionRequestMessage>>>>>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the user's history with an empty one. Idempotent.
    pub fn reset(&self, user_id: i64) {
        self.turns
            .lock()
            .unwrap()
            .insert(user_id, Arc::default());
    }

    /// History handle for the user, created empty on first use.
    pub fn turns_for(&self, user_id: i64) -> Arc<AsyncMutex<Vec<ChatCompletionRequestMessage>>> {
        Arc::clone(self.turns.lock().unwrap().entry(user_id).or_default())
    }
}

/// Chat completion service backed by the OpenAI API.
pub struct OpenAiService {
    client: Client<OpenAIConfig>,
    model: String,
    memory: ConversationMemory,
}

impl OpenAiService {
    /// Builds the service. Fails when the API key is empty.
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let OpenAiConfig { api_key, model } = config;
        if api_key.trim().is_empty() {
            bail!("OpenAI API key required");
        }

        let client =
            Client::with_config(OpenAIConfig::new().with_api_key(api_key.clone()));

        info!(
            api_key = %mask_token(api_key),
            model = %model,
            "OpenAI completion service initialized"
        );

        Ok(Self {
            client,
            model: model.clone(),
            memory: ConversationMemory::new(),
        })
    }

    async fn create_completion(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .context("completion response contained no choices")
    }
}

#[async_trait]
impl CompletionProvider for OpenAiService {
    async fn start_new_conversation(&self, user_id: i64) {
        debug!(user_id, "resetting conversation memory");
        self.memory.reset(user_id);
    }

    async fn complete(&self, user_id: i64, text: &str) -> Result<String> {
        let turns = self.memory.turns_for(user_id);
        let mut turns = turns.lock().await;

        // The user's turn is recorded before the backend call: it was already
        // sent, so it belongs to the history whether the call succeeds or not.
        let user_message: ChatCompletionRequestMessage =
            ChatCompletionRequestUserMessageArgs::default()
                .content(text)
                .build()?
                .into();
        turns.push(user_message);

        debug!(user_id, history_len = turns.len(), "requesting chat completion");
        let reply = self.create_completion(turns.clone()).await?;

        let assistant_message: ChatCompletionRequestMessage =
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(reply.clone())
                .build()?
                .into();
        turns.push(assistant_message);

        Ok(reply)
    }

    async fn generate_image_prompt(&self, text: &str) -> Result<String> {
        let system: ChatCompletionRequestMessage =
            ChatCompletionRequestSystemMessageArgs::default()
                .content(IMAGE_PROMPT_INSTRUCTION)
                .build()?
                .into();
        let user: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()?
            .into();

        self.create_completion(vec![system, user]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_turn(text: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()
            .unwrap()
            .into()
    }

    /// Test that short keys are fully masked
    #[test]
    fn test_mask_token_short() {
        assert_eq!(mask_token(""), "***");
        assert_eq!(mask_token("sk-short"), "***");
    }

    /// Test that long keys keep only head and tail
    #[test]
    fn test_mask_token_long() {
        assert_eq!(mask_token("sk-abcdefghijklmnop"), "sk-abcd***mnop");
    }

    /// Test that resetting twice in a row leaves memory empty both times
    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let memory = ConversationMemory::new();

        memory.reset(1);
        assert!(memory.turns_for(1).lock().await.is_empty());

        memory.reset(1);
        assert!(memory.turns_for(1).lock().await.is_empty());
    }

    /// Test that reset discards previously recorded turns
    #[tokio::test]
    async fn test_reset_discards_history() {
        let memory = ConversationMemory::new();

        memory.turns_for(7).lock().await.push(user_turn("hello"));
        assert_eq!(memory.turns_for(7).lock().await.len(), 1);

        memory.reset(7);
        assert!(memory.turns_for(7).lock().await.is_empty());
    }

    /// Test that histories are isolated per user
    #[tokio::test]
    async fn test_memory_isolated_per_user() {
        let memory = ConversationMemory::new();

        memory.turns_for(1).lock().await.push(user_turn("from user 1"));

        assert!(memory.turns_for(2).lock().await.is_empty());
        assert_eq!(memory.turns_for(1).lock().await.len(), 1);
    }
}
