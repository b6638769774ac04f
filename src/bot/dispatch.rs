//! Session state machine routing inbound events to the AI backends.
//!
//! [`Dispatcher::dispatch`] is deterministic given the session state, the
//! event and the backend results; all transport I/O stays in
//! `message_handler`, all backend I/O behind the provider traits.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::providers::{CompletionProvider, ImageProvider, ImageRequest};
use crate::session::{Mode, SessionStore};
use crate::texts;

/// Telegram rejects messages longer than 4096 chars; reply text is split
/// into chunks of at most this many characters.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Aspect ratio requested for every generated image.
pub const ASPECT_RATIO: &str = "16:9";

/// A recognized inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The `/start` command.
    Start,
    /// Main menu selection entering chat mode.
    NewChat,
    /// Main menu selection entering image generation mode.
    ImageGeneration,
    /// The back button, returning to the main menu.
    Back,
    /// Anything else, routed by the current mode.
    Text(String),
}

impl Event {
    /// Classifies raw message text. Labels match exactly and case-sensitively.
    pub fn parse(text: &str) -> Event {
        match text {
            "/start" => Event::Start,
            texts::BTN_NEW_CHAT => Event::NewChat,
            texts::BTN_IMAGE_GENERATION => Event::ImageGeneration,
            texts::BTN_BACK => Event::Back,
            _ => Event::Text(text.to_string()),
        }
    }
}

/// Which reply keyboard to attach to an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Two buttons: new chat, image generation.
    MainMenu,
    /// Single back button.
    Back,
}

/// An outbound reply instruction for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text message.
    Text(String),
    /// Text message with a reply keyboard attached.
    Keyboard { text: String, keyboard: Keyboard },
    /// Photo message referencing a generated image by URL.
    Image(String),
}

impl Reply {
    fn keyboard(text: &str, keyboard: Keyboard) -> Reply {
        Reply::Keyboard {
            text: text.to_string(),
            keyboard,
        }
    }
}

/// Splits reply text into chunks of at most [`MAX_MESSAGE_LEN`] characters.
///
/// Chunks are contiguous, ordered and non-overlapping; their concatenation
/// is exactly the input. Boundaries fall on character boundaries, so
/// multibyte text never gets torn mid-character.
pub fn split_message(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(MAX_MESSAGE_LEN)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        chunks.push(rest[..split].to_string());
        rest = &rest[split..];
    }

    chunks
}

/// Routes each inbound event according to the user's current mode.
pub struct Dispatcher {
    sessions: SessionStore,
    completion: Arc<dyn CompletionProvider>,
    image: Arc<dyn ImageProvider>,
    chat_timeout: Duration,
    image_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        sessions: SessionStore,
        completion: Arc<dyn CompletionProvider>,
        image: Arc<dyn ImageProvider>,
        chat_timeout: Duration,
        image_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            completion,
            image,
            chat_timeout,
            image_timeout,
        }
    }

    /// Current mode of the user, `Idle` for unknown users.
    pub fn mode(&self, user_id: i64) -> Mode {
        self.sessions.mode(user_id)
    }

    /// Processes one inbound event and returns the replies to send, in order.
    ///
    /// Backend failures never escape: they are logged and mapped to the fixed
    /// apology reply, and the session mode is left untouched.
    pub async fn dispatch(&self, user_id: i64, event: Event) -> Vec<Reply> {
        match event {
            Event::Start | Event::Back => {
                self.sessions.set_mode(user_id, Mode::Idle);
                vec![Reply::keyboard(texts::CHOOSE_ACTION, Keyboard::MainMenu)]
            }
            Event::NewChat => match self.sessions.mode(user_id) {
                Mode::Idle => {
                    self.completion.start_new_conversation(user_id).await;
                    self.sessions.set_mode(user_id, Mode::ChatActive);
                    info!(user_id, "entering chat mode");
                    vec![Reply::keyboard(texts::NEW_CHAT_STARTED, Keyboard::Back)]
                }
                mode => {
                    debug!(user_id, ?mode, "ignoring menu selection outside main menu");
                    Vec::new()
                }
            },
            Event::ImageGeneration => match self.sessions.mode(user_id) {
                Mode::Idle => {
                    self.completion.start_new_conversation(user_id).await;
                    self.sessions.set_mode(user_id, Mode::ImageActive);
                    info!(user_id, "entering image generation mode");
                    vec![Reply::keyboard(texts::IMAGE_MODE_ENABLED, Keyboard::Back)]
                }
                mode => {
                    debug!(user_id, ?mode, "ignoring menu selection outside main menu");
                    Vec::new()
                }
            },
            Event::Text(text) => match self.sessions.mode(user_id) {
                Mode::Idle => vec![Reply::Text(texts::IDLE_FALLBACK.to_string())],
                Mode::ChatActive => self.handle_chat_text(user_id, &text).await,
                Mode::ImageActive => self.handle_image_text(user_id, &text).await,
            },
        }
    }

    async fn handle_chat_text(&self, user_id: i64, text: &str) -> Vec<Reply> {
        match timeout(self.chat_timeout, self.completion.complete(user_id, text)).await {
            Ok(Ok(reply)) => split_message(&reply).into_iter().map(Reply::Text).collect(),
            Ok(Err(e)) => {
                error!(user_id, error = %e, "chat completion failed");
                vec![Reply::Text(texts::BACKEND_APOLOGY.to_string())]
            }
            Err(_) => {
                error!(
                    user_id,
                    timeout_secs = self.chat_timeout.as_secs(),
                    "chat completion timed out"
                );
                vec![Reply::Text(texts::BACKEND_APOLOGY.to_string())]
            }
        }
    }

    async fn handle_image_text(&self, user_id: i64, text: &str) -> Vec<Reply> {
        let generation = async {
            let prompt = self.completion.generate_image_prompt(text).await?;
            debug!(user_id, prompt = %prompt, "rewrote text into image prompt");

            self.image
                .generate_image(&ImageRequest {
                    prompt,
                    ratio: ASPECT_RATIO.to_string(),
                })
                .await
        };

        match timeout(self.image_timeout, generation).await {
            Ok(Ok(url)) => {
                info!(user_id, "image generated");
                vec![Reply::Image(url)]
            }
            Ok(Err(e)) => {
                error!(user_id, error = %e, "image generation failed");
                vec![Reply::Text(texts::BACKEND_APOLOGY.to_string())]
            }
            Err(_) => {
                error!(
                    user_id,
                    timeout_secs = self.image_timeout.as_secs(),
                    "image generation timed out"
                );
                vec![Reply::Text(texts::BACKEND_APOLOGY.to_string())]
            }
        }
    }
}
