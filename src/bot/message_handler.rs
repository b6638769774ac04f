//! Message Handler module translating Telegram messages into dispatcher
//! events and rendering the resulting replies.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InputFile};
use tracing::{debug, warn};

use super::dispatch::{Dispatcher, Event, Reply};
use super::ui_builder::reply_keyboard;
use crate::session::Mode;

/// Handles one incoming message end to end.
///
/// Non-text messages are ignored; everything else is classified, dispatched
/// and answered. Send failures propagate to teloxide's error handler.
pub async fn message_handler(bot: Bot, msg: Message, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(user_id = %msg.chat.id, "ignoring non-text message");
        return Ok(());
    };

    let user_id = msg.chat.id.0;
    debug!(user_id, message_length = text.len(), "received text message");

    let event = Event::parse(text);
    if matches!(event, Event::Text(_)) {
        send_mode_chat_action(&bot, &msg, dispatcher.mode(user_id)).await;
    }

    let replies = dispatcher.dispatch(user_id, event).await;
    send_replies(&bot, msg.chat.id, replies).await
}

/// Shows a chat action while a backend call is in flight. Failures only warn:
/// the indicator is cosmetic and must not abort handling.
async fn send_mode_chat_action(bot: &Bot, msg: &Message, mode: Mode) {
    let action = match mode {
        Mode::ChatActive => ChatAction::Typing,
        Mode::ImageActive => ChatAction::UploadPhoto,
        Mode::Idle => return,
    };

    if let Err(e) = bot.send_chat_action(msg.chat.id, action).await {
        warn!(user_id = %msg.chat.id, error = %e, "failed to send chat action");
    }
}

/// Sends the replies in order. A failed send aborts the remaining replies,
/// so a partially delivered chunked message is never silently padded out.
pub async fn send_replies(bot: &Bot, chat_id: ChatId, replies: Vec<Reply>) -> Result<()> {
    for reply in replies {
        match reply {
            Reply::Text(text) => {
                bot.send_message(chat_id, text).await?;
            }
            Reply::Keyboard { text, keyboard } => {
                bot.send_message(chat_id, text)
                    .reply_markup(reply_keyboard(keyboard))
                    .await?;
            }
            Reply::Image(url) => {
                bot.send_photo(chat_id, InputFile::url(url::Url::parse(&url)?))
                    .await?;
            }
        }
    }

    Ok(())
}
