//! # Chatpix Telegram Bot
//!
//! A Telegram bot that routes each user between a chat conversation backed by
//! a text-completion service and prompt-based image generation, tracking a
//! per-user session mode.

pub mod bot;
pub mod config;
pub mod openai;
pub mod providers;
pub mod replicate;
pub mod session;
pub mod texts;
