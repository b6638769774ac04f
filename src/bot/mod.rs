//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `dispatch`: session state machine routing events to the AI backends
//! - `message_handler`: translates incoming messages into events and sends replies
//! - `ui_builder`: creates the reply keyboards

pub mod dispatch;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler function for use in main.rs
pub use message_handler::message_handler;

// Re-export the dispatcher core for callers and tests
pub use dispatch::{split_message, Dispatcher, Event, Keyboard, Reply};
