//! UI Builder module for the reply keyboards shown to users.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

use super::dispatch::Keyboard;
use crate::texts;

/// Main menu: chat and image generation side by side.
pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(texts::BTN_NEW_CHAT),
        KeyboardButton::new(texts::BTN_IMAGE_GENERATION),
    ]])
    .resize_keyboard()
}

/// Single back button shown inside both modes.
pub fn back_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(texts::BTN_BACK)]])
        .resize_keyboard()
}

/// Maps a dispatcher keyboard instruction to concrete markup.
pub fn reply_keyboard(keyboard: Keyboard) -> KeyboardMarkup {
    match keyboard {
        Keyboard::MainMenu => main_menu(),
        Keyboard::Back => back_keyboard(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_menu_layout() {
        let markup = main_menu();

        assert_eq!(markup.keyboard.len(), 1);
        assert_eq!(markup.keyboard[0].len(), 2);
        assert_eq!(markup.keyboard[0][0].text, texts::BTN_NEW_CHAT);
        assert_eq!(markup.keyboard[0][1].text, texts::BTN_IMAGE_GENERATION);
    }

    #[test]
    fn test_back_keyboard_layout() {
        let markup = back_keyboard();

        assert_eq!(markup.keyboard.len(), 1);
        assert_eq!(markup.keyboard[0].len(), 1);
        assert_eq!(markup.keyboard[0][0].text, texts::BTN_BACK);
    }
}
