//! Fixed user-facing reply strings and keyboard labels.
//!
//! The bot speaks Russian; labels are matched verbatim against incoming
//! message text, so they must stay byte-for-byte identical to the keyboard
//! button captions.

/// Main menu button: start a fresh chat conversation.
pub const BTN_NEW_CHAT: &str = "🆕 Новый Чат";

/// Main menu button: switch to image generation.
pub const BTN_IMAGE_GENERATION: &str = "🖼 Генерация изображения";

/// Back button shown inside both modes.
pub const BTN_BACK: &str = "Назад";

/// Prompt shown together with the main menu keyboard.
pub const CHOOSE_ACTION: &str = "Выберите действие:";

/// Confirmation after entering chat mode.
pub const NEW_CHAT_STARTED: &str = "Новый диалог начат. Что вы хотите обсудить?";

/// Confirmation after entering image generation mode.
pub const IMAGE_MODE_ENABLED: &str = "Функция генерации изображений включена";

/// Single apology string for any backend failure.
pub const BACKEND_APOLOGY: &str =
    "Извините, произошла ошибка при обработке вашего запроса. Попробуйте позже.";

/// Guidance for free text sent while no mode is active.
pub const IDLE_FALLBACK: &str = "Вы делаете что-то не так!";
