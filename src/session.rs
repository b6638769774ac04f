//! Per-user session modes and the store that tracks them.

use std::collections::HashMap;
use std::sync::Mutex;

/// Interaction mode of a single user.
///
/// Free text is routed according to the current mode; menu selections and
/// commands move users between modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// No mode selected yet; free text gets a guidance reply.
    #[default]
    Idle,
    /// Free text goes to the chat completion backend.
    ChatActive,
    /// Free text goes to the image generation backend.
    ImageActive,
}

/// Concurrency-safe mapping from user id to current [`Mode`].
///
/// Sessions are created implicitly on first lookup and live for the process
/// lifetime; there is no persistence across restarts. Last write wins when
/// events for the same user race, which the transport's per-user ordering
/// makes unobservable in practice.
#[derive(Debug, Default)]
pub struct SessionStore {
    modes: Mutex<HashMap<i64, Mode>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode for the user, `Idle` if the user has never been seen.
    pub fn mode(&self, user_id: i64) -> Mode {
        self.modes
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_mode(&self, user_id: i64, mode: Mode) {
        self.modes.lock().unwrap().insert(user_id, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user_is_idle() {
        let store = SessionStore::new();
        assert_eq!(store.mode(42), Mode::Idle);
    }

    #[test]
    fn test_set_and_get_mode() {
        let store = SessionStore::new();
        store.set_mode(1, Mode::ChatActive);
        assert_eq!(store.mode(1), Mode::ChatActive);

        store.set_mode(1, Mode::ImageActive);
        assert_eq!(store.mode(1), Mode::ImageActive);
    }

    #[test]
    fn test_users_are_independent() {
        let store = SessionStore::new();
        store.set_mode(1, Mode::ChatActive);
        assert_eq!(store.mode(2), Mode::Idle);
    }

    #[test]
    fn test_default_mode_is_idle() {
        assert_eq!(Mode::default(), Mode::Idle);
    }
}
