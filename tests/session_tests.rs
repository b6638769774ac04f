use std::sync::Arc;

use anyhow::Result;

use chatpix::session::{Mode, SessionStore};

/// Test that every user starts in Idle
#[test]
fn test_initial_mode_is_idle() {
    let store = SessionStore::new();
    assert_eq!(store.mode(1), Mode::Idle);
    assert_eq!(store.mode(-7), Mode::Idle);
}

/// Test that the last write wins on repeated transitions
#[test]
fn test_last_write_wins() {
    let store = SessionStore::new();

    store.set_mode(1, Mode::ChatActive);
    store.set_mode(1, Mode::ImageActive);
    store.set_mode(1, Mode::Idle);

    assert_eq!(store.mode(1), Mode::Idle);
}

/// Test concurrent access from parallel handler tasks
#[tokio::test]
async fn test_concurrent_access() -> Result<()> {
    let store = Arc::new(SessionStore::new());

    let mut handles = Vec::new();
    for user_id in 0..32i64 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let mode = if user_id % 2 == 0 {
                Mode::ChatActive
            } else {
                Mode::ImageActive
            };
            store.set_mode(user_id, mode);
            store.mode(user_id)
        }));
    }

    for (user_id, handle) in handles.into_iter().enumerate() {
        let mode = handle.await?;
        let expected = if user_id % 2 == 0 {
            Mode::ChatActive
        } else {
            Mode::ImageActive
        };
        assert_eq!(mode, expected);
    }

    Ok(())
}
