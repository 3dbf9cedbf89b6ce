//! Shared test utilities for `CharKeeper`.
//!
//! Provides the in-memory database setup used by every integration test and
//! a recording outbound sink for asserting on replies, deletions and
//! impersonated sends.

use crate::dispatch::{Manager, Message, Outbound, SenderProfile};
use crate::errors::Result;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::db::schema::create_tables(&db).await?;
    Ok(db)
}

/// Creates a manager with an in-memory database attached.
pub async fn setup_manager() -> Result<Arc<Manager>> {
    let manager = Arc::new(Manager::new());
    manager.attach(setup_test_db().await?).await?;
    Ok(manager)
}

/// Outbound sink that records everything sent through it.
#[derive(Default)]
pub struct RecordingOutbound {
    replies: Mutex<Vec<String>>,
    proxied: Mutex<Vec<(String, String)>>,
    deleted: AtomicBool,
}

impl RecordingOutbound {
    /// Every reply posted so far, in order.
    pub fn replies(&self) -> Vec<String> {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every impersonated send so far, as (sender name, content) pairs.
    pub fn proxied(&self) -> Vec<(String, String)> {
        self.proxied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether the triggering message was deleted.
    pub fn deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn reply(&self, text: &str) -> Result<()> {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.deleted.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send_as(&self, sender: &SenderProfile, content: &str) -> Result<()> {
        self.proxied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((sender.name.clone(), content.to_string()));
        Ok(())
    }
}

/// A message from guild `G1`, user `U1`, authored by a human.
pub fn test_message(outbound: &Arc<RecordingOutbound>, content: &str) -> Message {
    Message::new(
        "G1",
        "U1",
        false,
        content,
        Arc::clone(outbound) as Arc<dyn Outbound>,
    )
}

/// Same as [`test_message`] but flagged as authored by an automated peer.
pub fn bot_message(outbound: &Arc<RecordingOutbound>, content: &str) -> Message {
    Message::new(
        "G1",
        "U1",
        true,
        content,
        Arc::clone(outbound) as Arc<dyn Outbound>,
    )
}
