//! Inbound message abstraction and the outbound reply port.
//!
//! The dispatcher never touches the chat platform directly: every message it
//! sees carries an [`Outbound`] sink through which commands reply, delete the
//! triggering message, or repost content under a temporary sender identity.

use crate::errors::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Temporary sender identity used for a single impersonated send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderProfile {
    /// Display name shown on the proxied message
    pub name: String,
    /// Avatar image URL shown on the proxied message
    pub avatar_url: String,
}

/// Reply channel of one inbound message.
///
/// Implemented against a live Discord channel in `crate::bot`; tests use a
/// recording sink instead.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Posts a reply to the originating message.
    async fn reply(&self, text: &str) -> Result<()>;

    /// Deletes the triggering message.
    async fn delete(&self) -> Result<()>;

    /// Posts `content` under the given sender identity, scoped to this send.
    async fn send_as(&self, sender: &SenderProfile, content: &str) -> Result<()>;
}

/// One inbound chat message, decoupled from the platform client.
#[derive(Clone)]
pub struct Message {
    /// Originating guild id
    pub guild_id: String,
    /// Author id
    pub author_id: String,
    /// Whether the author is an automated peer
    pub author_is_bot: bool,
    /// Full message text, including any command trigger
    pub content: String,
    outbound: Arc<dyn Outbound>,
}

impl Message {
    /// Builds a message around an outbound sink.
    pub fn new(
        guild_id: impl Into<String>,
        author_id: impl Into<String>,
        author_is_bot: bool,
        content: impl Into<String>,
        outbound: Arc<dyn Outbound>,
    ) -> Self {
        Self {
            guild_id: guild_id.into(),
            author_id: author_id.into(),
            author_is_bot,
            content: content.into(),
            outbound,
        }
    }

    /// Replies to the originating message.
    pub async fn reply(&self, text: &str) -> Result<()> {
        self.outbound.reply(text).await
    }

    /// Deletes this message on the platform.
    pub async fn delete(&self) -> Result<()> {
        self.outbound.delete().await
    }

    /// Reposts `content` under the given sender identity.
    pub async fn send_as(&self, sender: &SenderProfile, content: &str) -> Result<()> {
        self.outbound.send_as(sender, content).await
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("guild_id", &self.guild_id)
            .field("author_id", &self.author_id)
            .field("author_is_bot", &self.author_is_bot)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}
