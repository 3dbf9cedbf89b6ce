//! Prefix-triggered message rewriting.
//!
//! When a plain chat message starts with one of the author's character
//! prefixes, the original is deleted and the stripped content is reposted
//! under that character's name and avatar through the outbound port.

use super::roster;
use crate::dispatch::{Manager, Message, SenderProfile};
use crate::errors::Result;
use tracing::debug;

/// Offers a non-command message to the rewrite flow. Returns whether a
/// rewrite happened. Roster problems (including malformed blobs) only skip
/// the rewrite; plain chat messages never earn an error reply.
pub async fn try_rewrite(manager: &Manager, message: &Message) -> Result<bool> {
    if message.author_is_bot {
        return Ok(false);
    }
    let command_prefix = manager.prefix();
    if !command_prefix.is_empty() && message.content.starts_with(&command_prefix) {
        return Ok(false);
    }

    let roster = match roster::load_roster(manager, &message.guild_id, &message.author_id).await {
        Ok(roster) => roster,
        Err(err) => {
            debug!(%err, "skipping message rewrite");
            return Ok(false);
        }
    };

    for character in &roster.characters {
        if character.prefix.is_empty() {
            continue;
        }
        let Some(body) = message.content.strip_prefix(&character.prefix) else {
            continue;
        };
        let body = body.trim();
        if body.is_empty() {
            return Ok(false);
        }

        let sender = SenderProfile {
            name: character.name.clone(),
            avatar_url: character.avatar.clone(),
        };
        message.send_as(&sender, body).await?;
        message.delete().await?;
        return Ok(true);
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::character::Character;
    use crate::test_utils::{RecordingOutbound, bot_message, setup_manager, test_message};
    use std::sync::Arc;

    #[tokio::test]
    async fn matching_prefix_reposts_and_deletes() {
        let manager = setup_manager().await.unwrap();
        roster::create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let outbound = Arc::new(RecordingOutbound::default());
        let message = test_message(&outbound, ">> hello there");

        assert!(try_rewrite(&manager, &message).await.unwrap());
        assert_eq!(
            outbound.proxied(),
            vec![("Flammrock".to_string(), "hello there".to_string())]
        );
        assert!(outbound.deleted());
    }

    #[tokio::test]
    async fn unrelated_messages_pass_through() {
        let manager = setup_manager().await.unwrap();
        roster::create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let outbound = Arc::new(RecordingOutbound::default());
        let message = test_message(&outbound, "just chatting");

        assert!(!try_rewrite(&manager, &message).await.unwrap());
        assert!(outbound.proxied().is_empty());
        assert!(!outbound.deleted());
    }

    #[tokio::test]
    async fn command_prefixed_messages_are_left_alone() {
        let manager = setup_manager().await.unwrap();
        roster::create_character(&manager, "G1", "U1", Character::new("Flammrock", "!"))
            .await
            .unwrap();

        let outbound = Arc::new(RecordingOutbound::default());
        let message = test_message(&outbound, "!char-list");

        assert!(!try_rewrite(&manager, &message).await.unwrap());
    }

    #[tokio::test]
    async fn bot_authors_are_never_rewritten() {
        let manager = setup_manager().await.unwrap();
        roster::create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let outbound = Arc::new(RecordingOutbound::default());
        let message = bot_message(&outbound, ">> hello");

        assert!(!try_rewrite(&manager, &message).await.unwrap());
    }

    #[tokio::test]
    async fn empty_body_after_the_prefix_is_not_reposted() {
        let manager = setup_manager().await.unwrap();
        roster::create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let outbound = Arc::new(RecordingOutbound::default());
        let message = test_message(&outbound, ">>   ");

        assert!(!try_rewrite(&manager, &message).await.unwrap());
        assert!(!outbound.deleted());
    }
}
