//! General commands: ping and the nickname trio.

use crate::core::profile;
use crate::dispatch::{Command, Context, Message};
use crate::errors::Result;
use tracing::warn;

const GENERIC_FAILURE_REPLY: &str = "oops, something went wrong!";

/// The general command set.
#[must_use]
pub fn commands() -> Vec<Command> {
    vec![
        Command::new("ping", |context, message| Box::pin(ping(context, message))),
        Command::new("set-nickname", |context, message| {
            Box::pin(set_nickname(context, message))
        }),
        Command::new("get-nickname", |context, message| {
            Box::pin(get_nickname(context, message))
        }),
        Command::new("del-nickname", |context, message| {
            Box::pin(del_nickname(context, message))
        }),
    ]
}

async fn ping(_context: Context, message: Message) -> Result<()> {
    message.reply("pong!").await
}

/// `set-nickname <nickname>` - stores everything after the trigger.
async fn set_nickname(context: Context, message: Message) -> Result<()> {
    let nickname = message
        .content
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();
    if nickname.is_empty() {
        return message.reply("usage: set-nickname <nickname>").await;
    }

    match profile::set_nickname(&context, &message.guild_id, &message.author_id, nickname).await {
        Ok(true) => message.reply("nickname saved!").await,
        Ok(false) => message.reply(GENERIC_FAILURE_REPLY).await,
        Err(err) => {
            warn!(%err, "set-nickname failed");
            message.reply(GENERIC_FAILURE_REPLY).await
        }
    }
}

async fn get_nickname(context: Context, message: Message) -> Result<()> {
    match profile::get_nickname(&context, &message.guild_id, &message.author_id).await {
        Ok(Some(nickname)) => {
            message
                .reply(&format!("your nickname is \"{nickname}\""))
                .await
        }
        Ok(None) => message.reply("you do not have a nickname yet!").await,
        Err(err) => {
            warn!(%err, "get-nickname failed");
            message.reply(GENERIC_FAILURE_REPLY).await
        }
    }
}

/// Removes the whole stored row, nickname and character data alike.
async fn del_nickname(context: Context, message: Message) -> Result<()> {
    match profile::delete_profile(&context, &message.guild_id, &message.author_id).await {
        Ok(true) => message.reply("your stored data has been removed").await,
        Ok(false) => message.reply("nothing to remove!").await,
        Err(err) => {
            warn!(%err, "del-nickname failed");
            message.reply(GENERIC_FAILURE_REPLY).await
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{RecordingOutbound, setup_manager, test_message};
    use std::sync::Arc;

    #[tokio::test]
    async fn ping_replies_pong() {
        let manager = setup_manager().await.unwrap();
        manager.register_all(commands());

        let outbound = Arc::new(RecordingOutbound::default());
        assert!(manager.handle(&test_message(&outbound, "!ping")).await);
        assert_eq!(outbound.replies(), vec!["pong!"]);
    }

    #[tokio::test]
    async fn nickname_flow_end_to_end() {
        let manager = setup_manager().await.unwrap();
        manager.register_all(commands());

        let outbound = Arc::new(RecordingOutbound::default());
        manager
            .handle(&test_message(&outbound, "!set-nickname Flamm the Brave"))
            .await;
        manager.handle(&test_message(&outbound, "!get-nickname")).await;
        manager.handle(&test_message(&outbound, "!del-nickname")).await;
        manager.handle(&test_message(&outbound, "!get-nickname")).await;

        assert_eq!(
            outbound.replies(),
            vec![
                "nickname saved!",
                "your nickname is \"Flamm the Brave\"",
                "your stored data has been removed",
                "you do not have a nickname yet!",
            ]
        );
    }

    #[tokio::test]
    async fn set_nickname_without_arguments_prints_usage() {
        let manager = setup_manager().await.unwrap();
        manager.register_all(commands());

        let outbound = Arc::new(RecordingOutbound::default());
        manager.handle(&test_message(&outbound, "!set-nickname")).await;
        assert_eq!(outbound.replies(), vec!["usage: set-nickname <nickname>"]);
    }
}
