//! Discord wiring - adapts gateway traffic onto the dispatch engine.
//!
//! Everything platform-specific lives here: the gateway event handler, the
//! outbound port implementation against a live channel, and the webhook
//! used for impersonated sends.

use crate::core::impersonation;
use crate::dispatch::{Manager, Message, Outbound, SenderProfile};
use crate::errors::Result;
use async_trait::async_trait;
use serenity::all::{
    ChannelId, Client, Context as GatewayContext, CreateMessage, CreateWebhook, EventHandler,
    ExecuteWebhook, GatewayIntents, Message as GatewayMessage, MessageId, MessageReference, Ready,
    Webhook,
};
use serenity::http::Http;
use std::sync::Arc;
use tracing::{info, warn};

const PROXY_WEBHOOK_NAME: &str = "charkeeper-proxy";
const UNKNOWN_COMMAND_REPLY: &str = "sorry, that command does not exist!";

/// Outbound port bound to the channel and message that triggered it.
struct ChannelOutbound {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

impl ChannelOutbound {
    /// Finds the proxy webhook of the channel, creating it on first use.
    async fn proxy_webhook(&self) -> Result<Webhook> {
        let existing = self.channel_id.webhooks(&self.http).await?;
        if let Some(webhook) = existing
            .into_iter()
            .find(|webhook| webhook.name.as_deref() == Some(PROXY_WEBHOOK_NAME))
        {
            return Ok(webhook);
        }
        self.channel_id
            .create_webhook(&self.http, CreateWebhook::new(PROXY_WEBHOOK_NAME))
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl Outbound for ChannelOutbound {
    async fn reply(&self, text: &str) -> Result<()> {
        let reference = MessageReference::from((self.channel_id, self.message_id));
        self.channel_id
            .send_message(
                &self.http,
                CreateMessage::new().content(text).reference_message(reference),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.channel_id
            .delete_message(&self.http, self.message_id)
            .await?;
        Ok(())
    }

    async fn send_as(&self, sender: &SenderProfile, content: &str) -> Result<()> {
        let webhook = self.proxy_webhook().await?;
        webhook
            .execute(
                &self.http,
                false,
                ExecuteWebhook::new()
                    .username(&sender.name)
                    .avatar_url(&sender.avatar_url)
                    .content(content),
            )
            .await?;
        Ok(())
    }
}

struct Handler {
    manager: Arc<Manager>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: GatewayContext, ready: Ready) {
        info!("logged in as {}", ready.user.name);
    }

    async fn message(&self, ctx: GatewayContext, incoming: GatewayMessage) {
        // Direct messages are not part of the command surface.
        let Some(guild_id) = incoming.guild_id else {
            return;
        };

        let message = Message::new(
            guild_id.to_string(),
            incoming.author.id.to_string(),
            incoming.author.bot,
            incoming.content.clone(),
            Arc::new(ChannelOutbound {
                http: Arc::clone(&ctx.http),
                channel_id: incoming.channel_id,
                message_id: incoming.id,
            }),
        );

        if self.manager.is_command(&message) {
            if !self.manager.handle(&message).await {
                if let Err(err) = message.reply(UNKNOWN_COMMAND_REPLY).await {
                    warn!(%err, "failed to send unknown-command reply");
                }
            }
            return;
        }

        if let Err(err) = impersonation::try_rewrite(&self.manager, &message).await {
            warn!(%err, "message rewrite failed");
        }
    }
}

/// Runs the gateway client until it disconnects or fails.
pub async fn run_bot(token: String, manager: Arc<Manager>) -> Result<()> {
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler { manager })
        .await?;
    client.start().await?;
    Ok(())
}
