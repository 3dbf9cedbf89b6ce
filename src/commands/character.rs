//! Character roster commands.
//!
//! Domain errors are turned into replies here; only infrastructure
//! failures escape to the dispatch boundary.

use super::arguments;
use crate::core::character::Character;
use crate::core::roster;
use crate::dispatch::{Command, Context, Message};
use crate::errors::Result;
use std::fmt::Write;

/// The character command set.
#[must_use]
pub fn commands() -> Vec<Command> {
    vec![
        Command::new("char-create", |context, message| {
            Box::pin(char_create(context, message))
        }),
        Command::new("char-edit", |context, message| {
            Box::pin(char_edit(context, message))
        }),
        Command::new("char-delete", |context, message| {
            Box::pin(char_delete(context, message))
        }),
        Command::new("char-list", |context, message| {
            Box::pin(char_list(context, message))
        }),
        Command::new("char-info", |context, message| {
            Box::pin(char_info(context, message))
        }),
    ]
}

/// `char-create <name> <prefix>`
async fn char_create(context: Context, message: Message) -> Result<()> {
    let args = arguments(&context, &message);
    if args.len() < 2 {
        return message
            .reply(
                "not enough arguments.\nusage: char-create <name> <prefix>\n\
                 example: char-create Flammrock >>",
            )
            .await;
    }
    let name = &args[0];
    let prefix = &args[1];

    match roster::create_character(
        &context,
        &message.guild_id,
        &message.author_id,
        Character::new(name, prefix),
    )
    .await
    {
        Ok(()) => {
            message
                .reply(&format!("character `{name}` created with prefix `{prefix}`!"))
                .await
        }
        Err(err) => message.reply(&err.to_string()).await,
    }
}

/// `char-edit <name> <field> <value>` where field is `prefix` or `avatar`.
async fn char_edit(context: Context, message: Message) -> Result<()> {
    let args = arguments(&context, &message);
    if args.len() < 3 {
        return message
            .reply("usage: char-edit <name> <prefix|avatar> <value>")
            .await;
    }
    let name = &args[0];
    let field = args[1].as_str();
    let value = &args[2];

    let mut character =
        match roster::find_character(&context, &message.guild_id, &message.author_id, name).await {
            Ok(character) => character,
            Err(err) => return message.reply(&err.to_string()).await,
        };

    match field {
        "prefix" => character.prefix = value.clone(),
        "avatar" => character.avatar = value.clone(),
        other => {
            return message
                .reply(&format!("unknown field `{other}`, expected `prefix` or `avatar`"))
                .await;
        }
    }

    match roster::update_character(&context, &message.guild_id, &message.author_id, character).await
    {
        Ok(()) => message.reply(&format!("character `{name}` updated!")).await,
        Err(err) => message.reply(&err.to_string()).await,
    }
}

/// `char-delete <name>`
async fn char_delete(context: Context, message: Message) -> Result<()> {
    let args = arguments(&context, &message);
    let Some(name) = args.first() else {
        return message.reply("usage: char-delete <name>").await;
    };

    match roster::delete_character(&context, &message.guild_id, &message.author_id, name).await {
        Ok(()) => message.reply(&format!("character `{name}` deleted")).await,
        Err(err) => message.reply(&err.to_string()).await,
    }
}

async fn char_list(context: Context, message: Message) -> Result<()> {
    match roster::list_characters(&context, &message.guild_id, &message.author_id).await {
        Ok(characters) if characters.is_empty() => {
            message
                .reply("you do not have any characters yet. create one with char-create!")
                .await
        }
        Ok(characters) => {
            let mut response = String::from("your characters:\n");
            for character in characters {
                writeln!(&mut response, "- {} (prefix `{}`)", character.name, character.prefix)?;
            }
            message.reply(response.trim_end()).await
        }
        Err(err) => message.reply(&err.to_string()).await,
    }
}

/// `char-info <name>`
async fn char_info(context: Context, message: Message) -> Result<()> {
    let args = arguments(&context, &message);
    let Some(name) = args.first() else {
        return message.reply("usage: char-info <name>").await;
    };

    match roster::find_character(&context, &message.guild_id, &message.author_id, name).await {
        Ok(character) => {
            let mut response = format!("**{}**\n", character.name);
            writeln!(&mut response, "prefix: `{}`", character.prefix)?;
            writeln!(&mut response, "health: {} | food: {}", character.health, character.food)?;
            writeln!(
                &mut response,
                "pocket money: {} | banked: {}",
                character.money_pocket,
                character.money_bank.iter().sum::<i64>()
            )?;
            writeln!(&mut response, "inventory: {} item(s)", character.inventory.len())?;
            write!(&mut response, "avatar: {}", character.avatar)?;
            message.reply(&response).await
        }
        Err(err) => message.reply(&err.to_string()).await,
    }
}
