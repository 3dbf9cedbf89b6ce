//! Character roster operations built on the generic data-access layer.
//!
//! All functions load the owner's blob, mutate it in memory and write it
//! back through the manager's upsert. Expected failures surface as
//! [`CharacterError`] values so the command boundary can turn them into
//! replies; only genuinely unexpected states are logged.

use super::character::{Character, Roster};
use crate::db::schema::{USER_COLUMNS, USER_DATA, USER_IDENTIFIERS, USER_NICKNAME, USERS_TABLE};
use crate::db::{Query, Upsert};
use crate::dispatch::Manager;
use thiserror::Error;
use tracing::warn;

/// Expected, user-facing failure conditions of the character domain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CharacterError {
    #[error("character `{0}` could not be found")]
    NotFound(String),

    #[error("no data stored yet")]
    NoData,

    #[error("problem with the database")]
    Database,

    #[error(
        "could not parse the stored data! Please repair the row manually and \
         update the database yourself (I am only a simple bot)\n```{0}```"
    )]
    Malformed(String),

    #[error("character `{0}` already exists")]
    NameExists(String),

    #[error("prefix `{0}` is already in use")]
    PrefixExists(String),
}

impl CharacterError {
    /// Stable machine code for each error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::NoData => "NO_DATA",
            Self::Database => "DATABASE",
            Self::Malformed(_) => "PARSING",
            Self::NameExists(_) => "ALREADY_EXIST_NAME",
            Self::PrefixExists(_) => "ALREADY_EXIST_PREFIX",
        }
    }
}

/// The stored row of one (guild, user) pair: nickname plus raw blob.
struct StoredRow {
    nickname: String,
    blob: String,
}

async fn load_row(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
) -> Result<Option<StoredRow>, CharacterError> {
    let rows = manager
        .get_data(Query {
            table: USERS_TABLE,
            columns: None,
            identifiers: USER_IDENTIFIERS.to_vec(),
            values: vec![guild_id.to_string(), user_id.to_string()],
        })
        .await
        .map_err(|err| {
            warn!(%err, guild_id, user_id, "failed to load user row");
            CharacterError::Database
        })?;

    // No pool configured counts as a database problem for domain callers.
    let Some(rows) = rows else {
        return Err(CharacterError::Database);
    };

    let Some(row) = rows.first() else {
        return Ok(None);
    };
    let nickname = row
        .try_get::<String>("", USER_NICKNAME)
        .map_err(|_| CharacterError::Database)?;
    let blob = row
        .try_get::<String>("", USER_DATA)
        .map_err(|_| CharacterError::Database)?;
    Ok(Some(StoredRow { nickname, blob }))
}

fn parse_roster(blob: &str) -> Result<Roster, CharacterError> {
    serde_json::from_str(blob).map_err(|_| CharacterError::Malformed(blob.to_string()))
}

async fn store_roster(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
    nickname: &str,
    roster: &Roster,
) -> Result<(), CharacterError> {
    let blob = serde_json::to_string(roster).map_err(|err| {
        warn!(%err, "failed to serialize roster");
        CharacterError::Database
    })?;

    let written = manager
        .set_data(Upsert {
            table: USERS_TABLE,
            columns: USER_COLUMNS.to_vec(),
            identifiers: USER_IDENTIFIERS.to_vec(),
            values: vec![
                guild_id.to_string(),
                user_id.to_string(),
                nickname.to_string(),
                blob,
            ],
        })
        .await
        .map_err(|err| {
            warn!(%err, guild_id, user_id, "failed to store roster");
            CharacterError::Database
        })?;

    if written { Ok(()) } else { Err(CharacterError::Database) }
}

/// Loads the owner's roster; an absent row is an empty roster, a row whose
/// blob does not parse is [`CharacterError::Malformed`] (the bot never
/// auto-repairs stored data).
pub async fn load_roster(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
) -> Result<Roster, CharacterError> {
    match load_row(manager, guild_id, user_id).await? {
        None => Ok(Roster::default()),
        Some(row) => parse_roster(&row.blob),
    }
}

/// Looks one character up by name.
pub async fn find_character(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
    name: &str,
) -> Result<Character, CharacterError> {
    load_roster(manager, guild_id, user_id)
        .await?
        .find(name)
        .cloned()
        .ok_or_else(|| CharacterError::NotFound(name.to_string()))
}

/// Every character of the owner, in storage order.
pub async fn list_characters(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
) -> Result<Vec<Character>, CharacterError> {
    Ok(load_roster(manager, guild_id, user_id).await?.characters)
}

/// Adds a new character. The name must be free and the prefix unused by any
/// other character of the same owner.
pub async fn create_character(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
    character: Character,
) -> Result<(), CharacterError> {
    let row = load_row(manager, guild_id, user_id).await?;
    let nickname = row.as_ref().map(|r| r.nickname.clone()).unwrap_or_default();
    let mut roster = match &row {
        Some(row) => parse_roster(&row.blob)?,
        None => Roster::default(),
    };

    if roster.find(&character.name).is_some() {
        return Err(CharacterError::NameExists(character.name));
    }
    if roster.characters.iter().any(|c| c.prefix == character.prefix) {
        return Err(CharacterError::PrefixExists(character.prefix));
    }

    roster.characters.push(character);
    store_roster(manager, guild_id, user_id, &nickname, &roster).await
}

/// Replaces an existing character (matched by name) wholesale. The new
/// prefix must not collide with any *other* character of the owner.
pub async fn update_character(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
    character: Character,
) -> Result<(), CharacterError> {
    let row = load_row(manager, guild_id, user_id).await?;
    let nickname = row.as_ref().map(|r| r.nickname.clone()).unwrap_or_default();
    let mut roster = match &row {
        Some(row) => parse_roster(&row.blob)?,
        None => Roster::default(),
    };

    let Some(index) = roster
        .characters
        .iter()
        .position(|c| c.name == character.name)
    else {
        return Err(CharacterError::NotFound(character.name));
    };
    if roster
        .characters
        .iter()
        .enumerate()
        .any(|(i, c)| i != index && c.prefix == character.prefix)
    {
        return Err(CharacterError::PrefixExists(character.prefix));
    }

    roster.characters[index] = character;
    store_roster(manager, guild_id, user_id, &nickname, &roster).await
}

/// Removes a character by name and persists the shrunken roster.
pub async fn delete_character(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
    name: &str,
) -> Result<(), CharacterError> {
    let row = load_row(manager, guild_id, user_id).await?;
    let nickname = row.as_ref().map(|r| r.nickname.clone()).unwrap_or_default();
    let mut roster = match &row {
        Some(row) => parse_roster(&row.blob)?,
        None => Roster::default(),
    };

    let Some(index) = roster.characters.iter().position(|c| c.name == name) else {
        return Err(CharacterError::NotFound(name.to_string()));
    };
    roster.characters.remove(index);
    store_roster(manager, guild_id, user_id, &nickname, &roster).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::character::DEFAULT_AVATAR_URL;
    use crate::test_utils::setup_manager;

    #[tokio::test]
    async fn fresh_character_creation_stores_defaults() {
        let manager = setup_manager().await.unwrap();

        create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let characters = list_characters(&manager, "G1", "U1").await.unwrap();
        assert_eq!(characters.len(), 1);
        let character = &characters[0];
        assert_eq!(character.name, "Flammrock");
        assert_eq!(character.prefix, ">>");
        assert!(character.inventory.is_empty());
        assert_eq!(character.money_pocket, 100);
        assert_eq!(character.health, 100);
        assert_eq!(character.food, 100);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_and_data_unchanged() {
        let manager = setup_manager().await.unwrap();
        create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let err = create_character(&manager, "G1", "U1", Character::new("Flammrock", "!!"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ALREADY_EXIST_NAME");

        let characters = list_characters(&manager, "G1", "U1").await.unwrap();
        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].prefix, ">>");
    }

    #[tokio::test]
    async fn duplicate_prefix_is_rejected() {
        let manager = setup_manager().await.unwrap();
        create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let err = create_character(&manager, "G1", "U1", Character::new("Ember", ">>"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ALREADY_EXIST_PREFIX");
    }

    #[tokio::test]
    async fn rosters_are_scoped_per_owner() {
        let manager = setup_manager().await.unwrap();
        create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        // Same name and prefix under another user is fine.
        create_character(&manager, "G1", "U2", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        assert_eq!(list_characters(&manager, "G1", "U1").await.unwrap().len(), 1);
        assert_eq!(list_characters(&manager, "G1", "U2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let manager = setup_manager().await.unwrap();
        create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();

        let mut character = find_character(&manager, "G1", "U1", "Flammrock").await.unwrap();
        character.prefix = ";;".to_string();
        update_character(&manager, "G1", "U1", character).await.unwrap();

        let reloaded = find_character(&manager, "G1", "U1", "Flammrock").await.unwrap();
        assert_eq!(reloaded.prefix, ";;");
        assert_eq!(reloaded.avatar, DEFAULT_AVATAR_URL);
        assert_eq!(list_characters(&manager, "G1", "U1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_rejects_prefix_held_by_another_character() {
        let manager = setup_manager().await.unwrap();
        create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();
        create_character(&manager, "G1", "U1", Character::new("Ember", ";;"))
            .await
            .unwrap();

        let mut ember = find_character(&manager, "G1", "U1", "Ember").await.unwrap();
        ember.prefix = ">>".to_string();
        let err = update_character(&manager, "G1", "U1", ember).await.unwrap_err();
        assert_eq!(err.code(), "ALREADY_EXIST_PREFIX");
    }

    #[tokio::test]
    async fn missing_characters_report_not_found() {
        let manager = setup_manager().await.unwrap();

        let err = find_character(&manager, "G1", "U1", "Nobody").await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");

        let err = delete_character(&manager, "G1", "U1", "Nobody").await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_removes_only_the_named_character() {
        let manager = setup_manager().await.unwrap();
        create_character(&manager, "G1", "U1", Character::new("Flammrock", ">>"))
            .await
            .unwrap();
        create_character(&manager, "G1", "U1", Character::new("Ember", ";;"))
            .await
            .unwrap();

        delete_character(&manager, "G1", "U1", "Flammrock").await.unwrap();

        let characters = list_characters(&manager, "G1", "U1").await.unwrap();
        assert_eq!(characters.len(), 1);
        assert_eq!(characters[0].name, "Ember");
    }

    #[tokio::test]
    async fn malformed_blob_is_surfaced_not_repaired() {
        let manager = setup_manager().await.unwrap();
        manager
            .set_data(Upsert {
                table: USERS_TABLE,
                columns: USER_COLUMNS.to_vec(),
                identifiers: USER_IDENTIFIERS.to_vec(),
                values: vec![
                    "G1".to_string(),
                    "U1".to_string(),
                    String::new(),
                    "not json at all".to_string(),
                ],
            })
            .await
            .unwrap();

        let err = load_roster(&manager, "G1", "U1").await.unwrap_err();
        assert_eq!(err.code(), "PARSING");
        assert!(err.to_string().contains("not json at all"));
    }

    #[tokio::test]
    async fn no_database_surfaces_as_database_error() {
        let manager = std::sync::Arc::new(Manager::new());
        let err = load_roster(&manager, "G1", "U1").await.unwrap_err();
        assert_eq!(err.code(), "DATABASE");
    }
}
