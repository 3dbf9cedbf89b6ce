//! Nickname operations over the per-(guild, user) row.

use crate::db::schema::{USER_COLUMNS, USER_DATA, USER_IDENTIFIERS, USER_NICKNAME, USERS_TABLE};
use crate::db::{Delete, Query, Upsert};
use crate::dispatch::Manager;
use crate::errors::Result;

const EMPTY_BLOB: &str = "{}";

fn row_key(guild_id: &str, user_id: &str) -> Vec<String> {
    vec![guild_id.to_string(), user_id.to_string()]
}

/// Stores the user's nickname, creating the row if needed. An existing
/// character blob is carried over untouched.
pub async fn set_nickname(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
    nickname: &str,
) -> Result<bool> {
    let blob = current_blob(manager, guild_id, user_id).await?;
    manager
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
}

/// The user's stored nickname; `None` when no row exists, no pool is
/// configured, or the nickname is empty.
pub async fn get_nickname(
    manager: &Manager,
    guild_id: &str,
    user_id: &str,
) -> Result<Option<String>> {
    let Some(rows) = manager
        .get_data(Query {
            table: USERS_TABLE,
            columns: Some(vec![USER_NICKNAME]),
            identifiers: USER_IDENTIFIERS.to_vec(),
            values: row_key(guild_id, user_id),
        })
        .await?
    else {
        return Ok(None);
    };

    let Some(row) = rows.first() else {
        return Ok(None);
    };
    let nickname: String = row.try_get("", USER_NICKNAME)?;
    Ok((!nickname.is_empty()).then_some(nickname))
}

/// Deletes the user's row permanently, nickname and character data alike.
/// Returns whether a row was removed.
pub async fn delete_profile(manager: &Manager, guild_id: &str, user_id: &str) -> Result<bool> {
    let deleted = manager
        .del_data(Delete {
            table: USERS_TABLE,
            identifiers: USER_IDENTIFIERS.to_vec(),
            values: row_key(guild_id, user_id),
        })
        .await?;
    Ok(deleted.unwrap_or(0) > 0)
}

async fn current_blob(manager: &Manager, guild_id: &str, user_id: &str) -> Result<String> {
    let Some(rows) = manager
        .get_data(Query {
            table: USERS_TABLE,
            columns: Some(vec![USER_DATA]),
            identifiers: USER_IDENTIFIERS.to_vec(),
            values: row_key(guild_id, user_id),
        })
        .await?
    else {
        return Ok(EMPTY_BLOB.to_string());
    };

    match rows.first() {
        Some(row) => Ok(row.try_get("", USER_DATA)?),
        None => Ok(EMPTY_BLOB.to_string()),
    }
}
