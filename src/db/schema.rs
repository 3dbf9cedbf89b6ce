//! Canonical table and column names, plus schema creation.
//!
//! These constants are the call-site allowlist for the data-access layer:
//! the only identifiers the rest of the crate passes to
//! [`crate::db::access`]. They must agree with the entity definitions in
//! [`crate::entities`], which is what schema creation is generated from.

use crate::entities::UserRecord;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

/// Per-(guild, user) records with the serialized character roster.
pub const USERS_TABLE: &str = "users";
/// Identifier column: originating guild
pub const GUILD_ID: &str = "guild_id";
/// Identifier column: message author
pub const USER_ID: &str = "user_id";
/// Free-form display nickname
pub const USER_NICKNAME: &str = "user_nickname";
/// Opaque JSON blob holding the character roster
pub const USER_DATA: &str = "user_data";

/// Ordered identifier-column set addressing one logical record.
pub const USER_IDENTIFIERS: [&str; 2] = [GUILD_ID, USER_ID];
/// Every column of the users table, in write order.
pub const USER_COLUMNS: [&str; 4] = [GUILD_ID, USER_ID, USER_NICKNAME, USER_DATA];

/// Creates all tables from the entity definitions, skipping ones that
/// already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut users_table = schema.create_table_from_entity(UserRecord);
    users_table.if_not_exists();
    db.execute(builder.build(&users_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::{Database, EntityName, EntityTrait, QuerySelect};

    #[test]
    fn allowlist_matches_the_entity_definition() {
        assert_eq!(UserRecord.table_name(), USERS_TABLE);
    }

    #[tokio::test]
    async fn created_tables_are_queryable() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        create_tables(&db).await.unwrap();

        let _rows: Vec<crate::entities::user_record::Model> =
            UserRecord::find().limit(1).all(&db).await.unwrap();
    }

    #[tokio::test]
    async fn create_tables_is_safe_to_repeat() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        create_tables(&db).await.unwrap();
        create_tables(&db).await.unwrap();
    }
}
