//! User record entity - One row per (guild, user) pair.
//!
//! The row carries a display nickname and an opaque JSON blob with the
//! user's character roster. The generic data-access layer addresses this
//! table by name; the entity exists so schema creation works from the
//! struct definition.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Originating guild id
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Author id within the guild
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Free-form display nickname
    pub user_nickname: String,
    /// Serialized character roster (free-form JSON)
    pub user_data: String,
}

/// User records have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
