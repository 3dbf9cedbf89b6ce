//! Character sheet model stored inside a user's JSON blob.

use serde::{Deserialize, Serialize};

/// Prefix assigned to characters created without one.
pub const DEFAULT_CHARACTER_PREFIX: &str = ">>";
/// Avatar shown for characters that never set one.
pub const DEFAULT_AVATAR_URL: &str = "https://pbs.twimg.com/media/EV1HX5-XQAEIPtW.png";

/// One character sheet. Within one owner's roster no two characters share a
/// name and no two share a prefix.
///
/// Blobs written by older revisions may miss fields; `#[serde(default)]`
/// fills those from the defaults below instead of rejecting the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    /// Unique name within the owner's roster
    pub name: String,
    /// Unique message-rewriting prefix within the owner's roster
    pub prefix: String,
    /// Avatar image URL used for impersonated sends
    pub avatar: String,
    /// Carried items
    pub inventory: Vec<String>,
    /// Cash on hand
    pub money_pocket: i64,
    /// Banked deposits
    pub money_bank: Vec<i64>,
    /// Current job id, 0 for none
    pub job: i64,
    /// Health points
    pub health: i64,
    /// Food points
    pub food: i64,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: "no name".to_string(),
            prefix: DEFAULT_CHARACTER_PREFIX.to_string(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
            inventory: Vec::new(),
            money_pocket: 100,
            money_bank: Vec::new(),
            job: 0,
            health: 100,
            food: 100,
        }
    }
}

impl Character {
    /// A fresh character with the given name and prefix and default status
    /// values everywhere else.
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            ..Self::default()
        }
    }
}

/// The deserialized `user_data` blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    /// Every character owned by this (guild, user) pair
    pub characters: Vec<Character>,
}

impl Roster {
    /// Looks a character up by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|character| character.name == name)
    }
}
