//! Core business logic - framework-agnostic character roster, nickname and
//! message-rewriting operations built on the dispatch manager's data layer.

/// Character sheet model and blob wrapper
pub mod character;
/// Prefix-triggered message rewriting
pub mod impersonation;
/// Nickname operations
pub mod profile;
/// Roster operations and domain errors
pub mod roster;

pub use character::{Character, Roster};
pub use roster::CharacterError;
