//! `CharKeeper` - A Discord bot for roleplay character sheets
//!
//! This crate provides a prefix-triggered command dispatcher with a generic
//! key-identified persistence layer, plus a character-roster domain built on
//! top of it: users create named characters with unique message prefixes,
//! and messages starting with a character's prefix are reposted as that
//! character.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,

    // Performance
    clippy::inefficient_to_string,
    clippy::needless_pass_by_value,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::enum_glob_use,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
)]

/// Discord wiring - gateway adapter, outbound port implementation
pub mod bot;
/// Built-in command set (general and character commands)
pub mod commands;
/// Configuration loading from config.toml and the environment
pub mod config;
/// Domain logic - character roster, nicknames, message rewriting
pub mod core;
/// Generic data-access layer and connection handling
pub mod db;
/// Command registry, dispatch engine, event bus, message abstraction
pub mod dispatch;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;

#[cfg(test)]
pub mod test_utils;
