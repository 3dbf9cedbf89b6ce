//! Built-in command set registered by the wiring.
//!
//! Each module exposes a `commands()` collector; the trigger token is the
//! command name and the whole original message is handed to the action, so
//! argument parsing stays inside each command.

/// Character roster commands
pub mod character;
/// Ping and nickname commands
pub mod general;

use crate::dispatch::{Command, Manager, Message};

/// Every built-in command, ready for registration.
#[must_use]
pub fn all() -> Vec<Command> {
    let mut commands = general::commands();
    commands.extend(character::commands());
    commands
}

/// Whitespace-delimited arguments after the command trigger.
pub(crate) fn arguments(manager: &Manager, message: &Message) -> Vec<String> {
    let prefix = manager.prefix();
    let body = message
        .content
        .strip_prefix(&prefix)
        .unwrap_or(&message.content);
    body.split_whitespace().skip(1).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{RecordingOutbound, test_message};
    use std::sync::Arc;

    #[test]
    fn arguments_skip_the_trigger_token() {
        let manager = Manager::new();
        let outbound = Arc::new(RecordingOutbound::default());

        let message = test_message(&outbound, "!char-create Flammrock >>");
        assert_eq!(arguments(&manager, &message), vec!["Flammrock", ">>"]);

        let message = test_message(&outbound, "!ping");
        assert!(arguments(&manager, &message).is_empty());
    }

    #[test]
    fn registered_names_are_unique() {
        let mut names: Vec<String> = all()
            .iter()
            .map(|command| command.name().to_string())
            .collect();
        let count = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), count);
    }
}
