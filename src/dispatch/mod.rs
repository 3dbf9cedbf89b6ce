//! Command registry and dispatch engine.
//!
//! The [`Manager`] owns the command registry, the trigger prefix, the pooled
//! database connection and the event bus. Incoming messages are checked
//! against the prefix, tokenized, and routed to the command named by the
//! first token; the whole original message is handed to the action so each
//! command parses its own arguments.

/// Command type and action signature
pub mod command;
/// Named-channel publish/subscribe
pub mod event_bus;
/// Message abstraction and outbound port
pub mod message;

pub use command::{ActionFuture, Command, Context};
pub use event_bus::{BusEvent, EventBus, Subscriber};
pub use message::{Message, Outbound, SenderProfile};

use crate::db::access::{self, Delete, Query, Upsert};
use crate::db::token::ConnectionToken;
use crate::errors::{Error, Result};
use sea_orm::{Database, DatabaseConnection, DbErr, QueryResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, error, info};

/// Channel on which infrastructure-class database failures are republished.
pub const SQL_ERROR_EVENT: &str = "sql-error";

const DEFAULT_PREFIX: &str = "!";

/// Owns the command registry, prefix convention, connection pool and event
/// bus. Shared as `Arc<Manager>` between the platform wiring and every
/// command action.
pub struct Manager {
    commands: RwLock<HashMap<String, Command>>,
    prefix: RwLock<String>,
    connection: RwLock<Option<DatabaseConnection>>,
    events: Mutex<EventBus>,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    /// Creates a manager with the default `"!"` prefix, an empty registry
    /// and no database connection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: RwLock::new(HashMap::new()),
            prefix: RwLock::new(DEFAULT_PREFIX.to_string()),
            connection: RwLock::new(None),
            events: Mutex::new(EventBus::new()),
        }
    }

    /// Replaces the command-trigger prefix. No validation: an empty prefix
    /// makes every non-bot message dispatch-eligible.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        *self.prefix.write().unwrap_or_else(PoisonError::into_inner) = prefix.into();
    }

    /// The current command-trigger prefix.
    #[must_use]
    pub fn prefix(&self) -> String {
        self.prefix
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Inserts a command, overwriting any existing entry with the same name
    /// (last-write-wins, no warning).
    pub fn register(&self, command: Command) {
        self.commands
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(command.name().to_string(), command);
    }

    /// Registers every command in the iterator.
    pub fn register_all(&self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.register(command);
        }
    }

    /// True iff the message was not authored by an automated peer and its
    /// text starts with the current prefix. Short-circuits before parsing.
    #[must_use]
    pub fn is_command(&self, message: &Message) -> bool {
        !message.author_is_bot && message.content.starts_with(&self.prefix())
    }

    /// Dispatches one message. Returns false with no side effects when the
    /// bot-author or prefix check fails or no command matches the first
    /// token; returns true when a matching command ran. Action failures are
    /// caught and logged here, never propagated.
    pub async fn handle(self: &Arc<Self>, message: &Message) -> bool {
        if !self.is_command(message) {
            return false;
        }

        let prefix = self.prefix();
        let Some(body) = message.content.strip_prefix(&prefix) else {
            return false;
        };
        let Some(name) = body.split_whitespace().next() else {
            return false;
        };

        let command = {
            self.commands
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(name)
                .cloned()
        };
        let Some(command) = command else {
            debug!(command = name, "no matching command");
            return false;
        };

        if let Err(err) = command.invoke(Arc::clone(self), message.clone()).await {
            error!(command = command.name(), %err, "command failed");
        }
        true
    }

    /// Subscribes a handler to a named event channel. Handlers capture the
    /// context they need explicitly (typically a clone of the `Arc<Manager>`).
    pub fn on(&self, channel: &str, subscriber: impl Fn(&BusEvent) + Send + Sync + 'static) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(channel, Arc::new(subscriber));
    }

    /// Removes every subscriber of the channel.
    pub fn off(&self, channel: &str) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear(channel);
    }

    /// Synchronously invokes every current subscriber of the channel in
    /// registration order; no-op for unknown channels.
    pub fn fire(&self, channel: &str, event: &BusEvent) {
        let subscribers = {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .subscribers(channel)
        };
        for subscriber in subscribers {
            subscriber(event);
        }
    }

    /// Establishes (or replaces) the pooled connection described by the
    /// token. Any pre-existing pool is torn down first.
    pub async fn connect(&self, token: &ConnectionToken) -> Result<()> {
        self.teardown().await?;
        let connection = Database::connect(token.url()).await?;
        info!(host = token.host(), database = token.database(), "connected to database");
        self.install(connection);
        Ok(())
    }

    /// Installs an already-open connection (tests, alternate drivers), with
    /// the same teardown-then-replace semantics as [`Manager::connect`].
    pub async fn attach(&self, connection: DatabaseConnection) -> Result<()> {
        self.teardown().await?;
        self.install(connection);
        Ok(())
    }

    /// A clone of the active pooled connection, if one is configured.
    #[must_use]
    pub fn connection(&self) -> Option<DatabaseConnection> {
        self.connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn teardown(&self) -> Result<()> {
        let previous = {
            self.connection
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .take()
        };
        if let Some(previous) = previous {
            previous.close().await?;
        }
        Ok(())
    }

    fn install(&self, connection: DatabaseConnection) {
        *self
            .connection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(connection);
    }

    /// Runs a parameterized SELECT. Fails fast with `Ok(None)` when no pool
    /// is configured; query errors propagate.
    pub async fn get_data(&self, query: Query) -> Result<Option<Vec<QueryResult>>> {
        let Some(db) = self.connection() else {
            debug!(table = query.table, "get_data called with no database configured");
            return Ok(None);
        };
        match access::get_data(&db, query).await {
            Ok(rows) => Ok(Some(rows)),
            Err(err) => Err(self.republish_infrastructure(err)),
        }
    }

    /// Runs an atomic upsert keyed by the identifier columns. Fails fast
    /// with `Ok(false)` when no pool is configured; returns true iff a row
    /// was written. Query errors propagate.
    pub async fn set_data(&self, upsert: Upsert) -> Result<bool> {
        let Some(db) = self.connection() else {
            debug!(table = upsert.table, "set_data called with no database configured");
            return Ok(false);
        };
        match access::set_data(&db, upsert).await {
            Ok(written) => Ok(written),
            Err(err) => Err(self.republish_infrastructure(err)),
        }
    }

    /// Runs a parameterized DELETE keyed by the identifier columns. Fails
    /// fast with `Ok(None)` when no pool is configured; returns the affected
    /// row count otherwise. Query errors propagate.
    pub async fn del_data(&self, delete: Delete) -> Result<Option<u64>> {
        let Some(db) = self.connection() else {
            debug!(table = delete.table, "del_data called with no database configured");
            return Ok(None);
        };
        match access::del_data(&db, delete).await {
            Ok(deleted) => Ok(Some(deleted)),
            Err(err) => Err(self.republish_infrastructure(err)),
        }
    }

    /// Republishes connection-level driver failures on the `"sql-error"`
    /// channel before handing the error back. Escalation (commonly: log and
    /// terminate) is the subscriber's decision, not the manager's.
    fn republish_infrastructure(&self, err: Error) -> Error {
        if let Error::Database(db_err @ (DbErr::Conn(_) | DbErr::ConnectionAcquire(_))) = &err {
            self.fire(
                SQL_ERROR_EVENT,
                &BusEvent::SqlError {
                    message: db_err.to_string(),
                },
            );
        }
        err
    }
}
