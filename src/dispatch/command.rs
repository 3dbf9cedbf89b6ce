//! Named commands bound to the dispatch engine.

use super::{Manager, Message};
use crate::errors::Result;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Execution context handed to every command action: the shared manager,
/// passed explicitly as the first parameter.
pub type Context = Arc<Manager>;

/// Boxed future returned by a command action.
pub type ActionFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

type Action = Arc<dyn Fn(Context, Message) -> ActionFuture + Send + Sync>;

/// An immutable (name, action) pair. The name is the registry lookup key;
/// the action receives the manager and the whole triggering message.
#[derive(Clone)]
pub struct Command {
    name: String,
    action: Action,
}

impl Command {
    /// Creates a command. Actions are usually written as plain async
    /// functions and wrapped at the call site:
    ///
    /// ```ignore
    /// Command::new("ping", |context, message| Box::pin(ping(context, message)))
    /// ```
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(Context, Message) -> ActionFuture + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    /// The registry lookup key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) async fn invoke(&self, context: Context, message: Message) -> Result<()> {
        (self.action)(context, message).await
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
