//! # Command Subsystem
//!
//! Binds chat commands to a minimum permission level and a handler.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_bus::{HandlerError, HandlerResult};
use shared_types::{Permission, PlayerId};
use thiserror::Error;
use tracing::{debug, warn};

/// Handler invoked with the issuing player and the whitespace-split
/// arguments after the command name.
pub type CommandHandler = Arc<dyn Fn(&PlayerId, &[&str]) -> HandlerResult + Send + Sync>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command /{command} requires {required} permission")]
    PermissionDenied {
        command: String,
        required: Permission,
    },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

struct Command {
    description: String,
    permission: Permission,
    handler: CommandHandler,
}

/// Registered chat commands, keyed by name.
pub struct CommandRegistry {
    prefix: String,
    commands: RwLock<BTreeMap<String, Command>>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: RwLock::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a command. A second registration under the same name
    /// replaces the first.
    pub fn add_command<F>(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        permission: Permission,
        handler: F,
    ) where
        F: Fn(&PlayerId, &[&str]) -> HandlerResult + Send + Sync + 'static,
    {
        let name = name.into().to_lowercase();
        let command = Command {
            description: description.into(),
            permission,
            handler: Arc::new(handler),
        };
        if self.commands.write().insert(name.clone(), command).is_some() {
            warn!(command = %name, "Command replaced");
        } else {
            debug!(command = %name, %permission, "Command registered");
        }
    }

    /// Run a chat message as a command.
    ///
    /// Returns `Ok(false)` when the message is not a command at all.
    pub fn handle(
        &self,
        player: &PlayerId,
        permission: Permission,
        message: &str,
    ) -> Result<bool, CommandError> {
        let Some(body) = message.trim().strip_prefix(self.prefix.as_str()) else {
            return Ok(false);
        };

        let mut parts = body.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        let (required, handler) = {
            let commands = self.commands.read();
            let command = commands
                .get(&name)
                .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;
            (command.permission, Arc::clone(&command.handler))
        };

        if !permission.allows(required) {
            return Err(CommandError::PermissionDenied {
                command: name,
                required,
            });
        }

        debug!(%player, command = %name, "Running command");
        handler(player, args.as_slice())?;
        Ok(true)
    }

    /// `(name, description)` of every command usable at `permission`.
    #[must_use]
    pub fn commands(&self, permission: Permission) -> Vec<(String, String)> {
        self.commands
            .read()
            .iter()
            .filter(|(_, command)| permission.allows(command.permission))
            .map(|(name, command)| (name.clone(), command.description.clone()))
            .collect()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("prefix", &self.prefix)
            .field("commands", &self.commands.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
