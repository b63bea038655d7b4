//! # World Runtime
//!
//! Builds the single event registry and threads it into every subsystem.
//!
//! ## Startup Sequence
//!
//! 1. Create the registry
//! 2. Create the lifecycle subsystem (producer)
//! 3. Install consumers: session log, job manager
//! 4. Create the command registry and install plugins
//! 5. `start()` spawns the play-time ticker

use std::sync::Arc;

use shared_bus::{CharacterSelected, Disconnected, PlayerDied, Respawned, Spawned};
use shared_types::{Permission, PlayerId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::commands::{CommandError, CommandRegistry};
use crate::config::RuntimeConfig;
use crate::jobs::JobManager;
use crate::lifecycle::{spawn_play_time_ticker, PlayerLifecycle};
use crate::plugins::delivery_job;
use crate::Registry;

/// Owns every subsystem for the life of the process.
pub struct WorldRuntime {
    config: RuntimeConfig,
    registry: Arc<Registry>,
    lifecycle: Arc<PlayerLifecycle>,
    jobs: Arc<JobManager>,
    commands: Arc<CommandRegistry>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl WorldRuntime {
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        info!("Creating world runtime");

        let registry = Arc::new(Registry::new());
        let lifecycle = Arc::new(PlayerLifecycle::new(Arc::clone(&registry), config.limits()));
        let limits = lifecycle.limits();
        info!(
            max_health = limits.max_health,
            max_armour = limits.max_armour,
            "Lifecycle limits"
        );

        install_session_log(&registry);
        let jobs = JobManager::install(&registry, lifecycle.players().clone());

        let commands = Arc::new(CommandRegistry::new(config.command_prefix.clone()));
        delivery_job::install(&registry, &commands, &jobs);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(subscriptions = registry.len(), "Subsystems installed");

        Self {
            config,
            registry,
            lifecycle,
            jobs,
            commands,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Spawn background tasks. Must be called inside a tokio runtime.
    pub fn start(&self) -> JoinHandle<()> {
        info!(
            interval_secs = self.config.play_time_interval_secs,
            "Starting play time ticker"
        );
        spawn_play_time_ticker(
            Arc::clone(&self.lifecycle),
            self.config.play_time_interval(),
            self.shutdown_rx.clone(),
        )
    }

    /// Route a chat message from `player` through the command registry,
    /// using the player's current permission level.
    pub fn handle_chat(&self, player: PlayerId, message: &str) -> Result<bool, CommandError> {
        let permission = self
            .lifecycle
            .players()
            .get(&player)
            .map_or(Permission::None, |state| state.permission);
        self.commands.handle(&player, permission, message)
    }

    /// Signal background tasks to stop.
    pub fn shutdown(&self) {
        info!("Initiating shutdown");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    #[must_use]
    pub fn lifecycle(&self) -> Arc<PlayerLifecycle> {
        Arc::clone(&self.lifecycle)
    }

    #[must_use]
    pub fn jobs(&self) -> Arc<JobManager> {
        Arc::clone(&self.jobs)
    }

    #[must_use]
    pub fn commands(&self) -> Arc<CommandRegistry> {
        Arc::clone(&self.commands)
    }
}

/// Log session milestones.
fn install_session_log(registry: &Registry) {
    registry.on::<Spawned, _>(|player, _| {
        info!(%player, "Session: spawned");
        Ok(())
    });
    registry.on::<CharacterSelected, _>(|player, _| {
        info!(%player, "Session: character selected");
        Ok(())
    });
    registry.on::<PlayerDied, _>(|player, _| {
        info!(%player, "Session: died");
        Ok(())
    });
    registry.on::<Respawned, _>(|player, _| {
        info!(%player, "Session: respawned");
        Ok(())
    });
    registry.on::<Disconnected, _>(|_, payload| {
        let hours = payload.document.as_character().map(|c| c.hours);
        info!(id = payload.id, ?hours, "Session: disconnected");
        Ok(())
    });
}
