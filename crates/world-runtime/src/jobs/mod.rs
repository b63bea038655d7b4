//! # Job Subsystem
//!
//! Walks players through ordered objective lists. Progress is driven
//! entirely by lifecycle events:
//!
//! - `player-pos-set`, `player-entered-vehicle-as-driver` and
//!   `player-left-vehicle-seat` re-check the current objective;
//! - `player-died` and `player-disconnected` abandon the job.
//!
//! Finishing the last objective dispatches the custom event
//! [`JOB_COMPLETE_EVENT`] with `{ "job": "<uuid>" }`.

mod job;

pub use job::Job;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use shared_bus::{
    Disconnected, EnteredVehicleAsDriver, EventArgs, HandlerResult, LeftVehicleSeat, PlayerDied,
    PositionSet,
};
use shared_types::{Objective, PlayerId};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::lifecycle::Players;
use crate::Registry;

/// Custom event dispatched when a player finishes a job.
pub const JOB_COMPLETE_EVENT: &str = "job-complete";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Job has no objectives")]
    NoObjectives,

    #[error("{0} is already on a job")]
    AlreadyOnJob(PlayerId),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),
}

/// Tracks at most one active job per player.
pub struct JobManager {
    players: Players,
    jobs: Mutex<HashMap<PlayerId, Job>>,
    registry: Weak<Registry>,
}

impl JobManager {
    /// Create the manager and subscribe it to the lifecycle events it
    /// reacts to.
    pub fn install(registry: &Arc<Registry>, players: Players) -> Arc<Self> {
        let manager = Arc::new(Self {
            players,
            jobs: Mutex::new(HashMap::new()),
            registry: Arc::downgrade(registry),
        });

        let m = Arc::clone(&manager);
        registry.on::<PositionSet, _>(move |player, _| m.check_progress(*player));
        let m = Arc::clone(&manager);
        registry.on::<EnteredVehicleAsDriver, _>(move |player, _| m.check_progress(*player));
        let m = Arc::clone(&manager);
        registry.on::<LeftVehicleSeat, _>(move |player, _| m.check_progress(*player));

        let m = Arc::clone(&manager);
        registry.on::<PlayerDied, _>(move |player, _| {
            m.abandon(*player, "died");
            Ok(())
        });
        let m = Arc::clone(&manager);
        registry.on::<Disconnected, _>(move |player, _| {
            m.abandon(*player, "disconnected");
            Ok(())
        });

        manager
    }

    /// Start a new job for `player` over `objectives`.
    pub fn start(&self, player: PlayerId, objectives: Vec<Objective>) -> Result<Uuid, JobError> {
        if !self.players.contains(&player) {
            return Err(JobError::UnknownPlayer(player));
        }

        let mut job = Job::new();
        job.load_objectives(objectives);
        job.add_player(player)?;
        let id = job.id();

        let mut jobs = self.jobs.lock();
        if jobs.contains_key(&player) {
            return Err(JobError::AlreadyOnJob(player));
        }
        info!(%player, job = %id, objectives = job.len(), "Job started");
        jobs.insert(player, job);
        Ok(id)
    }

    /// Snapshot of the player's active job.
    #[must_use]
    pub fn active_job(&self, player: &PlayerId) -> Option<Job> {
        self.jobs.lock().get(player).cloned()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Drop the player's job without completing it.
    pub fn abandon(&self, player: PlayerId, reason: &str) -> Option<Job> {
        let job = self.jobs.lock().remove(&player)?;
        info!(%player, job = %job.id(), reason, "Job abandoned");
        Some(job)
    }

    fn check_progress(&self, player: PlayerId) -> HandlerResult {
        let Some(state) = self.players.get(&player) else {
            return Ok(());
        };

        let finished = {
            let mut jobs = self.jobs.lock();
            let Some(job) = jobs.get_mut(&player) else {
                return Ok(());
            };

            // One move can satisfy consecutive objectives.
            loop {
                let satisfied = job
                    .current_objective()
                    .is_some_and(|obj| obj.is_satisfied(&state.pos, state.in_vehicle()));
                if !satisfied {
                    break;
                }
                let done = job.advance();
                debug!(%player, job = %job.id(), progress = job.progress(), "Objective complete");
                if done {
                    break;
                }
            }

            if job.is_complete() {
                jobs.remove(&player)
            } else {
                None
            }
        };

        let Some(job) = finished else {
            return Ok(());
        };
        info!(%player, job = %job.id(), "Job complete");

        if let Some(registry) = self.registry.upgrade() {
            let mut args = EventArgs::new();
            args.insert("job".to_string(), serde_json::json!(job.id().to_string()));
            registry.dispatch_custom(&player, JOB_COMPLETE_EVENT, args)?;
        }
        Ok(())
    }
}
