//! A single job instance: an ordered objective list walked by one player.

use shared_types::{Objective, PlayerId};
use uuid::Uuid;

use super::JobError;

/// An ordered sequence of objectives assigned to one player.
#[derive(Debug, Clone)]
pub struct Job {
    id: Uuid,
    objectives: Vec<Objective>,
    current: usize,
    player: Option<PlayerId>,
}

impl Job {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            objectives: Vec::new(),
            current: 0,
            player: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append objectives after any already loaded.
    pub fn load_objectives(&mut self, objectives: Vec<Objective>) {
        self.objectives.extend(objectives);
    }

    /// Assign the player who walks this job.
    pub fn add_player(&mut self, player: PlayerId) -> Result<(), JobError> {
        if self.objectives.is_empty() {
            return Err(JobError::NoObjectives);
        }
        self.player = Some(player);
        Ok(())
    }

    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        self.player
    }

    #[must_use]
    pub fn current_objective(&self) -> Option<&Objective> {
        self.objectives.get(self.current)
    }

    /// Index of the current objective.
    #[must_use]
    pub fn progress(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.objectives.is_empty() && self.current >= self.objectives.len()
    }

    /// Move past the current objective. Returns `true` once every objective
    /// is done.
    pub fn advance(&mut self) -> bool {
        if self.current < self.objectives.len() {
            self.current += 1;
        }
        self.is_complete()
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}
