//! # Player State Table
//!
//! Shared, lock-guarded view of every connected player. The lifecycle
//! subsystem is the only writer; other subsystems read snapshots.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{
    AccountData, Character, InventoryType, Permission, PlayerId, StoredItem, VehicleHandle, Vector3,
};

use super::LifecycleError;

/// Everything the lifecycle subsystem tracks about one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub pos: Vector3,
    pub health: f32,
    pub armour: f32,
    pub dead: bool,
    /// Hours played this session, seeded from the selected character.
    pub hours: f64,
    pub character: Option<Character>,
    pub account: Option<AccountData>,
    pub permission: Permission,
    pub inventory: Vec<StoredItem>,
    pub equipped: HashSet<(InventoryType, u32)>,
    /// Current vehicle and seat index.
    pub vehicle: Option<(VehicleHandle, i32)>,
    pub skin: Option<String>,
    pub uniform: Option<serde_json::Value>,
}

impl PlayerState {
    pub(crate) fn spawned_at(pos: Vector3, health: f32) -> Self {
        Self {
            pos,
            health,
            armour: 0.0,
            dead: false,
            hours: 0.0,
            character: None,
            account: None,
            permission: Permission::None,
            inventory: Vec::new(),
            equipped: HashSet::new(),
            vehicle: None,
            skin: None,
            uniform: None,
        }
    }

    #[must_use]
    pub fn in_vehicle(&self) -> bool {
        self.vehicle.is_some()
    }
}

/// Cheaply cloneable handle to the player table.
#[derive(Debug, Clone, Default)]
pub struct Players {
    inner: Arc<RwLock<HashMap<PlayerId, PlayerState>>>,
}

impl Players {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one player's state.
    #[must_use]
    pub fn get(&self, player: &PlayerId) -> Option<PlayerState> {
        self.inner.read().get(player).cloned()
    }

    #[must_use]
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.inner.read().contains_key(player)
    }

    /// Ids of every connected player, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.inner.read().keys().copied().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&self, player: PlayerId, state: PlayerState) {
        self.inner.write().insert(player, state);
    }

    pub(crate) fn remove(&self, player: &PlayerId) -> Result<PlayerState, LifecycleError> {
        self.inner
            .write()
            .remove(player)
            .ok_or(LifecycleError::UnknownPlayer(*player))
    }

    /// Mutate one player's state under the write lock.
    ///
    /// The lock is released before this returns, so callers can dispatch
    /// afterwards without holding it.
    pub(crate) fn update<R>(
        &self,
        player: &PlayerId,
        f: impl FnOnce(&mut PlayerState) -> Result<R, LifecycleError>,
    ) -> Result<R, LifecycleError> {
        let mut players = self.inner.write();
        let state = players
            .get_mut(player)
            .ok_or(LifecycleError::UnknownPlayer(*player))?;
        f(state)
    }
}
