//! # Entity Lifecycle Subsystem
//!
//! The producer side of the event registry. Every operation here first
//! mutates the player's state, releases the table lock, and then dispatches
//! the matching lifecycle event. Handlers therefore always observe the new
//! state, and may call back into this subsystem.
//!
//! Changes made directly to a `PlayerState` snapshot never dispatch
//! anything; only these operations do.
//!
//! A handler error leaves the state change in place, except for `connect`
//! and `drop_item`: their callers never receive the new id on failure, so
//! the player or the drop is removed again before the error is returned.

mod state;
mod ticker;

pub use state::{PlayerState, Players};
pub use ticker::spawn_play_time_ticker;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use shared_bus::{
    AccountDataSet, ArmourSet, CharacterSelected, Disconnected, EnteredVehicleAsDriver,
    HandlerError, HealthSet, ItemDropped, ItemEquipped, ItemPickedUp, ItemUnequipped,
    LeftVehicleSeat, PlayTimeIncreased, PlayerDied, PlayerEventPayload, PositionSet, Respawned,
    SkinCleared, SkinSet, Spawned, UniformCleared, UniformSet, WeaponUnequipped,
};
use shared_types::{
    AccountData, Character, Document, InventoryType, Permission, PlayerId, StoredItem,
    VehicleHandle, Vector3, DRIVER_SEAT,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::Registry;

/// Errors from lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// No connected player has this id.
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// A numeric input was not a finite number.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    /// The player does not hold an item with this id.
    #[error("Item not held: {0}")]
    ItemNotHeld(String),

    /// No dropped item has this id.
    #[error("Unknown dropped item: {0}")]
    UnknownDrop(String),

    #[error("{0} is already in a vehicle")]
    AlreadyInVehicle(PlayerId),

    #[error("{0} is not in a vehicle")]
    NotInVehicle(PlayerId),

    /// A lifecycle handler failed; later handlers for that event did not run.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Upper bounds applied to health and armour.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_health: f32,
    pub max_armour: f32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_health: 200.0,
            max_armour: 100.0,
        }
    }
}

/// Owns the player table and dispatches lifecycle events for it.
pub struct PlayerLifecycle {
    registry: Arc<Registry>,
    players: Players,
    /// Items lying in the world, keyed by drop id.
    drops: Mutex<HashMap<String, StoredItem>>,
    limits: Limits,
    next_id: AtomicU32,
}

fn finite(field: &'static str, value: f64) -> Result<(), LifecycleError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LifecycleError::InvalidValue { field, value })
    }
}

impl PlayerLifecycle {
    #[must_use]
    pub fn new(registry: Arc<Registry>, limits: Limits) -> Self {
        Self {
            registry,
            players: Players::new(),
            drops: Mutex::new(HashMap::new()),
            limits,
            next_id: AtomicU32::new(1),
        }
    }

    /// Read handle to the player table.
    #[must_use]
    pub fn players(&self) -> &Players {
        &self.players
    }

    #[must_use]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    fn emit<P: PlayerEventPayload>(&self, player: PlayerId, payload: P) -> Result<(), LifecycleError> {
        self.registry.trigger(&player, payload)?;
        Ok(())
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Bring a new player into the world at `pos` with full health.
    ///
    /// If a `spawned` handler fails the player is removed again.
    pub fn connect(&self, pos: Vector3) -> Result<PlayerId, LifecycleError> {
        let player = PlayerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.players
            .insert(player, PlayerState::spawned_at(pos, self.limits.max_health));
        info!(%player, "Player connected");
        if let Err(e) = self.emit(player, Spawned) {
            // A handler may already have disconnected the player.
            let _ = self.players.remove(&player);
            warn!(%player, error = %e, "Spawn rejected, player removed");
            return Err(e);
        }
        Ok(player)
    }

    /// Bind a character document to the player.
    pub fn select_character(
        &self,
        player: PlayerId,
        character: Character,
    ) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            state.hours = character.hours;
            state.character = Some(character);
            Ok(())
        })?;
        self.emit(player, CharacterSelected)
    }

    pub fn set_account_data(
        &self,
        player: PlayerId,
        account: AccountData,
    ) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            state.account = Some(account.clone());
            Ok(())
        })?;
        self.emit(player, AccountDataSet { account })
    }

    /// Change the player's permission level. Dispatches nothing.
    pub fn set_permission(
        &self,
        player: PlayerId,
        permission: Permission,
    ) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            state.permission = permission;
            Ok(())
        })
    }

    /// Unbind the player from the world.
    ///
    /// The state is gone before handlers run; they only get the id and the
    /// document that was bound.
    pub fn disconnect(&self, player: PlayerId) -> Result<(), LifecycleError> {
        let state = self.players.remove(&player)?;
        let document = match state.character {
            Some(mut character) => {
                character.hours = state.hours;
                Document::Character(character)
            }
            None => Document::Custom(serde_json::Value::Null),
        };
        info!(%player, "Player disconnected");
        self.emit(
            player,
            Disconnected {
                id: player.0,
                document,
            },
        )
    }

    // =========================================================================
    // HEALTH, ARMOUR, POSITION
    // =========================================================================

    /// Set health, clamped to `[0, max_health]`. Dropping to zero kills the
    /// player and dispatches `player-died` after `player-health-set`. Any
    /// positive value revives a dead player.
    pub fn set_health(&self, player: PlayerId, value: f32) -> Result<(), LifecycleError> {
        finite("health", f64::from(value))?;
        let max = self.limits.max_health;
        let (old_value, died) = self.players.update(&player, |state| {
            let old = state.health;
            state.health = value.clamp(0.0, max);
            let died = state.health <= 0.0 && !state.dead;
            state.dead = state.health <= 0.0;
            Ok((old, died))
        })?;

        self.emit(player, HealthSet { old_value })?;
        if died {
            info!(%player, "Player died");
            self.emit(player, PlayerDied)?;
        }
        Ok(())
    }

    /// Set armour, clamped to `[0, max_armour]`.
    pub fn set_armour(&self, player: PlayerId, value: f32) -> Result<(), LifecycleError> {
        finite("armour", f64::from(value))?;
        let max = self.limits.max_armour;
        let old_value = self.players.update(&player, |state| {
            let old = state.armour;
            state.armour = value.clamp(0.0, max);
            Ok(old)
        })?;
        self.emit(player, ArmourSet { old_value })
    }

    pub fn set_position(&self, player: PlayerId, pos: Vector3) -> Result<(), LifecycleError> {
        for component in [pos.x, pos.y, pos.z] {
            finite("position", f64::from(component))?;
        }
        let old_value = self.players.update(&player, |state| {
            Ok(std::mem::replace(&mut state.pos, pos))
        })?;
        debug!(%player, x = pos.x, y = pos.y, z = pos.z, "Position set");
        self.emit(player, PositionSet { old_value })
    }

    /// Revive the player at `pos` with full health.
    pub fn respawn(&self, player: PlayerId, pos: Vector3) -> Result<(), LifecycleError> {
        let max = self.limits.max_health;
        self.players.update(&player, |state| {
            state.pos = pos;
            state.health = max;
            state.dead = false;
            Ok(())
        })?;
        info!(%player, "Player respawned");
        self.emit(player, Respawned)
    }

    // =========================================================================
    // INVENTORY
    // =========================================================================

    /// Put an item into the player's inventory. Dispatches nothing.
    pub fn give_item(&self, player: PlayerId, item: StoredItem) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            state.inventory.push(item);
            Ok(())
        })
    }

    /// Equip a slot. Equipping an already equipped slot is a no-op.
    pub fn equip(
        &self,
        player: PlayerId,
        slot: u32,
        inventory: InventoryType,
    ) -> Result<(), LifecycleError> {
        let changed = self
            .players
            .update(&player, |state| Ok(state.equipped.insert((inventory, slot))))?;
        if changed {
            self.emit(player, ItemEquipped { slot, inventory })?;
        }
        Ok(())
    }

    /// Unequip a slot. Weapons additionally dispatch
    /// `player-weapon-unequipped` after `item-unequipped`.
    pub fn unequip(
        &self,
        player: PlayerId,
        slot: u32,
        inventory: InventoryType,
    ) -> Result<(), LifecycleError> {
        let changed = self
            .players
            .update(&player, |state| Ok(state.equipped.remove(&(inventory, slot))))?;
        if !changed {
            return Ok(());
        }
        self.emit(player, ItemUnequipped { slot, inventory })?;
        if inventory.holds_weapons() {
            self.emit(player, WeaponUnequipped { slot, inventory })?;
        }
        Ok(())
    }

    /// Move an item from the player's inventory into the world. Returns the
    /// drop id to pick it up again.
    ///
    /// If a `drop-item` handler fails the item goes back into the player's
    /// inventory, or is discarded if the player is gone.
    pub fn drop_item(&self, player: PlayerId, item_id: &str) -> Result<String, LifecycleError> {
        let stored_item = self.players.update(&player, |state| {
            let index = state
                .inventory
                .iter()
                .position(|item| item.id == item_id)
                .ok_or_else(|| LifecycleError::ItemNotHeld(item_id.to_string()))?;
            Ok(state.inventory.remove(index))
        })?;

        let drop_id = Uuid::new_v4().to_string();
        self.drops.lock().insert(drop_id.clone(), stored_item.clone());
        if let Err(e) = self.emit(player, ItemDropped { stored_item }) {
            // A handler may already have picked it up.
            let restored = self.drops.lock().remove(&drop_id);
            if let Some(item) = restored {
                let _ = self.players.update(&player, |state| {
                    state.inventory.push(item);
                    Ok(())
                });
            }
            warn!(%player, error = %e, "Drop rejected, item returned");
            return Err(e);
        }
        Ok(drop_id)
    }

    /// Take a dropped item from the world into the player's inventory.
    ///
    /// The item stays in the world if the player is unknown.
    pub fn pickup_item(&self, player: PlayerId, drop_id: &str) -> Result<(), LifecycleError> {
        let item = self
            .drops
            .lock()
            .remove(drop_id)
            .ok_or_else(|| LifecycleError::UnknownDrop(drop_id.to_string()))?;
        let mut held = Some(item);
        let updated = self.players.update(&player, |state| {
            state.inventory.extend(held.take());
            Ok(())
        });
        if let Err(e) = updated {
            if let Some(item) = held {
                self.drops.lock().insert(drop_id.to_string(), item);
            }
            return Err(e);
        }
        self.emit(
            player,
            ItemPickedUp {
                id: drop_id.to_string(),
            },
        )
    }

    /// Number of items lying in the world.
    #[must_use]
    pub fn dropped_items(&self) -> usize {
        self.drops.lock().len()
    }

    // =========================================================================
    // APPEARANCE
    // =========================================================================

    pub fn set_skin(&self, player: PlayerId, model: impl Into<String>) -> Result<(), LifecycleError> {
        let model = model.into();
        self.players.update(&player, |state| {
            state.skin = Some(model);
            Ok(())
        })?;
        self.emit(player, SkinSet)
    }

    pub fn clear_skin(&self, player: PlayerId) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            state.skin = None;
            Ok(())
        })?;
        self.emit(player, SkinCleared)
    }

    pub fn set_uniform(
        &self,
        player: PlayerId,
        uniform: serde_json::Value,
    ) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            state.uniform = Some(uniform);
            Ok(())
        })?;
        self.emit(player, UniformSet)
    }

    pub fn clear_uniform(&self, player: PlayerId) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            state.uniform = None;
            Ok(())
        })?;
        self.emit(player, UniformCleared)
    }

    // =========================================================================
    // VEHICLES
    // =========================================================================

    /// Seat the player in a vehicle. Only the driver seat dispatches.
    pub fn enter_vehicle(
        &self,
        player: PlayerId,
        vehicle: VehicleHandle,
        seat: i32,
    ) -> Result<(), LifecycleError> {
        self.players.update(&player, |state| {
            if state.vehicle.is_some() {
                return Err(LifecycleError::AlreadyInVehicle(player));
            }
            state.vehicle = Some((vehicle, seat));
            Ok(())
        })?;
        if seat == DRIVER_SEAT {
            self.emit(player, EnteredVehicleAsDriver { vehicle })?;
        }
        Ok(())
    }

    pub fn leave_vehicle(&self, player: PlayerId) -> Result<(), LifecycleError> {
        let (vehicle, seat) = self.players.update(&player, |state| {
            state
                .vehicle
                .take()
                .ok_or(LifecycleError::NotInVehicle(player))
        })?;
        self.emit(player, LeftVehicleSeat { vehicle, seat })
    }

    // =========================================================================
    // PLAY TIME
    // =========================================================================

    /// Add `hours` to the player's play time and dispatch the new total.
    pub fn add_play_time(&self, player: PlayerId, hours: f64) -> Result<f64, LifecycleError> {
        finite("hours", hours)?;
        let new_hours = self.players.update(&player, |state| {
            state.hours += hours;
            Ok(state.hours)
        })?;
        self.emit(player, PlayTimeIncreased { new_hours })?;
        Ok(new_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{LifecycleEvent, PlayerEventKey};

    fn setup() -> (Arc<Registry>, PlayerLifecycle, Arc<Mutex<Vec<String>>>) {
        let registry = Arc::new(Registry::new());
        let trace = Arc::new(Mutex::new(Vec::new()));
        for key in PlayerEventKey::ALL {
            let sink = Arc::clone(&trace);
            registry.register(*key, move |_: &PlayerId, event: &LifecycleEvent| {
                sink.lock().push(event.key().to_string());
                Ok(())
            });
        }
        let lifecycle = PlayerLifecycle::new(Arc::clone(&registry), Limits::default());
        (registry, lifecycle, trace)
    }

    #[test]
    fn test_connect_dispatches_spawned() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();

        assert_eq!(player, PlayerId(1));
        assert_eq!(*trace.lock(), vec!["spawned"]);
        assert_eq!(lifecycle.players().get(&player).unwrap().health, 200.0);
    }

    #[test]
    fn test_health_to_zero_dies_after_health_set() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        trace.lock().clear();

        lifecycle.set_health(player, -10.0).unwrap();
        lifecycle.set_health(player, 0.0).unwrap();

        assert_eq!(
            *trace.lock(),
            vec!["player-health-set", "player-died", "player-health-set"]
        );
        assert!(lifecycle.players().get(&player).unwrap().dead);
    }

    #[test]
    fn test_health_payload_carries_old_value() {
        let (registry, lifecycle, _trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        registry.on::<HealthSet, _>(move |_, payload| {
            sink.lock().push(payload.old_value);
            Ok(())
        });

        lifecycle.set_health(player, 50.0).unwrap();
        lifecycle.set_health(player, 500.0).unwrap();

        assert_eq!(*seen.lock(), vec![200.0, 50.0]);
        assert_eq!(lifecycle.players().get(&player).unwrap().health, 200.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        trace.lock().clear();

        let err = lifecycle.set_armour(player, f32::NAN).unwrap_err();

        assert!(matches!(err, LifecycleError::InvalidValue { field: "armour", .. }));
        assert!(trace.lock().is_empty());
    }

    #[test]
    fn test_unequip_weapon_dispatches_both() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        trace.lock().clear();

        lifecycle.equip(player, 0, InventoryType::Toolbar).unwrap();
        lifecycle.equip(player, 0, InventoryType::Toolbar).unwrap();
        lifecycle.unequip(player, 0, InventoryType::Toolbar).unwrap();
        lifecycle.unequip(player, 0, InventoryType::Toolbar).unwrap();

        assert_eq!(
            *trace.lock(),
            vec!["item-equipped", "item-unequipped", "player-weapon-unequipped"]
        );
    }

    #[test]
    fn test_drop_and_pickup() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        lifecycle
            .give_item(player, StoredItem::new("burger", 2))
            .unwrap();
        trace.lock().clear();

        let drop_id = lifecycle.drop_item(player, "burger").unwrap();
        assert_eq!(lifecycle.dropped_items(), 1);
        assert!(lifecycle.players().get(&player).unwrap().inventory.is_empty());

        lifecycle.pickup_item(player, &drop_id).unwrap();
        assert_eq!(lifecycle.dropped_items(), 0);

        assert_eq!(*trace.lock(), vec!["drop-item", "pickup-item"]);
        assert!(matches!(
            lifecycle.drop_item(player, "fries"),
            Err(LifecycleError::ItemNotHeld(_))
        ));
        assert!(matches!(
            lifecycle.pickup_item(player, &drop_id),
            Err(LifecycleError::UnknownDrop(_))
        ));
    }

    #[test]
    fn test_vehicle_seats() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        trace.lock().clear();

        lifecycle.enter_vehicle(player, VehicleHandle(5), 0).unwrap();
        assert!(matches!(
            lifecycle.enter_vehicle(player, VehicleHandle(6), DRIVER_SEAT),
            Err(LifecycleError::AlreadyInVehicle(_))
        ));
        lifecycle.leave_vehicle(player).unwrap();
        lifecycle
            .enter_vehicle(player, VehicleHandle(5), DRIVER_SEAT)
            .unwrap();

        assert_eq!(
            *trace.lock(),
            vec!["player-left-vehicle-seat", "player-entered-vehicle-as-driver"]
        );
    }

    #[test]
    fn test_disconnect_carries_document() {
        let (registry, lifecycle, _trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        let mut character = Character::new("c-1", "Ada");
        character.hours = 2.0;
        lifecycle.select_character(player, character).unwrap();
        lifecycle.add_play_time(player, 0.5).unwrap();

        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        registry.on::<Disconnected, _>(move |_, payload| {
            *sink.lock() = Some(payload.clone());
            Ok(())
        });

        lifecycle.disconnect(player).unwrap();

        let payload = seen.lock().clone().unwrap();
        assert_eq!(payload.id, 1);
        let document = payload.document.as_character().unwrap();
        assert_eq!(document.name, "Ada");
        assert!((document.hours - 2.5).abs() < f64::EPSILON);
        assert!(lifecycle.players().is_empty());
    }

    #[test]
    fn test_unknown_player() {
        let (_registry, lifecycle, trace) = setup();
        assert!(matches!(
            lifecycle.set_position(PlayerId(42), Vector3::default()),
            Err(LifecycleError::UnknownPlayer(PlayerId(42)))
        ));
        assert!(trace.lock().is_empty());
    }

    #[test]
    fn test_handler_error_surfaces_after_state_change() {
        let (registry, lifecycle, _trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        registry.on::<SkinSet, _>(|_, _| Err(anyhow::anyhow!("no such model")));

        let err = lifecycle.set_skin(player, "mp_m_freemode_01").unwrap_err();

        assert!(matches!(err, LifecycleError::Handler(_)));
        assert_eq!(err.to_string(), "no such model");
        assert_eq!(
            lifecycle.players().get(&player).unwrap().skin.as_deref(),
            Some("mp_m_freemode_01")
        );
    }

    #[test]
    fn test_failed_spawn_removes_player() {
        let (registry, lifecycle, trace) = setup();
        registry.on::<Spawned, _>(|_, _| Err(anyhow::anyhow!("ban list hit")));

        let err = lifecycle.connect(Vector3::default()).unwrap_err();

        assert_eq!(err.to_string(), "ban list hit");
        assert!(lifecycle.players().is_empty());
        assert_eq!(*trace.lock(), vec!["spawned"]);
    }

    #[test]
    fn test_failed_drop_returns_item() {
        let (registry, lifecycle, _trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        lifecycle
            .give_item(player, StoredItem::new("burger", 1))
            .unwrap();
        registry.on::<ItemDropped, _>(|_, _| Err(anyhow::anyhow!("no dropping here")));

        assert!(lifecycle.drop_item(player, "burger").is_err());

        assert_eq!(lifecycle.dropped_items(), 0);
        let inventory = lifecycle.players().get(&player).unwrap().inventory;
        assert_eq!(inventory, vec![StoredItem::new("burger", 1)]);
    }

    #[test]
    fn test_pickup_by_unknown_player_keeps_drop() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        lifecycle
            .give_item(player, StoredItem::new("burger", 1))
            .unwrap();
        let drop_id = lifecycle.drop_item(player, "burger").unwrap();
        trace.lock().clear();

        assert!(matches!(
            lifecycle.pickup_item(PlayerId(42), &drop_id),
            Err(LifecycleError::UnknownPlayer(PlayerId(42)))
        ));
        assert_eq!(lifecycle.dropped_items(), 1);
        assert!(trace.lock().is_empty());

        lifecycle.pickup_item(player, &drop_id).unwrap();
        assert_eq!(lifecycle.dropped_items(), 0);
    }

    #[test]
    fn test_heal_revives_and_death_fires_again() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        trace.lock().clear();

        lifecycle.set_health(player, 0.0).unwrap();
        lifecycle.set_health(player, 120.0).unwrap();
        let state = lifecycle.players().get(&player).unwrap();
        assert!(!state.dead);
        assert_eq!(state.health, 120.0);

        lifecycle.set_health(player, 0.0).unwrap();

        let died = trace
            .lock()
            .iter()
            .filter(|key| key.as_str() == "player-died")
            .count();
        assert_eq!(died, 2);
    }

    #[test]
    fn test_respawn_restores_health() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        lifecycle.set_health(player, 0.0).unwrap();
        trace.lock().clear();

        let pos = Vector3::new(1.0, 2.0, 3.0);
        lifecycle.respawn(player, pos).unwrap();

        let state = lifecycle.players().get(&player).unwrap();
        assert!(!state.dead);
        assert_eq!(state.health, lifecycle.limits().max_health);
        assert_eq!(state.pos, pos);
        assert_eq!(*trace.lock(), vec!["respawned"]);
    }

    #[test]
    fn test_armour_clamped_to_limit() {
        let (_registry, lifecycle, _trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();

        lifecycle.set_armour(player, 1000.0).unwrap();

        assert_eq!(
            lifecycle.players().get(&player).unwrap().armour,
            lifecycle.limits().max_armour
        );
    }

    #[test]
    fn test_appearance_events() {
        let (_registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        trace.lock().clear();

        lifecycle.set_skin(player, "mp_f_freemode_01").unwrap();
        lifecycle
            .set_uniform(player, serde_json::json!({ "torso": 55 }))
            .unwrap();
        let state = lifecycle.players().get(&player).unwrap();
        assert_eq!(state.skin.as_deref(), Some("mp_f_freemode_01"));
        assert_eq!(state.uniform, Some(serde_json::json!({ "torso": 55 })));

        lifecycle.clear_uniform(player).unwrap();
        lifecycle.clear_skin(player).unwrap();
        let state = lifecycle.players().get(&player).unwrap();
        assert!(state.skin.is_none());
        assert!(state.uniform.is_none());

        assert_eq!(
            *trace.lock(),
            vec![
                "player-skin-set",
                "player-uniform-set",
                "player-uniform-cleared",
                "player-skin-cleared"
            ]
        );
    }

    #[test]
    fn test_character_and_account_data() {
        let (registry, lifecycle, trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        registry.on::<AccountDataSet, _>(move |_, payload| {
            *sink.lock() = Some(payload.account.clone());
            Ok(())
        });
        trace.lock().clear();

        let mut character = Character::new("c-9", "Grace");
        character.hours = 4.0;
        lifecycle.select_character(player, character).unwrap();

        let mut account = AccountData::new();
        account.insert("discord".to_string(), serde_json::json!("1234"));
        lifecycle.set_account_data(player, account.clone()).unwrap();

        let state = lifecycle.players().get(&player).unwrap();
        assert_eq!(state.character.as_ref().map(|c| c.name.as_str()), Some("Grace"));
        assert_eq!(state.hours, 4.0);
        assert_eq!(state.account.as_ref(), Some(&account));
        assert_eq!(seen.lock().as_ref(), Some(&account));
        assert_eq!(*trace.lock(), vec!["selected-character", "set-account-data"]);
    }

    #[test]
    fn test_equip_payload_fields() {
        let (registry, lifecycle, _trace) = setup();
        let player = lifecycle.connect(Vector3::default()).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        registry.on::<ItemEquipped, _>(move |_, payload| {
            sink.lock().push((payload.slot, payload.inventory));
            Ok(())
        });

        lifecycle.equip(player, 3, InventoryType::Equipment).unwrap();
        lifecycle.equip(player, 1, InventoryType::Toolbar).unwrap();

        assert_eq!(
            *seen.lock(),
            vec![(3, InventoryType::Equipment), (1, InventoryType::Toolbar)]
        );
    }
}
