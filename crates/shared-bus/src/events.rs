//! # Lifecycle Events
//!
//! Defines every event that flows through the registry, the keys that
//! address them, and the payload contract bound to each key.
//!
//! Each built-in key has exactly one payload struct. The struct, the key and
//! the `LifecycleEvent` variant share a name, so a callback registered with
//! [`EventRegistry::on`](crate::EventRegistry::on) can only ever see the
//! payload shape its key promises.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::entities::{
    AccountData, Document, InventoryType, StoredItem, VehicleHandle, Vector3,
};
use shared_types::errors::ParseError;

/// Key-value container carried by caller-defined events.
pub type EventArgs = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// PAYLOADS: INVENTORY
// =============================================================================

/// An item moved from unequipped to equipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEquipped {
    pub slot: u32,
    pub inventory: InventoryType,
}

/// An item was unequipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUnequipped {
    pub slot: u32,
    pub inventory: InventoryType,
}

/// A weapon was unequipped. Fired in addition to [`ItemUnequipped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponUnequipped {
    pub slot: u32,
    pub inventory: InventoryType,
}

/// The player dropped an item into the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDropped {
    pub stored_item: StoredItem,
}

/// The player picked up an item.
///
/// `id` references the item in the database or in the world drop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPickedUp {
    pub id: String,
}

// =============================================================================
// PAYLOADS: LIFE & APPEARANCE (entity handle only)
// =============================================================================

/// The player spawned into the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawned;

/// The player died.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDied;

/// The player was respawned by the lifecycle subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Respawned;

/// The player selected a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSelected;

/// The player's model was set to a non-multiplayer model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinSet;

/// The player's model was cleared back to a multiplayer model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinCleared;

/// A uniform was set on the character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformSet;

/// The character's uniform was cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformCleared;

// =============================================================================
// PAYLOADS: STATE CHANGES
// =============================================================================

/// Health was changed through the lifecycle subsystem. Carries the value
/// before the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSet {
    pub old_value: f32,
}

/// Armour was changed through the lifecycle subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmourSet {
    pub old_value: f32,
}

/// Position was changed through the lifecycle subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSet {
    pub old_value: Vector3,
}

/// Play time accrued. `new_hours` is the new total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayTimeIncreased {
    pub new_hours: f64,
}

// =============================================================================
// PAYLOADS: VEHICLES
// =============================================================================

/// The player took the driver seat of a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnteredVehicleAsDriver {
    pub vehicle: VehicleHandle,
}

/// The player left a vehicle seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeftVehicleSeat {
    pub vehicle: VehicleHandle,
    pub seat: i32,
}

// =============================================================================
// PAYLOADS: SESSION
// =============================================================================

/// The player id was unbound from its document.
///
/// By the time this fires the player is gone from the world; handlers must
/// only use `id` and `document`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disconnected {
    pub id: u32,
    pub document: Document,
}

/// Account data was attached to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountDataSet {
    pub account: AccountData,
}

// =============================================================================
// CUSTOM EVENTS
// =============================================================================

/// A caller-defined event outside the built-in set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub name: String,
    #[serde(default)]
    pub args: EventArgs,
}

impl CustomEvent {
    #[must_use]
    pub fn new(name: impl Into<String>, args: EventArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

// =============================================================================
// KEYS & EVENT ENUM
// =============================================================================

/// A payload bound to exactly one built-in key.
pub trait PlayerEventPayload: Sized + Send + Sync + 'static {
    /// The key this payload is dispatched under.
    const KEY: PlayerEventKey;

    /// Wrap the payload in its event variant.
    fn into_event(self) -> LifecycleEvent;

    /// Borrow the payload back out of an event, if the variant matches.
    fn from_event(event: &LifecycleEvent) -> Option<&Self>;
}

macro_rules! player_events {
    ($( $(#[$meta:meta])* $variant:ident => $wire:literal ),* $(,)?) => {
        /// Closed set of built-in lifecycle event names.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PlayerEventKey {
            $( $(#[$meta])* #[serde(rename = $wire)] $variant, )*
        }

        impl PlayerEventKey {
            /// Every built-in key, in declaration order.
            pub const ALL: &[PlayerEventKey] = &[$(Self::$variant),*];

            /// Stable kebab-case wire name.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )*
                }
            }
        }

        impl FromStr for PlayerEventKey {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire => Ok(Self::$variant), )*
                    other => Err(ParseError::UnknownEventKey(other.to_string())),
                }
            }
        }

        /// An event together with its payload.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "event", content = "payload")]
        pub enum LifecycleEvent {
            $( #[serde(rename = $wire)] $variant($variant), )*
            #[serde(rename = "custom")]
            Custom(CustomEvent),
        }

        impl LifecycleEvent {
            /// The key this event is dispatched under.
            #[must_use]
            pub fn key(&self) -> EventKey {
                match self {
                    $( Self::$variant(_) => EventKey::Player(PlayerEventKey::$variant), )*
                    Self::Custom(custom) => EventKey::Custom(custom.name.clone()),
                }
            }
        }

        $(
            impl PlayerEventPayload for $variant {
                const KEY: PlayerEventKey = PlayerEventKey::$variant;

                fn into_event(self) -> LifecycleEvent {
                    LifecycleEvent::$variant(self)
                }

                fn from_event(event: &LifecycleEvent) -> Option<&Self> {
                    match event {
                        LifecycleEvent::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for LifecycleEvent {
                fn from(payload: $variant) -> Self {
                    payload.into_event()
                }
            }
        )*
    };
}

player_events! {
    ItemDropped => "drop-item",
    PlayTimeIncreased => "increased-play-time",
    ItemEquipped => "item-equipped",
    ItemUnequipped => "item-unequipped",
    ItemPickedUp => "pickup-item",
    ArmourSet => "player-armour-set",
    PlayerDied => "player-died",
    Disconnected => "player-disconnected",
    EnteredVehicleAsDriver => "player-entered-vehicle-as-driver",
    HealthSet => "player-health-set",
    LeftVehicleSeat => "player-left-vehicle-seat",
    PositionSet => "player-pos-set",
    SkinCleared => "player-skin-cleared",
    SkinSet => "player-skin-set",
    UniformCleared => "player-uniform-cleared",
    UniformSet => "player-uniform-set",
    WeaponUnequipped => "player-weapon-unequipped",
    Respawned => "respawned",
    CharacterSelected => "selected-character",
    AccountDataSet => "set-account-data",
    Spawned => "spawned",
}

impl fmt::Display for PlayerEventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a subscription.
///
/// Built-in and custom keys share one dispatch table but never compare
/// equal: `Custom("player-died")` does not match `Player(PlayerDied)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKey {
    Player(PlayerEventKey),
    Custom(String),
}

impl EventKey {
    /// Key for a caller-defined event.
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }
}

impl From<PlayerEventKey> for EventKey {
    fn from(key: PlayerEventKey) -> Self {
        Self::Player(key)
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(key) => f.write_str(key.as_str()),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

impl From<CustomEvent> for LifecycleEvent {
    fn from(event: CustomEvent) -> Self {
        Self::Custom(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for key in PlayerEventKey::ALL {
            assert_eq!(key.as_str().parse::<PlayerEventKey>().unwrap(), *key);
        }
        assert_eq!(PlayerEventKey::ALL.len(), 21);
    }

    #[test]
    fn test_unknown_wire_name() {
        let err = "never-registered-key".parse::<PlayerEventKey>().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownEventKey("never-registered-key".to_string())
        );
    }

    #[test]
    fn test_event_key_mapping() {
        let event = LifecycleEvent::from(HealthSet { old_value: 50.0 });
        assert_eq!(event.key(), EventKey::Player(PlayerEventKey::HealthSet));

        let custom = LifecycleEvent::from(CustomEvent::new("job:pizza", EventArgs::new()));
        assert_eq!(custom.key(), EventKey::custom("job:pizza"));
    }

    #[test]
    fn test_custom_key_never_equals_builtin() {
        let custom = EventKey::custom("player-died");
        assert_ne!(custom, EventKey::from(PlayerEventKey::PlayerDied));
        assert_eq!(custom.to_string(), "custom:player-died");
    }

    #[test]
    fn test_payload_extraction() {
        let event = ItemPickedUp { id: "abc".into() }.into_event();
        assert_eq!(ItemPickedUp::from_event(&event).map(|p| p.id.as_str()), Some("abc"));
        assert!(ItemDropped::from_event(&event).is_none());
    }

    #[test]
    fn test_serialized_tag_uses_wire_name() {
        let event = LifecycleEvent::from(HealthSet { old_value: 50.0 });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "player-health-set");
        assert_eq!(json["payload"]["old_value"], 50.0);
    }

    #[test]
    fn test_events_deserialize_from_wire_form() {
        let mut args = EventArgs::new();
        args.insert("job".to_string(), serde_json::json!("abc"));
        let events = vec![
            LifecycleEvent::from(Spawned),
            LifecycleEvent::from(ItemEquipped {
                slot: 2,
                inventory: InventoryType::Toolbar,
            }),
            LifecycleEvent::from(ItemDropped {
                stored_item: StoredItem::new("burger", 3),
            }),
            LifecycleEvent::from(PositionSet {
                old_value: Vector3::new(1.0, 2.0, 3.0),
            }),
            LifecycleEvent::from(Disconnected {
                id: 7,
                document: Document::Custom(serde_json::json!({ "guest": true })),
            }),
            LifecycleEvent::from(CustomEvent::new("job-complete", args)),
        ];

        for event in events {
            let json = serde_json::to_string(&event).unwrap();
            let back: LifecycleEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, event);
        }
    }

    #[test]
    fn test_deserialize_hand_written_event() {
        let event: LifecycleEvent = serde_json::from_str(
            r#"{"event":"player-left-vehicle-seat","payload":{"vehicle":12,"seat":-1}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            LifecycleEvent::from(LeftVehicleSeat {
                vehicle: VehicleHandle(12),
                seat: -1,
            })
        );
        assert_eq!(
            event.key(),
            EventKey::Player(PlayerEventKey::LeftVehicleSeat)
        );
    }
}
