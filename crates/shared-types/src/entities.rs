//! # Core World Entities
//!
//! Records that travel with lifecycle events between the entity lifecycle
//! subsystem and its consumers.
//!
//! ## Clusters
//!
//! - **Handles**: `PlayerId`, `VehicleHandle`
//! - **Geometry**: `Vector3`
//! - **Inventory**: `InventoryType`, `StoredItem`
//! - **Documents**: `Character`, `Document`, `AccountData`

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// CLUSTER A: HANDLES
// =============================================================================

/// Opaque handle for a connected player.
///
/// The handle is owned by the caller; holders of a handle never own the
/// player's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Opaque handle for a vehicle in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleHandle(pub u32);

impl fmt::Display for VehicleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle#{}", self.0)
    }
}

/// Seat index of a vehicle's driver.
pub const DRIVER_SEAT: i32 = -1;

// =============================================================================
// CLUSTER B: GEOMETRY
// =============================================================================

/// A position or offset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Create a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Vector3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Copy of this vector shifted along the z axis.
    #[must_use]
    pub fn offset_z(&self, dz: f32) -> Self {
        Self::new(self.x, self.y, self.z + dz)
    }
}

// =============================================================================
// CLUSTER C: INVENTORY
// =============================================================================

/// Which inventory a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InventoryType {
    /// General-purpose backpack slots.
    Inventory,
    /// Worn equipment (hats, vests, ...).
    Equipment,
    /// Quick-access toolbar; weapons live here.
    Toolbar,
}

impl InventoryType {
    /// Whether unequipping from this inventory counts as unequipping a weapon.
    #[must_use]
    pub fn holds_weapons(&self) -> bool {
        matches!(self, Self::Toolbar)
    }
}

/// An item as it is stored in an inventory or dropped into the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    /// Database id of the item definition.
    pub id: String,
    /// Number of units in the stack.
    pub quantity: u32,
    /// Free-form item data (durability, ammo, ...).
    #[serde(default)]
    pub data: serde_json::Value,
}

impl StoredItem {
    /// Create a stack of `quantity` units with no extra data.
    #[must_use]
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
            data: serde_json::Value::Null,
        }
    }
}

// =============================================================================
// CLUSTER D: DOCUMENTS
// =============================================================================

/// The persisted character a player is playing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Character {
    /// Database id of the character document.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Total hours played on this character.
    pub hours: f64,
    /// Application-specific fields (uniform, appearance, ...).
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Character {
    /// Create a character with no play time and no extra data.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The document bound to a player at disconnect time.
///
/// Applications that persist their own character shape use `Custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Document {
    Character(Character),
    Custom(serde_json::Value),
}

impl Document {
    /// The character record, if this is one.
    #[must_use]
    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Self::Character(c) => Some(c),
            Self::Custom(_) => None,
        }
    }
}

/// Implementation-specific account payload.
pub type AccountData = serde_json::Map<String, serde_json::Value>;
