//! # Shared Bus - Lifecycle Event Registry
//!
//! Typed publish/subscribe for events tied to a tracked entity.
//!
//! ## How It Works
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Lifecycle   │                    │   Consumer   │
//! │  producer    │    dispatch()      │   module     │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ EventRegistry│          │
//!                  │ (in order)   │ ─────────┘
//!                  └──────────────┘  register()
//! ```
//!
//! ## Rules
//!
//! - **Append-only:** subscriptions are never removed.
//! - **Ordered:** callbacks for one key run in registration order.
//! - **Synchronous:** `dispatch` returns after every callback has run, or
//!   after the first one that failed.
//! - **Typed payloads:** each built-in key is bound to one payload struct.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod registry;

// Re-export main types
pub use events::{
    AccountDataSet, ArmourSet, CharacterSelected, CustomEvent, Disconnected,
    EnteredVehicleAsDriver, EventArgs, EventKey, HealthSet, ItemDropped, ItemEquipped,
    ItemPickedUp, ItemUnequipped, LeftVehicleSeat, LifecycleEvent, PlayTimeIncreased,
    PlayerDied, PlayerEventKey, PlayerEventPayload, PositionSet, Respawned, SkinCleared, SkinSet,
    Spawned, UniformCleared, UniformSet, WeaponUnequipped,
};
pub use registry::{EventRegistry, HandlerError, HandlerResult, SubscriptionId};
