//! # Shared Types Crate
//!
//! Domain records shared by lifecycle producers, the event registry and
//! every consumer.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Payload records are defined once, here.
//! - **Handles, not owners**: `PlayerId` and `VehicleHandle` are plain
//!   copyable handles; holding one never extends an entity's lifetime.

pub mod entities;
pub mod errors;
pub mod job;
pub mod permissions;

pub use entities::*;
pub use errors::*;
pub use job::*;
pub use permissions::Permission;
