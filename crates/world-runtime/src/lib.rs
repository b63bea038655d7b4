//! # World Runtime
//!
//! Game-server side of the entity lifecycle event system. The
//! [`lifecycle`] subsystem is the only producer of built-in player events;
//! [`jobs`], [`commands`] and [`plugins`] are consumers that subscribe
//! through one shared [`Registry`].
//!
//! ```text
//! ┌────────────────┐  trigger   ┌─────────────────┐  callbacks  ┌──────────────┐
//! │ PlayerLifecycle│ ─────────▶ │ EventRegistry   │ ──────────▶ │ JobManager   │
//! │ (state + emit) │            │ <PlayerId>      │             │ session log  │
//! └────────────────┘            └─────────────────┘             │ delivery job │
//!        ▲                              ▲                       └──────────────┘
//!        │ play time                    │ dispatch_custom
//! ┌────────────────┐            ┌─────────────────┐
//! │ ticker task    │            │ CommandRegistry │ ◀── chat
//! └────────────────┘            └─────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod jobs;
pub mod lifecycle;
pub mod logging;
pub mod plugins;
pub mod runtime;

/// Registry specialised to player entities.
pub type Registry = shared_bus::EventRegistry<shared_types::PlayerId>;

pub use commands::{CommandError, CommandRegistry};
pub use config::{ConfigError, RuntimeConfig};
pub use jobs::{Job, JobError, JobManager, JOB_COMPLETE_EVENT};
pub use lifecycle::{LifecycleError, Limits, PlayerLifecycle, PlayerState, Players};
pub use logging::init_logging;
pub use runtime::WorldRuntime;
