//! Gameplay plugins built on the lifecycle, job and command subsystems.

pub mod delivery_job;
