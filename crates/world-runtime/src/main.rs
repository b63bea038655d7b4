//! # World Runtime
//!
//! Entry point. Loads configuration, installs logging, wires every
//! subsystem onto the shared event registry and runs a short scripted
//! session before waiting for Ctrl+C.

use anyhow::{Context, Result};
use shared_types::{Character, Permission, Vector3};
use tracing::info;

use world_runtime::plugins::delivery_job;
use world_runtime::{init_logging, RuntimeConfig, WorldRuntime};

/// Connect one admin, run `/pizza`, walk the three waypoints and leave.
fn scripted_session(runtime: &WorldRuntime) -> Result<()> {
    let lifecycle = runtime.lifecycle();

    let player = lifecycle
        .connect(Vector3::new(-245.0, -715.0, 33.5))
        .context("connect")?;
    lifecycle.select_character(player, Character::new("char-1", "Pizza Runner"))?;
    lifecycle.set_permission(player, Permission::Admin)?;

    runtime
        .handle_chat(player, "/pizza")
        .context("running /pizza")?;

    for objective in delivery_job::objectives() {
        info!(%player, target = %objective.description, "Walking");
        lifecycle.set_position(player, objective.pos)?;
    }

    info!(
        %player,
        active_jobs = runtime.jobs().active_count(),
        events = runtime.registry().events_dispatched(),
        "Scripted session finished"
    );

    lifecycle.disconnect(player)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("loading configuration")?;
    init_logging(&config)?;

    let runtime = WorldRuntime::new(config);
    let ticker = runtime.start();
    info!(
        command_prefix = runtime.commands().prefix(),
        json_logs = runtime.config().json_logs,
        "World runtime started"
    );

    scripted_session(&runtime)?;

    info!("World is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown();
    ticker.await.context("play time ticker panicked")?;

    Ok(())
}
