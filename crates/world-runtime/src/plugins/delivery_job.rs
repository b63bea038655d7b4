//! Pizza delivery job: three on-foot waypoints, started with `/pizza`.

use std::sync::Arc;

use shared_bus::EventArgs;
use shared_types::{
    Blip, Marker, Objective, ObjectiveCriteria, ObjectiveType, Particle, Permission, Rgba,
    TextLabel, Vector3,
};
use tracing::info;

use crate::commands::CommandRegistry;
use crate::jobs::JobManager;
use crate::Registry;

/// Custom event that starts the job for the dispatching player.
pub const START_EVENT: &str = "job:pizza";

const WAYPOINT_RANGE: f32 = 2.0;

fn waypoint(description: &str, pos: Vector3, effect: &str) -> Objective {
    Objective {
        criteria: ObjectiveCriteria::NoVehicle,
        kind: ObjectiveType::Waypoint,
        description: description.to_string(),
        pos,
        range: WAYPOINT_RANGE,
        marker: Some(Marker {
            pos: pos.offset_z(-1.0),
            color: Rgba::new(255, 255, 255, 100),
            shape: 1,
        }),
        blip: Some(Blip {
            pos,
            sprite: 143,
            color: 26,
            text: "Objective Point".to_string(),
            scale: 0.1,
            short_range: false,
        }),
        particle: Some(Particle {
            pos,
            dict: "core".to_string(),
            name: effect.to_string(),
            duration_ms: 5000,
            scale: 5.0,
        }),
        text_label: None,
    }
}

/// Fresh copy of the job's objectives.
#[must_use]
pub fn objectives() -> Vec<Objective> {
    let last_pos = Vector3::new(-231.249_19, -718.907_96, 33.500_183);
    let mut last = waypoint("Walk to the last marker", last_pos, "ent_dst_wood_splinter");
    last.text_label = Some(TextLabel {
        pos: last_pos.offset_z(1.0),
        data: "The last object!~n~~r~NICE!".to_string(),
    });
    if let Some(blip) = last.blip.as_mut() {
        blip.pos = last_pos.offset_z(-1.0);
    }

    vec![
        waypoint(
            "Walk to the marker",
            Vector3::new(-241.429_21, -713.875_24, 33.495_613),
            "blood_chopper",
        ),
        waypoint(
            "Walk to the next marker",
            Vector3::new(-240.160_86, -724.736_9, 33.501_423),
            "exp_grd_plane_sp",
        ),
        last,
    ]
}

/// Register the `/pizza` command and the subscriber that starts the job.
pub fn install(registry: &Arc<Registry>, commands: &CommandRegistry, jobs: &Arc<JobManager>) {
    let jobs = Arc::clone(jobs);
    registry.on_custom(START_EVENT, move |player, _| {
        let id = jobs.start(*player, objectives())?;
        info!(%player, job = %id, "Pizza delivery started");
        Ok(())
    });

    let registry = Arc::clone(registry);
    commands.add_command("pizza", "/pizza", Permission::Admin, move |player, _| {
        registry.dispatch_custom(player, START_EVENT, EventArgs::new())?;
        Ok(())
    });
}
