//! # Job Objective Records
//!
//! Static descriptions of the ordered steps of a job. The job subsystem
//! consumes these; nothing here carries behaviour beyond simple checks.

use serde::{Deserialize, Serialize};

use crate::entities::Vector3;

/// What must be true, besides range, for an objective to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveCriteria {
    /// No extra requirement.
    None,
    /// The player must be on foot.
    NoVehicle,
    /// The player must be seated in a vehicle.
    InVehicle,
}

impl ObjectiveCriteria {
    /// Whether the criteria hold for a player with the given vehicle state.
    #[must_use]
    pub fn is_met(&self, in_vehicle: bool) -> bool {
        match self {
            Self::None => true,
            Self::NoVehicle => !in_vehicle,
            Self::InVehicle => in_vehicle,
        }
    }
}

/// Kind of objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    Waypoint,
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A 3D marker drawn in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub pos: Vector3,
    pub color: Rgba,
    /// Marker shape id.
    #[serde(rename = "type")]
    pub shape: u32,
}

/// A map indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blip {
    pub pos: Vector3,
    pub sprite: u32,
    pub color: u32,
    pub text: String,
    pub scale: f32,
    /// Only visible when the player is nearby.
    pub short_range: bool,
}

/// A particle effect played at an objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vector3,
    /// Effect dictionary.
    pub dict: String,
    /// Effect name within the dictionary.
    pub name: String,
    pub duration_ms: u32,
    pub scale: f32,
}

/// Floating text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub pos: Vector3,
    pub data: String,
}

/// One ordered step of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub criteria: ObjectiveCriteria,
    #[serde(rename = "type")]
    pub kind: ObjectiveType,
    pub description: String,
    pub pos: Vector3,
    /// Completion radius around `pos`.
    pub range: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blip: Option<Blip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle: Option<Particle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_label: Option<TextLabel>,
}

impl Objective {
    /// A bare waypoint with no visual descriptors.
    #[must_use]
    pub fn waypoint(description: impl Into<String>, pos: Vector3, range: f32) -> Self {
        Self {
            criteria: ObjectiveCriteria::None,
            kind: ObjectiveType::Waypoint,
            description: description.into(),
            pos,
            range,
            marker: None,
            blip: None,
            particle: None,
            text_label: None,
        }
    }

    /// Whether a player at `pos` with the given vehicle state satisfies
    /// this objective.
    #[must_use]
    pub fn is_satisfied(&self, pos: &Vector3, in_vehicle: bool) -> bool {
        self.criteria.is_met(in_vehicle) && self.pos.distance(pos) <= self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria() {
        assert!(ObjectiveCriteria::None.is_met(true));
        assert!(ObjectiveCriteria::NoVehicle.is_met(false));
        assert!(!ObjectiveCriteria::NoVehicle.is_met(true));
        assert!(ObjectiveCriteria::InVehicle.is_met(true));
    }

    #[test]
    fn test_satisfied_within_range() {
        let mut obj = Objective::waypoint("walk", Vector3::new(10.0, 0.0, 0.0), 2.0);
        obj.criteria = ObjectiveCriteria::NoVehicle;

        assert!(obj.is_satisfied(&Vector3::new(11.5, 0.0, 0.0), false));
        assert!(!obj.is_satisfied(&Vector3::new(13.0, 0.0, 0.0), false));
        assert!(!obj.is_satisfied(&Vector3::new(10.0, 0.0, 0.0), true));
    }

    #[test]
    fn test_serde_field_names() {
        let obj = Objective::waypoint("walk", Vector3::default(), 1.0);
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["type"], "waypoint");
        assert!(json.get("marker").is_none());
    }
}
