//! Grid increment derived from the current zoom level

use serde::{Deserialize, Serialize};

use crate::camera::{Projection, ViewportCamera};

/// Unit system of the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// Read-only unit information for the open project
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitSettings {
    pub system: UnitSystem,
    /// Project length unit expressed in scene units
    pub unit_scale: f32,
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self {
            system: UnitSystem::Metric,
            unit_scale: 1.0,
        }
    }
}

/// Fractions of a unit and the zoom thresholds selecting them, finest first
struct IncrementTable {
    fractions: [f32; 4],
    distances: [f32; 4],
    ortho_thresholds: [f32; 4],
}

const METRIC: IncrementTable = IncrementTable {
    fractions: [100.0, 20.0, 10.0, 2.0],
    distances: [3.0, 5.0, 15.0, 30.0],
    ortho_thresholds: [-0.5, -0.25, -0.15, -0.05],
};

const IMPERIAL: IncrementTable = IncrementTable {
    fractions: [24.0, 12.0, 6.0, 2.0],
    distances: [3.0, 6.0, 10.0, 20.0],
    ortho_thresholds: [-10.0, -4.75, -2.2, -0.75],
};

/// Pick the tier for `value` on an ascending threshold ladder.
///
/// Bounds are strict, so a value sitting exactly on a threshold falls through
/// to the coarsest tier.
fn tier(value: f32, thresholds: &[f32; 4]) -> Option<usize> {
    if value < thresholds[0] {
        return Some(0);
    }
    (1..4).find(|&i| thresholds[i - 1] < value && value < thresholds[i])
}

/// Snapping increment for an explicit zoom state.
///
/// `view_distance` drives perspective views and `window_scale` (the vertical
/// projection scale) drives orthographic ones.
pub fn increment_for(
    projection: Projection,
    view_distance: f32,
    window_scale: f32,
    units: &UnitSettings,
) -> f32 {
    let (table, factor) = match units.system {
        UnitSystem::Metric => (&METRIC, 1.0),
        UnitSystem::Imperial => (&IMPERIAL, units.unit_scale),
    };

    let tier = if projection.is_orthographic() {
        tier(-window_scale.abs(), &table.ortho_thresholds)
    } else {
        tier(view_distance, &table.distances)
    };

    match tier {
        Some(i) => (1.0 / table.fractions[i]) * factor,
        None => factor,
    }
}

/// Snapping increment for the current viewport camera
pub fn get_increment_snap_value(camera: &ViewportCamera, units: &UnitSettings) -> f32 {
    increment_for(
        camera.projection,
        camera.distance,
        camera.window_scale(),
        units,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_metric_perspective_tiers() {
        let units = UnitSettings::default();
        let p = Projection::Perspective;

        assert_relative_eq!(increment_for(p, 2.0, 0.0, &units), 0.01);
        assert_relative_eq!(increment_for(p, 4.0, 0.0, &units), 0.05);
        assert_relative_eq!(increment_for(p, 10.0, 0.0, &units), 0.1);
        assert_relative_eq!(increment_for(p, 20.0, 0.0, &units), 0.5);
        assert_relative_eq!(increment_for(p, 50.0, 0.0, &units), 1.0);
    }

    #[test]
    fn test_threshold_falls_to_coarse() {
        let units = UnitSettings::default();
        assert_relative_eq!(
            increment_for(Projection::Perspective, 3.0, 0.0, &units),
            1.0
        );
    }

    #[test]
    fn test_imperial_uses_unit_scale() {
        let units = UnitSettings {
            system: UnitSystem::Imperial,
            unit_scale: 0.3048,
        };
        assert_relative_eq!(
            increment_for(Projection::Perspective, 2.0, 0.0, &units),
            0.3048 / 24.0
        );
        assert_relative_eq!(
            increment_for(Projection::Perspective, 100.0, 0.0, &units),
            0.3048
        );
    }

    #[test]
    fn test_imperial_orthographic_tiers() {
        let units = UnitSettings {
            system: UnitSystem::Imperial,
            unit_scale: 0.3048,
        };
        let ortho = Projection::Orthographic;

        assert_relative_eq!(increment_for(ortho, 0.0, 12.0, &units), 0.3048 / 24.0);
        assert_relative_eq!(increment_for(ortho, 0.0, 5.0, &units), 0.3048 / 12.0);
        assert_relative_eq!(increment_for(ortho, 0.0, 3.0, &units), 0.3048 / 6.0);
        assert_relative_eq!(increment_for(ortho, 0.0, 1.0, &units), 0.3048 / 2.0);
        assert_relative_eq!(increment_for(ortho, 0.0, 0.5, &units), 0.3048);

        // On a threshold
        assert_relative_eq!(increment_for(ortho, 0.0, 4.75, &units), 0.3048);
    }

    #[test]
    fn test_orthographic_uses_window_scale() {
        let units = UnitSettings::default();
        let ortho = Projection::Orthographic;

        assert_relative_eq!(increment_for(ortho, 100.0, 0.8, &units), 0.01);
        assert_relative_eq!(increment_for(ortho, 100.0, 0.3, &units), 0.05);
        assert_relative_eq!(increment_for(ortho, 100.0, 0.2, &units), 0.1);
        assert_relative_eq!(increment_for(ortho, 100.0, 0.1, &units), 0.5);
        assert_relative_eq!(increment_for(ortho, 100.0, 0.01, &units), 1.0);

        let camera_ortho = Projection::Camera { orthographic: true };
        assert_relative_eq!(increment_for(camera_ortho, 100.0, 0.8, &units), 0.01);
    }

    #[test]
    fn test_camera_perspective_uses_distance() {
        let units = UnitSettings::default();
        let camera = Projection::Camera {
            orthographic: false,
        };
        assert_relative_eq!(increment_for(camera, 2.0, 0.8, &units), 0.01);
    }

    #[test]
    fn test_from_camera() {
        let mut camera = ViewportCamera::default();
        camera.distance = 2.0;
        assert_relative_eq!(
            get_increment_snap_value(&camera, &UnitSettings::default()),
            0.01
        );

        camera.projection = Projection::Orthographic;
        camera.ortho_half_height = 1.0; // window scale 1.0
        assert_relative_eq!(
            get_increment_snap_value(&camera, &UnitSettings::default()),
            0.01
        );
    }
}
