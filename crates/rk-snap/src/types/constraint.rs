//! Modal constraint state for one drawing interaction

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Plane the cursor is locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneMethod {
    XY,
    XZ,
    YZ,
}

impl PlaneMethod {
    /// World axis that candidate rotational axes are generated around
    pub fn pivot_axis(method: Option<PlaneMethod>) -> Vec3 {
        match method {
            Some(PlaneMethod::XZ) => Vec3::Y,
            Some(PlaneMethod::YZ) => Vec3::X,
            Some(PlaneMethod::XY) | None => Vec3::Z,
        }
    }
}

/// World axis the cursor is locked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisMethod {
    X,
    Y,
    Z,
}

/// Constraint state of the interactive tool.
///
/// Lives for one modal interaction and is reset when the operator ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintState {
    pub plane_method: Option<PlaneMethod>,
    pub axis_method: Option<AxisMethod>,
    pub lock_axis: bool,
    /// Locked rotational axis in degrees
    pub snap_angle: Option<f32>,
    /// Origin of the constraint plane computed by the last detection pass
    pub plane_origin: Vec3,
    /// Keep the horizontal plane at the default container elevation instead
    /// of the last polyline point
    pub use_default_container: bool,
}

impl Default for ConstraintState {
    fn default() -> Self {
        Self {
            plane_method: None,
            axis_method: None,
            lock_axis: false,
            snap_angle: None,
            plane_origin: Vec3::ZERO,
            use_default_container: true,
        }
    }
}

impl ConstraintState {
    /// Only the stored snap angle is considered, no free axis search
    pub fn is_axis_locked(&self) -> bool {
        self.lock_axis || self.axis_method.is_some()
    }
}

/// Points committed so far in the current interaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningPolyline {
    points: Vec<Vec3>,
}

impl RunningPolyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn last(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Point constraint math measures from: the last point, or the world
    /// origin raised to the default elevation.
    pub fn reference_point(&self, elevation: f32) -> Vec3 {
        self.last().unwrap_or(Vec3::new(0.0, 0.0, elevation))
    }
}

/// Default container elevation and transform-orientation basis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceFrame {
    pub elevation: f32,
    pub orientation: Mat3,
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            orientation: Mat3::IDENTITY,
        }
    }
}

impl ReferenceFrame {
    pub fn with_elevation(elevation: f32) -> Self {
        Self {
            elevation,
            ..Default::default()
        }
    }

    /// Express a rotation in the active orientation
    pub fn orient_matrix(&self, matrix: Mat3) -> Mat3 {
        self.orientation * matrix
    }

    /// Express a direction in the active orientation
    pub fn orient_vector(&self, vector: Vec3) -> Vec3 {
        self.orientation * vector
    }
}
