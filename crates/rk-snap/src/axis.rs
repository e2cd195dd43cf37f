//! Projection of free points onto rotational snap axes
//!
//! Candidate axes are the twelve 30° steps around a pivot axis through the
//! last polyline point. A point sticks to an axis when its lateral deviation
//! from it stays under the tolerance; a locked axis is always used.

use glam::{Mat3, Vec3};

use crate::geometry::Segment;
use crate::types::{AxisMethod, ConstraintState, PlaneMethod, ReferenceFrame};

/// Half length of the guide segment drawn along the resolved axis
pub const AXIS_GUIDE_LENGTH: f32 = 1000.0;

/// Angle between consecutive candidate axes, in degrees
const AXIS_STEP_DEGREES: f32 = 30.0;

/// A point collapsed onto a rotational axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSnap {
    /// Snapped world-space point
    pub point: Vec3,
    /// Resolved axis angle in degrees, after plane remapping
    pub angle: f32,
    /// Guide segment centered at the last point along the axis
    pub guide: Segment,
}

/// Rotation bringing axis `angle` onto the pivot frame's reference direction
fn axis_rotation(angle: f32, pivot: Vec3, frame: &ReferenceFrame) -> Mat3 {
    let rotation = Mat3::from_axis_angle(pivot, (360.0 - angle).to_radians());
    frame.orient_matrix(rotation)
}

/// Lateral deviation of a rotated point from the candidate axis
fn deviation(rotated: Vec3, plane: Option<PlaneMethod>) -> f32 {
    match plane {
        Some(PlaneMethod::XZ) => rotated.x,
        _ => rotated.y,
    }
}

/// Direction of the guide line before rotation back to world space
fn guide_direction(state: &ConstraintState) -> Vec3 {
    let vertical = match state.plane_method {
        Some(PlaneMethod::YZ) => true,
        None => state.axis_method == Some(AxisMethod::Z),
        _ => false,
    };
    if vertical { Vec3::Z } else { Vec3::X }
}

/// Snap `intersection` onto the best rotational axis around `last_point`.
///
/// Returns None when no axis lies within `tolerance` and no axis is locked,
/// or when the axis is locked without a stored snap angle.
pub fn snap_on_axis(
    intersection: Vec3,
    state: &ConstraintState,
    last_point: Vec3,
    frame: &ReferenceFrame,
    tolerance: f32,
) -> Option<AxisSnap> {
    let relative = intersection - last_point;
    let plane = state.plane_method;
    let pivot = PlaneMethod::pivot_axis(plane);
    let locked = state.is_axis_locked();

    let candidates: Vec<f32> = if locked {
        vec![state.snap_angle?]
    } else {
        (1..=12).map(|i| AXIS_STEP_DEGREES * i as f32).collect()
    };

    let eligible = candidates
        .iter()
        .filter(|angle| **angle != 0.0)
        .filter_map(|&angle| {
            let rotated = axis_rotation(angle, pivot, frame) * relative;
            let proximity = deviation(rotated, plane).abs();
            (proximity <= tolerance).then_some((proximity, angle))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    // The XZ and YZ bases are mirrored relative to the Z pivot convention, so
    // the angle is remapped before the final rotation.
    let angle = match eligible {
        Some((_, angle)) => match plane {
            Some(PlaneMethod::XZ) => 90.0 - (-angle),
            _ => angle,
        },
        None if locked => {
            let angle = candidates[0];
            match plane {
                Some(PlaneMethod::XZ) => -angle,
                Some(PlaneMethod::YZ) => 90.0 - (-angle),
                _ => angle,
            }
        }
        None => return None,
    };

    let rotation = axis_rotation(angle, pivot, frame);
    let inverse = rotation.inverse();
    let mut rotated = rotation * relative;
    match plane {
        Some(PlaneMethod::XZ) => rotated.z = 0.0,
        _ => rotated.y = 0.0,
    }
    let point = inverse * rotated + last_point;

    let direction = inverse * guide_direction(state);
    let guide = Segment::new(
        last_point + direction * AXIS_GUIDE_LENGTH,
        last_point - direction * AXIS_GUIDE_LENGTH,
    );

    tracing::trace!(angle, ?point, locked, "Snapped to axis");

    Some(AxisSnap {
        point,
        angle,
        guide,
    })
}
