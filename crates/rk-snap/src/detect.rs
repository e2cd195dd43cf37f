//! Candidate detection for one input sample
//!
//! Runs the detection phases in a fixed order (polyline, measurements, loose
//! edges and vertices, object faces, then the constraint axis and plane) and
//! returns every candidate found, unfiltered and unsorted.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::axis::snap_on_axis;
use crate::camera::ViewportCamera;
use crate::geometry::Segment;
use crate::raycast::{ObjectHit, Raycaster};
use crate::scene::{ObjectKind, SceneObject};
use crate::settings::SnapSettings;
use crate::types::{
    AxisMethod, ConstraintState, LOW_PRIORITY_DISTANCE, PlaneMethod, ReferenceFrame,
    RunningPolyline, SnapCandidate, SnapGroup,
};

/// Distance of the view-aligned constraint plane in front of the view pivot
const VIEW_PLANE_DISTANCE: f32 = 10.0;

/// Retry grid around the mouse, in units of the pick offset. The centre is
/// the direct cast and is not repeated.
const RETRY_OFFSETS: [(f32, f32); 8] = [
    (-1.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
];

/// Viewport shading mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShadingType {
    Wireframe,
    #[default]
    Solid,
    Material,
    Rendered,
}

/// Viewport display state relevant to picking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewportShading {
    pub shading_type: ShadingType,
    pub show_xray: bool,
    pub show_xray_wireframe: bool,
}

impl ViewportShading {
    /// Occluded geometry is pickable, so every object is cast independently
    pub fn is_xray(&self) -> bool {
        match self.shading_type {
            ShadingType::Solid => self.show_xray,
            ShadingType::Wireframe => self.show_xray_wireframe,
            _ => false,
        }
    }
}

/// Read-only inputs of one detection pass
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    /// Mouse position in viewport pixels
    pub mouse: Vec2,
    pub camera: &'a ViewportCamera,
    pub shading: ViewportShading,
    pub objects: &'a [SceneObject],
    pub polyline: &'a RunningPolyline,
    /// Measurement polylines
    pub measurements: &'a [Vec<Vec3>],
    pub frame: ReferenceFrame,
}

/// Output of one detection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Candidates in insertion order
    pub candidates: Vec<SnapCandidate>,
    /// Guide segment of the resolved axis, if any
    pub guide: Option<Segment>,
}

/// Cast against one mesh object, retrying around the mouse on a miss
fn cast_single_object<R: Raycaster + ?Sized>(
    raycaster: &R,
    object: &SceneObject,
    mouse: Vec2,
    offset_px: f32,
) -> Option<ObjectHit> {
    if object.kind() != ObjectKind::Mesh {
        return None;
    }
    raycaster.ray_cast_object(object, mouse).or_else(|| {
        RETRY_OFFSETS.iter().find_map(|&(dx, dy)| {
            raycaster.ray_cast_object(object, mouse + Vec2::new(dx, dy) * offset_px)
        })
    })
}

/// Hit closest to the ray origin across all objects
fn cast_best_object<'o, R: Raycaster + ?Sized>(
    raycaster: &R,
    objects: &[&'o SceneObject],
    mouse: Vec2,
    offset_px: f32,
) -> Option<(&'o SceneObject, ObjectHit)> {
    let origin = raycaster.viewport_ray(mouse).origin;
    let mut best: Option<(f32, &'o SceneObject, ObjectHit)> = None;

    for &object in objects {
        let Some(hit) = cast_single_object(raycaster, object, mouse, offset_px) else {
            continue;
        };
        let length_squared = (hit.point - origin).length_squared();
        if best.is_none_or(|(best_length, _, _)| length_squared < best_length) {
            best = Some((length_squared, object, hit));
        }
    }

    best.map(|(_, object, hit)| (object, hit))
}

/// Origin and normal of the plane the mouse is projected onto
fn select_plane(ctx: &DetectionContext<'_>, state: &ConstraintState) -> (Vec3, Vec3) {
    let last = ctx.polyline.last();
    let mut origin = Vec3::ZERO;
    let mut normal = Vec3::Z;

    if state.plane_method.is_none() {
        let view_direction = ctx.camera.view_direction();
        origin = ctx.camera.target + view_direction * VIEW_PLANE_DISTANCE;
        normal = view_direction;
    }

    let horizontal = match state.plane_method {
        Some(PlaneMethod::XY) => true,
        None => matches!(state.axis_method, Some(AxisMethod::X | AxisMethod::Y)),
        _ => false,
    };
    let front = match state.plane_method {
        Some(PlaneMethod::XZ) => true,
        None => state.axis_method == Some(AxisMethod::Z),
        _ => false,
    };

    if horizontal {
        origin = if state.use_default_container {
            Vec3::new(0.0, 0.0, ctx.frame.elevation)
        } else {
            last.unwrap_or(Vec3::ZERO)
        };
        normal = Vec3::Z;
    } else if front {
        if let Some(last) = last {
            origin = last;
        }
        normal = Vec3::Y;
    } else if state.plane_method == Some(PlaneMethod::YZ) {
        if let Some(last) = last {
            origin = last;
        }
        normal = Vec3::X;
    }

    (origin, ctx.frame.orient_vector(normal))
}

/// Default snap angle for an axis lock on a given plane
fn default_snap_angle(plane: Option<PlaneMethod>, axis: Option<AxisMethod>) -> Option<f32> {
    use AxisMethod as A;
    use PlaneMethod as P;

    match (plane, axis?) {
        (None, A::X) => Some(180.0),
        (None, A::Y | A::Z) => Some(90.0),
        (Some(P::XY | P::XZ), A::X) => Some(180.0),
        (Some(P::XY | P::YZ), A::Y) => Some(90.0),
        (Some(P::YZ), A::Z) => Some(180.0),
        (Some(P::XZ), A::Z) => Some(90.0),
        _ => None,
    }
}

/// Collect every snap candidate for the current mouse position.
///
/// Updates `state.plane_origin` and, when the axis is free on a constraint
/// plane, `state.snap_angle`. Always emits a Plane candidate last.
pub fn detect_snapping_points<R: Raycaster + ?Sized>(
    ctx: &DetectionContext<'_>,
    raycaster: &R,
    state: &mut ConstraintState,
    settings: &SnapSettings,
) -> Detection {
    let mouse = ctx.mouse;
    let offset_px = settings.pick_offset_px;
    let mut candidates = Vec::new();

    let eligible: Vec<&SceneObject> = ctx
        .objects
        .iter()
        .filter(|object| object.visible && object.kind().is_snappable())
        .filter(|object| {
            raycaster
                .screen_bounding_box(object)
                .is_some_and(|rect| rect.contains_with_margin(mouse, offset_px))
        })
        .collect();

    // Polyline
    if !ctx.polyline.is_empty() {
        candidates.extend(
            raycaster
                .ray_cast_to_polyline(mouse, ctx.polyline.points())
                .into_iter()
                .map(|c| SnapCandidate {
                    group: SnapGroup::Polyline,
                    ..c
                }),
        );
    }

    // Measure
    for measurement in ctx.measurements {
        candidates.extend(
            raycaster
                .ray_cast_to_measure(mouse, measurement)
                .into_iter()
                .map(|c| SnapCandidate {
                    group: SnapGroup::Measure,
                    ..c
                }),
        );
    }

    // Edge-Vertex
    for &object in &eligible {
        let found = match object.kind() {
            ObjectKind::Mesh => match object.as_mesh() {
                Some(mesh) if !mesh.has_polygons() => {
                    raycaster.ray_cast_by_proximity(mouse, object, None)
                }
                _ => Vec::new(),
            },
            ObjectKind::Curve => match object.to_transient_mesh() {
                Some(transient) => raycaster.ray_cast_by_proximity(mouse, &transient, None),
                None => Vec::new(),
            },
            ObjectKind::Empty => vec![
                SnapCandidate::vertex(
                    object.location(),
                    SnapGroup::EdgeVertex,
                    LOW_PRIORITY_DISTANCE,
                )
                .with_object(Some(object.object_ref())),
            ],
            ObjectKind::Other => Vec::new(),
        };
        candidates.extend(found.into_iter().map(|c| SnapCandidate {
            group: SnapGroup::EdgeVertex,
            ..c
        }));
    }

    // Object
    let hits: Vec<(&SceneObject, ObjectHit)> = if ctx.shading.is_xray() {
        eligible
            .iter()
            .filter_map(|&object| {
                cast_single_object(raycaster, object, mouse, offset_px).map(|hit| (object, hit))
            })
            .collect()
    } else {
        cast_best_object(raycaster, &eligible, mouse, offset_px)
            .into_iter()
            .collect()
    };

    for (object, hit) in hits {
        let found = raycaster.ray_cast_by_proximity(mouse, object, Some(hit.face_index));
        if found.is_empty() {
            candidates.push(
                SnapCandidate::face(hit.point, hit.face_index)
                    .with_object(Some(object.object_ref())),
            );
        } else {
            candidates.extend(found.into_iter().map(|c| SnapCandidate {
                group: SnapGroup::Object,
                ..c
            }));
        }
    }

    // Axis and Plane
    let (plane_origin, plane_normal) = select_plane(ctx, state);
    state.plane_origin = plane_origin;
    let intersection = raycaster.ray_cast_to_plane(mouse, plane_origin, plane_normal);
    let last_point = ctx.polyline.reference_point(ctx.frame.elevation);

    if let Some(angle) = default_snap_angle(state.plane_method, state.axis_method) {
        state.snap_angle = Some(angle);
    }

    let axis = match state.plane_method {
        None if state.axis_method.is_none() => None,
        None => snap_on_axis(
            intersection,
            state,
            last_point,
            &ctx.frame,
            settings.axis_tolerance,
        ),
        Some(_) => {
            let axis = snap_on_axis(
                intersection,
                state,
                last_point,
                &ctx.frame,
                settings.axis_tolerance,
            );
            if !state.is_axis_locked() {
                state.snap_angle = axis.map(|a| a.angle);
            }
            axis
        }
    };

    let guide = axis.map(|a| a.guide);
    if let Some(axis) = axis {
        candidates.push(SnapCandidate::axis(axis.point, axis.guide));
    }
    candidates.push(SnapCandidate::plane(intersection));

    tracing::debug!(
        candidates = candidates.len(),
        objects = eligible.len(),
        axis = guide.is_some(),
        "Detected snapping points"
    );

    Detection { candidates, guide }
}
