//! Screen-space ray casting against scene geometry

mod viewport;

pub use viewport::ViewportRaycaster;

use glam::{Vec2, Vec3};

use crate::geometry::{Ray, Rect2D, ray_plane_intersection};
use crate::scene::SceneObject;
use crate::types::SnapCandidate;

/// Distance along the view ray used when the ray never meets the plane
pub const FAR_DISTANCE: f32 = 1.0e4;

/// A ray hit on an object's polygons, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectHit {
    pub point: Vec3,
    pub normal: Vec3,
    /// Polygon that was hit
    pub face_index: usize,
}

/// Ray casting primitives the snapping pipeline relies on.
///
/// Implementations must be free of side effects: the detector may call them
/// any number of times per input sample.
pub trait Raycaster {
    /// World-space ray through the mouse position
    fn viewport_ray(&self, mouse: Vec2) -> Ray;

    /// Closest polygon hit on a mesh object
    fn ray_cast_object(&self, object: &SceneObject, mouse: Vec2) -> Option<ObjectHit>;

    /// Intersection of the view ray with a plane.
    ///
    /// A ray parallel to the plane extends to [`FAR_DISTANCE`] instead.
    fn ray_cast_to_plane(&self, mouse: Vec2, origin: Vec3, normal: Vec3) -> Vec3 {
        let ray = self.viewport_ray(mouse);
        match ray_plane_intersection(&ray, origin, normal) {
            Some(t) => ray.at(t),
            None => ray.at(FAR_DISTANCE),
        }
    }

    /// Vertex and edge candidates on the running polyline
    fn ray_cast_to_polyline(&self, mouse: Vec2, points: &[Vec3]) -> Vec<SnapCandidate>;

    /// Vertex and edge candidates on a measurement polyline
    fn ray_cast_to_measure(&self, mouse: Vec2, points: &[Vec3]) -> Vec<SnapCandidate> {
        self.ray_cast_to_polyline(mouse, points)
    }

    /// Vertex and edge candidates near the mouse, limited to one polygon when
    /// `face` is given
    fn ray_cast_by_proximity(
        &self,
        mouse: Vec2,
        object: &SceneObject,
        face: Option<usize>,
    ) -> Vec<SnapCandidate>;

    /// Crossing point of two of the given edge candidates near the mouse
    fn ray_cast_to_edge_intersection(
        &self,
        mouse: Vec2,
        edges: &[SnapCandidate],
    ) -> Option<SnapCandidate>;

    /// Screen-space bounding box of the object, None when off screen
    fn screen_bounding_box(&self, object: &SceneObject) -> Option<Rect2D>;
}
