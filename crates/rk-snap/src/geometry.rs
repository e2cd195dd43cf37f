//! Geometric primitives and intersection tests

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at parameter t along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A finite segment in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Point at parameter t (0 = start, 1 = end)
    pub fn lerp(&self, t: f32) -> Vec3 {
        self.start.lerp(self.end, t)
    }
}

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect2D {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect2D {
    /// Smallest rectangle containing all points, None for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// True if the point lies inside the rectangle grown by `margin` pixels
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        point.x >= self.min.x - margin
            && point.x <= self.max.x + margin
            && point.y >= self.min.y - margin
            && point.y <= self.max.y + margin
    }
}

/// Ray-plane intersection.
///
/// Returns the parameter t such that `ray.at(t)` lies on the plane, or None if
/// the ray is parallel to the plane. Negative t is allowed.
pub fn ray_plane_intersection(ray: &Ray, plane_origin: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(plane_normal);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    Some((plane_origin - ray.origin).dot(plane_normal) / denom)
}

/// Intersection of the infinite line through a segment with a plane.
///
/// Returns None when the line is parallel to the plane.
pub fn intersect_edge_plane(
    start: Vec3,
    end: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let direction = end - start;
    let denom = direction.dot(plane_normal);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (plane_point - start).dot(plane_normal) / denom;
    Some(start + direction * t)
}

/// Ray-AABB (Axis-Aligned Bounding Box) intersection test
/// Returns the distance to intersection if hit, None otherwise
pub fn ray_aabb_intersection(ray: &Ray, bbox_min: Vec3, bbox_max: Vec3) -> Option<f32> {
    let inv_dir = ray.direction.recip();

    let t1 = (bbox_min - ray.origin) * inv_dir;
    let t2 = (bbox_max - ray.origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Ray-triangle intersection using Möller–Trumbore algorithm
/// Returns the distance to intersection if hit, None otherwise
pub fn ray_triangle_intersection(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < PARALLEL_EPSILON {
        return None; // Ray is parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > PARALLEL_EPSILON { Some(t) } else { None }
}

/// Closest points between two infinite lines `a0-a1` and `b0-b1`.
///
/// Returns None for parallel or degenerate lines.
pub fn closest_points_between_lines(
    a0: Vec3,
    a1: Vec3,
    b0: Vec3,
    b1: Vec3,
) -> Option<(Vec3, Vec3)> {
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let b = d1.dot(d2);
    let denom = a * e - b * b;

    if a < PARALLEL_EPSILON || e < PARALLEL_EPSILON || denom.abs() < PARALLEL_EPSILON * a * e {
        return None;
    }

    let c = d1.dot(r);
    let f = d2.dot(r);
    let s = (b * f - c * e) / denom;
    let t = (a * f - b * c) / denom;
    Some((a0 + d1 * s, b0 + d2 * t))
}

/// Point on the segment closest to the ray's line
pub fn closest_point_on_segment_to_ray(ray: &Ray, segment: &Segment) -> Vec3 {
    let d = segment.end - segment.start;
    let len_sq = d.length_squared();
    if len_sq < 1e-12 {
        return segment.start;
    }

    let r = segment.start - ray.origin;
    let b = d.dot(ray.direction);
    let denom = len_sq - b * b;
    let t = if denom.abs() < PARALLEL_EPSILON * len_sq {
        // Parallel: any point works, keep the one nearest the ray origin
        (-r.dot(d) / len_sq).clamp(0.0, 1.0)
    } else {
        let c = r.dot(ray.direction);
        ((b * c - r.dot(d)) / denom).clamp(0.0, 1.0)
    };
    segment.lerp(t)
}

/// Calculate distance from a point to a 2D line segment
pub fn point_to_segment_distance_2d(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let line = end - start;
    let len_sq = line.length_squared();

    if len_sq < 1e-10 {
        return (point - start).length();
    }

    let t = ((point - start).dot(line) / len_sq).clamp(0.0, 1.0);
    let projection = start + line * t;
    (point - projection).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_plane() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let t = ray_plane_intersection(&ray, Vec3::ZERO, Vec3::Z).unwrap();
        assert_relative_eq!(t, 10.0);

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::X);
        assert!(ray_plane_intersection(&parallel, Vec3::ZERO, Vec3::Z).is_none());
    }

    #[test]
    fn test_intersect_edge_plane_extends_line() {
        let hit = intersect_edge_plane(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(5.0, 3.0, 2.0),
            Vec3::X,
        )
        .unwrap();
        assert!(hit.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));

        assert!(intersect_edge_plane(Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_triangle() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::NEG_Z);
        let t = ray_triangle_intersection(&ray, Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        assert_relative_eq!(t, 5.0);

        let miss = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(ray_triangle_intersection(&miss, Vec3::ZERO, Vec3::X, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_aabb() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = ray_aabb_intersection(&ray, Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert_relative_eq!(t, 4.0);

        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(ray_aabb_intersection(&miss, Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());
    }

    #[test]
    fn test_closest_points_between_crossing_lines() {
        let (p, q) = closest_points_between_lines(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert!(p.abs_diff_eq(Vec3::ZERO, 1e-5));
        assert!(q.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));

        assert!(
            closest_points_between_lines(Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0))
                .is_none()
        );
    }

    #[test]
    fn test_closest_point_on_segment_is_clamped() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z);
        let segment = Segment::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let p = closest_point_on_segment_to_ray(&ray, &segment);
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_rect_margin() {
        let rect = Rect2D::from_points([Vec2::new(10.0, 10.0), Vec2::new(20.0, 30.0)]).unwrap();
        assert!(rect.contains_with_margin(Vec2::new(15.0, 20.0), 0.0));
        assert!(!rect.contains_with_margin(Vec2::new(5.0, 20.0), 0.0));
        assert!(rect.contains_with_margin(Vec2::new(5.0, 20.0), 10.0));
        assert!(Rect2D::from_points(std::iter::empty::<Vec2>()).is_none());
    }

    #[test]
    fn test_point_to_segment_distance() {
        let d = point_to_segment_distance_2d(Vec2::new(1.0, 1.0), Vec2::ZERO, Vec2::new(2.0, 0.0));
        assert_relative_eq!(d, 1.0);
    }
}
