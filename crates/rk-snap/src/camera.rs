//! Viewport camera used to turn mouse positions into world rays

use glam::{Mat4, Quat, Vec2, Vec3, Vec4Swizzles};
use serde::{Deserialize, Serialize};

use crate::geometry::{Ray, Segment};

/// Viewport projection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
    /// Looking through the scene camera, whose own projection decides
    Camera { orthographic: bool },
}

impl Projection {
    pub fn is_orthographic(&self) -> bool {
        matches!(
            self,
            Projection::Orthographic | Projection::Camera { orthographic: true }
        )
    }
}

/// An orbiting viewport camera.
///
/// The eye sits `distance` units behind `target` along the rotated +Z axis and
/// looks down the rotated -Z axis. Screen coordinates are pixels with the
/// origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportCamera {
    pub projection: Projection,
    /// Orbit pivot (view location)
    pub target: Vec3,
    /// View rotation
    pub rotation: Quat,
    /// Distance from the eye to the pivot
    pub distance: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Half height of the orthographic view volume
    pub ortho_half_height: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective,
            target: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            distance: 10.0,
            fov_y: 50.0_f32.to_radians(),
            ortho_half_height: 5.0,
            viewport: Vec2::new(1280.0, 720.0),
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl ViewportCamera {
    /// Top-down camera looking at `target` along -Z
    pub fn top(target: Vec3, distance: f32, viewport: Vec2) -> Self {
        Self {
            target,
            distance,
            viewport,
            ..Default::default()
        }
    }

    /// Camera looking from `eye` at `target`, with world Z up where possible
    pub fn look_at(eye: Vec3, target: Vec3, viewport: Vec2) -> Self {
        let forward = (target - eye).normalize();
        let up = if forward.cross(Vec3::Z).length_squared() < 1e-6 {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let view = Mat4::look_to_rh(eye, forward, up);
        let rotation = Quat::from_mat4(&view.inverse());
        Self {
            target,
            rotation,
            distance: (target - eye).length(),
            viewport,
            ..Default::default()
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        self.target + self.rotation * Vec3::Z * self.distance
    }

    /// Unit viewing direction
    pub fn view_direction(&self) -> Vec3 {
        (self.rotation * Vec3::NEG_Z).normalize()
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y.max(1.0)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye(), self.view_direction(), self.rotation * Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        if self.projection.is_orthographic() {
            let half_h = self.ortho_half_height;
            let half_w = half_h * self.aspect();
            Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
        } else {
            Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Vertical scale of the projection, larger when zoomed in
    pub fn window_scale(&self) -> f32 {
        self.projection_matrix().y_axis.y
    }

    /// Convert a pixel position into a world-space ray
    pub fn screen_to_ray(&self, screen: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * screen.x / self.viewport.x - 1.0,
            1.0 - 2.0 * screen.y / self.viewport.y,
        );
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }

    /// Project a world point to pixels, None when it lies behind the eye
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }

    /// Part of a world segment in front of the near plane.
    ///
    /// Both ends of the result project to the screen. None when the whole
    /// segment lies behind the eye.
    pub fn clip_to_view(&self, segment: &Segment) -> Option<Segment> {
        if self.projection.is_orthographic() {
            return Some(*segment);
        }

        let eye = self.eye();
        let forward = self.view_direction();
        let depth_start = (segment.start - eye).dot(forward) - self.near;
        let depth_end = (segment.end - eye).dot(forward) - self.near;

        match (depth_start >= 0.0, depth_end >= 0.0) {
            (true, true) => Some(*segment),
            (false, false) => None,
            (start_visible, _) => {
                let cut = segment.lerp(depth_start / (depth_start - depth_end));
                if start_visible {
                    Some(Segment::new(segment.start, cut))
                } else {
                    Some(Segment::new(cut, segment.end))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_hits_target() {
        let camera = ViewportCamera::top(Vec3::ZERO, 10.0, Vec2::new(800.0, 600.0));
        let ray = camera.screen_to_ray(Vec2::new(400.0, 300.0));

        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-4));
        assert!(ray.origin.x.abs() < 1e-3 && ray.origin.y.abs() < 1e-3);
    }

    #[test]
    fn test_project_roundtrip() {
        let camera = ViewportCamera::look_at(
            Vec3::new(6.0, -8.0, 5.0),
            Vec3::ZERO,
            Vec2::new(800.0, 600.0),
        );
        let point = Vec3::new(1.0, 2.0, 0.5);
        let screen = camera.world_to_screen(point).unwrap();
        let ray = camera.screen_to_ray(screen);

        let to_point = point - ray.origin;
        let off_ray = to_point - ray.direction * to_point.dot(ray.direction);
        assert!(off_ray.length() < 1e-3);
    }

    #[test]
    fn test_behind_camera() {
        let camera = ViewportCamera::top(Vec3::ZERO, 10.0, Vec2::new(800.0, 600.0));
        assert!(camera.world_to_screen(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn test_clip_segment_crossing_the_eye() {
        let camera = ViewportCamera::look_at(
            Vec3::new(0.0, -10.0, 2.0),
            Vec3::new(0.0, -6.0, 0.0),
            Vec2::new(800.0, 600.0),
        );
        let floor_line = Segment::new(Vec3::new(0.3, -40.0, 0.0), Vec3::new(0.3, 20.0, 0.0));
        assert!(camera.world_to_screen(floor_line.start).is_none());

        let clipped = camera.clip_to_view(&floor_line).unwrap();
        assert_eq!(clipped.end, floor_line.end);
        assert!(clipped.start.y > -40.0);
        assert!(camera.world_to_screen(clipped.start).is_some());
        assert!(camera.world_to_screen(clipped.end).is_some());

        let behind = Segment::new(Vec3::new(0.0, -30.0, 0.0), Vec3::new(0.0, -20.0, 0.0));
        assert!(camera.clip_to_view(&behind).is_none());

        let ortho = camera.with_projection(Projection::Orthographic);
        assert_eq!(ortho.clip_to_view(&floor_line), Some(floor_line));
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let camera = ViewportCamera::top(Vec3::ZERO, 10.0, Vec2::new(800.0, 600.0))
            .with_projection(Projection::Orthographic);
        let a = camera.screen_to_ray(Vec2::new(0.0, 0.0));
        let b = camera.screen_to_ray(Vec2::new(800.0, 600.0));
        assert!(a.direction.abs_diff_eq(b.direction, 1e-4));
        assert!(camera.projection.is_orthographic());
    }
}
