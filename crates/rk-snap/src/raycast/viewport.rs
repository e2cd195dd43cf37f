//! Raycaster backed by a viewport camera

use glam::{Vec2, Vec3};

use super::{ObjectHit, Raycaster};
use crate::camera::ViewportCamera;
use crate::geometry::{
    Ray, Rect2D, Segment, closest_point_on_segment_to_ray, closest_points_between_lines,
    point_to_segment_distance_2d, ray_aabb_intersection, ray_triangle_intersection,
};
use crate::scene::{ObjectData, SceneObject};
use crate::settings::SnapSettings;
use crate::types::{ObjectRef, SnapCandidate, SnapGroup, SnapKind};

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Casts screen rays from a [`ViewportCamera`].
///
/// Proximity distances are measured in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct ViewportRaycaster<'a> {
    camera: &'a ViewportCamera,
    proximity_px: f32,
    edge_intersection_gap: f32,
}

impl<'a> ViewportRaycaster<'a> {
    pub fn new(camera: &'a ViewportCamera, settings: &SnapSettings) -> Self {
        Self {
            camera,
            proximity_px: settings.proximity_px,
            edge_intersection_gap: settings.edge_intersection_gap,
        }
    }

    /// Pixel distance between a world point and the mouse
    fn screen_distance(&self, point: Vec3, mouse: Vec2) -> Option<f32> {
        self.camera
            .world_to_screen(point)
            .map(|screen| (screen - mouse).length())
    }

    /// Screen-space segment of the visible part of a world segment
    fn project_segment(&self, segment: &Segment) -> Option<(Vec2, Vec2)> {
        let visible = self.camera.clip_to_view(segment)?;
        Some((
            self.camera.world_to_screen(visible.start)?,
            self.camera.world_to_screen(visible.end)?,
        ))
    }

    /// Vertex, edge and edge-center candidates within the proximity radius.
    ///
    /// A vertex or edge center close to the mouse replaces the plain edge
    /// candidate of the edge it sits on.
    fn proximity_candidates(
        &self,
        mouse: Vec2,
        vertices: &[Vec3],
        edges: &[Segment],
        group: SnapGroup,
        object: Option<ObjectRef>,
    ) -> Vec<SnapCandidate> {
        let ray = self.viewport_ray(mouse);
        let radius = self.proximity_px;
        let mut candidates = Vec::new();

        for &vertex in vertices {
            let nearby = self
                .screen_distance(vertex, mouse)
                .filter(|d| *d <= radius);
            if let Some(distance) = nearby {
                candidates.push(
                    SnapCandidate::vertex(vertex, group, distance)
                        .with_object(object.clone()),
                );
            }
        }

        for edge in edges {
            let Some((start, end)) = self.project_segment(edge) else {
                continue;
            };

            let distance = point_to_segment_distance_2d(mouse, start, end);
            if distance > radius {
                continue;
            }

            let near_endpoint = [edge.start, edge.end].into_iter().any(|endpoint| {
                self.screen_distance(endpoint, mouse)
                    .is_some_and(|d| d <= radius)
            });
            let center = self
                .screen_distance(edge.midpoint(), mouse)
                .filter(|d| *d <= radius);

            if let Some(center_distance) = center {
                candidates.push(
                    SnapCandidate::edge_center(*edge, group, center_distance)
                        .with_object(object.clone()),
                );
            } else if !near_endpoint {
                let point = closest_point_on_segment_to_ray(&ray, edge);
                candidates.push(
                    SnapCandidate::edge(point, *edge, group, distance)
                        .with_object(object.clone()),
                );
            }
        }

        candidates
    }
}

impl Raycaster for ViewportRaycaster<'_> {
    fn viewport_ray(&self, mouse: Vec2) -> Ray {
        self.camera.screen_to_ray(mouse)
    }

    fn ray_cast_object(&self, object: &SceneObject, mouse: Vec2) -> Option<ObjectHit> {
        let mesh = object.as_mesh()?;
        if !mesh.has_polygons() {
            return None;
        }

        let ray = self.viewport_ray(mouse);

        // World-space AABB from the transformed corners for early rejection
        let corners = object.world_bounds_corners();
        let (world_min, world_max) = corners.iter().skip(1).fold(
            (*corners.first()?, *corners.first()?),
            |(min, max), corner| (min.min(*corner), max.max(*corner)),
        );
        ray_aabb_intersection(&ray, world_min, world_max)?;

        let mut closest: Option<(f32, ObjectHit)> = None;
        for face_index in 0..mesh.polygons.len() {
            for [a, b, c] in mesh.polygon_triangles(face_index) {
                let (Some(v0), Some(v1), Some(v2)) = (
                    object.world_vertex(mesh, a),
                    object.world_vertex(mesh, b),
                    object.world_vertex(mesh, c),
                ) else {
                    continue;
                };

                let Some(t) = ray_triangle_intersection(&ray, v0, v1, v2) else {
                    continue;
                };
                if closest.as_ref().is_some_and(|(best, _)| t >= *best) {
                    continue;
                }

                let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
                closest = Some((
                    t,
                    ObjectHit {
                        point: ray.at(t),
                        normal,
                        face_index,
                    },
                ));
            }
        }

        closest.map(|(_, hit)| hit)
    }

    fn ray_cast_to_polyline(&self, mouse: Vec2, points: &[Vec3]) -> Vec<SnapCandidate> {
        let edges: Vec<Segment> = points
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect();
        self.proximity_candidates(mouse, points, &edges, SnapGroup::Polyline, None)
    }

    fn ray_cast_to_measure(&self, mouse: Vec2, points: &[Vec3]) -> Vec<SnapCandidate> {
        let edges: Vec<Segment> = points
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect();
        self.proximity_candidates(mouse, points, &edges, SnapGroup::Measure, None)
    }

    fn ray_cast_by_proximity(
        &self,
        mouse: Vec2,
        object: &SceneObject,
        face: Option<usize>,
    ) -> Vec<SnapCandidate> {
        let ObjectData::Mesh(mesh) = &object.data else {
            return Vec::new();
        };

        let (indices, edge_indices) = match face {
            Some(face) => {
                let Some(polygon) = mesh.polygons.get(face) else {
                    return Vec::new();
                };
                (polygon.clone(), mesh.polygon_edges(face))
            }
            None => ((0..mesh.vertices.len() as u32).collect(), mesh.all_edges()),
        };

        let vertices: Vec<Vec3> = indices
            .iter()
            .filter_map(|&i| object.world_vertex(mesh, i))
            .collect();
        let edges: Vec<Segment> = edge_indices
            .iter()
            .filter_map(|&edge| object.world_edge(mesh, edge))
            .collect();

        let group = if face.is_some() {
            SnapGroup::Object
        } else {
            SnapGroup::EdgeVertex
        };
        self.proximity_candidates(mouse, &vertices, &edges, group, Some(object.object_ref()))
    }

    fn ray_cast_to_edge_intersection(
        &self,
        mouse: Vec2,
        edges: &[SnapCandidate],
    ) -> Option<SnapCandidate> {
        let segments: Vec<(Segment, SnapGroup)> = edges
            .iter()
            .filter_map(|c| c.edge.map(|edge| (edge, c.group)))
            .collect();

        let mut best: Option<(f32, Vec3, SnapGroup)> = None;
        for (i, (a, group)) in segments.iter().enumerate() {
            for (b, _) in &segments[i + 1..] {
                let Some((p, q)) = closest_points_between_lines(a.start, a.end, b.start, b.end)
                else {
                    continue;
                };
                if p.distance(q) > self.edge_intersection_gap {
                    continue;
                }

                let point = (p + q) * 0.5;
                let Some(distance) = self.screen_distance(point, mouse) else {
                    continue;
                };
                if distance > self.proximity_px {
                    continue;
                }
                if best.is_none_or(|(d, _, _)| distance < d) {
                    best = Some((distance, point, *group));
                }
            }
        }

        best.map(|(distance, point, group)| {
            SnapCandidate::new(point, SnapKind::EdgeIntersection, group, distance)
        })
    }

    fn screen_bounding_box(&self, object: &SceneObject) -> Option<Rect2D> {
        let corners = object.world_bounds_corners();
        if corners.len() != 8 {
            return None;
        }

        // Box edges join corners whose indices differ in one bit
        let mut points = Vec::with_capacity(24);
        for (a, b) in BOX_EDGES {
            let edge = Segment::new(corners[a], corners[b]);
            if let Some((start, end)) = self.project_segment(&edge) {
                points.push(start);
                points.push(end);
            }
        }
        Rect2D::from_points(points)
    }
}
