//! Read-only view of the scene objects the snapping engine works on

use std::collections::BTreeSet;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MeshError;
use crate::geometry::Segment;
use crate::types::ObjectRef;

/// Polygon mesh in object space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    /// Loose edges. Polygon boundaries are derived when this is empty.
    pub edges: Vec<[u32; 2]>,
    /// Polygons as vertex index loops
    pub polygons: Vec<Vec<u32>>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, edges: Vec<[u32; 2]>, polygons: Vec<Vec<u32>>) -> Self {
        Self {
            vertices,
            edges,
            polygons,
        }
    }

    /// Axis-aligned box of the given size, centered on the origin
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let polygons = vec![
            vec![0, 3, 2, 1], // bottom
            vec![4, 5, 6, 7], // top
            vec![0, 1, 5, 4], // front
            vec![1, 2, 6, 5], // right
            vec![2, 3, 7, 6], // back
            vec![3, 0, 4, 7], // left
        ];
        Self::new(vertices, Vec::new(), polygons)
    }

    /// Check every index against the vertex list
    pub fn validate(&self, object: Uuid) -> Result<(), MeshError> {
        let len = self.vertices.len();
        let check = |index: u32| {
            if (index as usize) < len {
                Ok(())
            } else {
                Err(MeshError::IndexOutOfRange { object, index, len })
            }
        };

        for edge in &self.edges {
            check(edge[0])?;
            check(edge[1])?;
        }
        for (polygon, indices) in self.polygons.iter().enumerate() {
            if indices.len() < 3 {
                return Err(MeshError::DegeneratePolygon { object, polygon });
            }
            for &index in indices {
                check(index)?;
            }
        }
        Ok(())
    }

    pub fn has_polygons(&self) -> bool {
        !self.polygons.is_empty()
    }

    /// Boundary edges of one polygon
    pub fn polygon_edges(&self, face: usize) -> Vec<[u32; 2]> {
        let Some(indices) = self.polygons.get(face) else {
            return Vec::new();
        };
        (0..indices.len())
            .map(|i| [indices[i], indices[(i + 1) % indices.len()]])
            .collect()
    }

    /// Every distinct edge: the loose edges, or the polygon boundaries
    pub fn all_edges(&self) -> Vec<[u32; 2]> {
        if !self.edges.is_empty() {
            return self.edges.clone();
        }
        let unique: BTreeSet<[u32; 2]> = (0..self.polygons.len())
            .flat_map(|face| self.polygon_edges(face))
            .map(|[a, b]| if a < b { [a, b] } else { [b, a] })
            .collect();
        unique.into_iter().collect()
    }

    /// Fan triangulation of one polygon
    pub fn polygon_triangles(&self, face: usize) -> Vec<[u32; 3]> {
        let Some(indices) = self.polygons.get(face) else {
            return Vec::new();
        };
        if indices.len() < 3 {
            return Vec::new();
        }
        (1..indices.len() - 1)
            .map(|i| [indices[0], indices[i], indices[i + 1]])
            .collect()
    }

    /// Object-space bounding box
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }
}

/// Poly curve in object space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Curve {
    pub points: Vec<Vec3>,
    pub closed: bool,
}

impl Curve {
    pub fn new(points: Vec<Vec3>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Edge-only mesh with one vertex per curve point
    pub fn to_mesh(&self) -> Mesh {
        let count = self.points.len() as u32;
        let mut edges: Vec<[u32; 2]> = (1..count).map(|i| [i - 1, i]).collect();
        if self.closed && count > 2 {
            edges.push([count - 1, 0]);
        }
        Mesh::new(self.points.clone(), edges, Vec::new())
    }
}

/// Geometry carried by a scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectData {
    Mesh(Mesh),
    Curve(Curve),
    Empty,
    /// Lights, cameras and anything else the snapping tools ignore
    Other,
}

/// Type of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Mesh,
    Curve,
    Empty,
    Other,
}

impl ObjectKind {
    /// Types considered by snapping
    pub fn is_snappable(&self) -> bool {
        matches!(self, ObjectKind::Mesh | ObjectKind::Curve | ObjectKind::Empty)
    }
}

/// A scene object as seen by the snapping engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub data: ObjectData,
    /// Object-to-world transform
    #[serde(default)]
    pub transform: Mat4,
    /// Visible in the current viewport (local view, hidden collections)
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl SceneObject {
    pub fn new(name: impl Into<String>, data: ObjectData, transform: Mat4) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            data,
            transform,
            visible: true,
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh, transform: Mat4) -> Self {
        Self::new(name, ObjectData::Mesh(mesh), transform)
    }

    pub fn curve(name: impl Into<String>, curve: Curve, transform: Mat4) -> Self {
        Self::new(name, ObjectData::Curve(curve), transform)
    }

    pub fn empty(name: impl Into<String>, location: Vec3) -> Self {
        Self::new(name, ObjectData::Empty, Mat4::from_translation(location))
    }

    pub fn kind(&self) -> ObjectKind {
        match self.data {
            ObjectData::Mesh(_) => ObjectKind::Mesh,
            ObjectData::Curve(_) => ObjectKind::Curve,
            ObjectData::Empty => ObjectKind::Empty,
            ObjectData::Other => ObjectKind::Other,
        }
    }

    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.id, self.name.clone())
    }

    /// World-space origin
    pub fn location(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// World-space position of a vertex
    pub fn world_vertex(&self, mesh: &Mesh, index: u32) -> Option<Vec3> {
        mesh.vertices
            .get(index as usize)
            .map(|v| self.transform.transform_point3(*v))
    }

    /// World-space segment for an edge
    pub fn world_edge(&self, mesh: &Mesh, edge: [u32; 2]) -> Option<Segment> {
        Some(Segment::new(
            self.world_vertex(mesh, edge[0])?,
            self.world_vertex(mesh, edge[1])?,
        ))
    }

    /// World-space corners of the object-space bounding box
    pub fn world_bounds_corners(&self) -> Vec<Vec3> {
        let bounds = match &self.data {
            ObjectData::Mesh(mesh) => mesh.bounds(),
            ObjectData::Curve(curve) => curve.to_mesh().bounds(),
            ObjectData::Empty => Some((Vec3::ZERO, Vec3::ZERO)),
            ObjectData::Other => None,
        };
        let Some((min, max)) = bounds else {
            return Vec::new();
        };

        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
        .into_iter()
        .map(|corner| self.transform.transform_point3(corner))
        .collect()
    }

    /// Temporary edge-only mesh object for a curve, sharing this object's
    /// identity. Dropped by the caller once the proximity test is done.
    pub fn to_transient_mesh(&self) -> Option<SceneObject> {
        let ObjectData::Curve(curve) = &self.data else {
            return None;
        };
        Some(SceneObject {
            id: self.id,
            name: self.name.clone(),
            data: ObjectData::Mesh(curve.to_mesh()),
            transform: self.transform,
            visible: self.visible,
        })
    }

    /// Validate mesh indices, if the object carries a mesh
    pub fn validate(&self) -> Result<(), MeshError> {
        match &self.data {
            ObjectData::Mesh(mesh) => mesh.validate(self.id),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_edges() {
        let mesh = Mesh::cuboid(Vec3::ONE);
        assert_eq!(mesh.all_edges().len(), 12);
        assert_eq!(mesh.polygon_edges(0).len(), 4);
        assert_eq!(mesh.polygon_triangles(0).len(), 2);
        assert!(mesh.validate(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X], vec![[0, 2]], Vec::new());
        let id = Uuid::new_v4();
        assert_eq!(
            mesh.validate(id),
            Err(MeshError::IndexOutOfRange {
                object: id,
                index: 2,
                len: 2
            })
        );
    }

    #[test]
    fn test_validate_rejects_degenerate_polygon() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X], Vec::new(), vec![vec![0, 1]]);
        assert!(matches!(
            mesh.validate(Uuid::new_v4()),
            Err(MeshError::DegeneratePolygon { polygon: 0, .. })
        ));
    }

    #[test]
    fn test_closed_curve_to_mesh() {
        let curve = Curve::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], true);
        let mesh = curve.to_mesh();
        assert_eq!(mesh.edges, vec![[0, 1], [1, 2], [2, 0]]);
        assert!(!mesh.has_polygons());
    }

    #[test]
    fn test_transient_mesh_keeps_identity() {
        let curve = SceneObject::curve(
            "Outline",
            Curve::new(vec![Vec3::ZERO, Vec3::X], false),
            Mat4::IDENTITY,
        );
        let transient = curve.to_transient_mesh().unwrap();
        assert_eq!(transient.id, curve.id);
        assert_eq!(transient.kind(), ObjectKind::Mesh);

        let empty = SceneObject::empty("Marker", Vec3::ONE);
        assert!(empty.to_transient_mesh().is_none());
        assert_eq!(empty.location(), Vec3::ONE);
    }
}
