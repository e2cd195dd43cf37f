//! Snap candidates and the committed snap slots

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Segment;

/// Distance given to candidates that are always available but must never
/// beat a closer real hit (empties, bare faces, axis and plane points).
pub const LOW_PRIORITY_DISTANCE: f32 = 10.0;

/// Geometric nature of a snap candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SnapKind {
    Vertex,
    Edge,
    EdgeCenter,
    EdgeIntersection,
    Face,
    Axis,
    Plane,
    Mix,
}

impl SnapKind {
    /// All snap kinds
    pub fn all() -> [SnapKind; 8] {
        [
            SnapKind::Vertex,
            SnapKind::Edge,
            SnapKind::EdgeCenter,
            SnapKind::EdgeIntersection,
            SnapKind::Face,
            SnapKind::Axis,
            SnapKind::Plane,
            SnapKind::Mix,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            SnapKind::Vertex => "Vertex",
            SnapKind::Edge => "Edge",
            SnapKind::EdgeCenter => "Edge Center",
            SnapKind::EdgeIntersection => "Edge Intersection",
            SnapKind::Face => "Face",
            SnapKind::Axis => "Axis",
            SnapKind::Plane => "Plane",
            SnapKind::Mix => "Mix",
        }
    }

    /// Axis and mix points form the family stepped through by axis-only cycling
    pub fn is_axis_family(&self) -> bool {
        matches!(self, SnapKind::Axis | SnapKind::Mix)
    }
}

impl fmt::Display for SnapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detection phase that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SnapGroup {
    Polyline,
    Measure,
    EdgeVertex,
    Object,
    Axis,
    Plane,
}

impl SnapGroup {
    /// All snap groups
    pub fn all() -> [SnapGroup; 6] {
        [
            SnapGroup::Polyline,
            SnapGroup::Measure,
            SnapGroup::EdgeVertex,
            SnapGroup::Object,
            SnapGroup::Axis,
            SnapGroup::Plane,
        ]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            SnapGroup::Polyline => "Polyline",
            SnapGroup::Measure => "Measure",
            SnapGroup::EdgeVertex => "Edge-Vertex",
            SnapGroup::Object => "Object",
            SnapGroup::Axis => "Axis",
            SnapGroup::Plane => "Plane",
        }
    }

    /// Groups whose edges take part in edge-intersection snapping
    pub fn contributes_edges(&self) -> bool {
        matches!(
            self,
            SnapGroup::Polyline | SnapGroup::Measure | SnapGroup::EdgeVertex | SnapGroup::Object
        )
    }
}

impl fmt::Display for SnapGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weak reference to a scene object: identity and display name only
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: Uuid,
    pub name: String,
}

impl ObjectRef {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A typed 3D point proposed as a possible cursor target
#[derive(Debug, Clone, PartialEq)]
pub struct SnapCandidate {
    /// World-space position
    pub point: Vec3,
    pub kind: SnapKind,
    pub group: SnapGroup,
    /// Screen-space distance to the mouse, or a priority proxy
    pub distance: f32,
    /// Object the point was found on
    pub object: Option<ObjectRef>,
    /// Polygon index for face hits
    pub face_index: Option<usize>,
    /// World-space edge for edge and edge-center hits
    pub edge: Option<Segment>,
    /// Guide line of the resolved axis, set on axis candidates
    pub axis_segment: Option<Segment>,
}

impl SnapCandidate {
    /// Create a candidate with no object, face, edge or axis attached
    pub fn new(point: Vec3, kind: SnapKind, group: SnapGroup, distance: f32) -> Self {
        Self {
            point,
            kind,
            group,
            distance,
            object: None,
            face_index: None,
            edge: None,
            axis_segment: None,
        }
    }

    /// Vertex candidate
    pub fn vertex(point: Vec3, group: SnapGroup, distance: f32) -> Self {
        Self::new(point, SnapKind::Vertex, group, distance)
    }

    /// Point on an edge
    pub fn edge(point: Vec3, edge: Segment, group: SnapGroup, distance: f32) -> Self {
        Self {
            edge: Some(edge),
            ..Self::new(point, SnapKind::Edge, group, distance)
        }
    }

    /// Midpoint of an edge
    pub fn edge_center(edge: Segment, group: SnapGroup, distance: f32) -> Self {
        Self {
            edge: Some(edge),
            ..Self::new(edge.midpoint(), SnapKind::EdgeCenter, group, distance)
        }
    }

    /// Bare face hit, ranked below any proximity hit
    pub fn face(point: Vec3, face_index: usize) -> Self {
        Self {
            face_index: Some(face_index),
            ..Self::new(point, SnapKind::Face, SnapGroup::Object, LOW_PRIORITY_DISTANCE)
        }
    }

    /// Point projected onto a constrained axis
    pub fn axis(point: Vec3, guide: Segment) -> Self {
        Self {
            axis_segment: Some(guide),
            ..Self::new(point, SnapKind::Axis, SnapGroup::Axis, LOW_PRIORITY_DISTANCE)
        }
    }

    /// Raw intersection with the constraint plane
    pub fn plane(point: Vec3) -> Self {
        Self::new(point, SnapKind::Plane, SnapGroup::Plane, LOW_PRIORITY_DISTANCE)
    }

    /// Attach the object the candidate was found on
    pub fn with_object(mut self, object: Option<ObjectRef>) -> Self {
        self.object = object;
        self
    }

    /// Name of the source object, if any
    pub fn object_name(&self) -> Option<&str> {
        self.object.as_ref().map(|o| o.name.as_str())
    }
}

/// The single authoritative snap point consumed by the drawing tools
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedSnapPoint {
    pub point: Vec3,
    pub kind: SnapKind,
    pub object_name: Option<String>,
}

impl CommittedSnapPoint {
    /// Commit a candidate, keeping its source object for highlighting
    pub fn with_object(candidate: &SnapCandidate) -> Self {
        Self {
            point: candidate.point,
            kind: candidate.kind,
            object_name: candidate.object_name().map(str::to_owned),
        }
    }

    /// Commit a candidate by position and kind only
    pub fn without_object(candidate: &SnapCandidate) -> Self {
        Self {
            point: candidate.point,
            kind: candidate.kind,
            object_name: None,
        }
    }
}

/// Annotation-only snap point: the top raw candidate of the last pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceSnapPoint {
    pub point: Vec3,
    pub kind: SnapKind,
}

impl From<&SnapCandidate> for ReferenceSnapPoint {
    fn from(candidate: &SnapCandidate) -> Self {
        Self {
            point: candidate.point,
            kind: candidate.kind,
        }
    }
}
