//! Filtering, ranking and commit of detected candidates

use glam::{Vec2, Vec3};

use crate::error::{SnapError, SnapResult};
use crate::geometry::{Segment, intersect_edge_plane};
use crate::raycast::Raycaster;
use crate::settings::SnapSettings;
use crate::types::{
    CommittedSnapPoint, ConstraintState, ReferenceFrame, ReferenceSnapPoint, RunningPolyline,
    SnapCandidate, SnapGroup, SnapKind,
};

/// Mix points closer than this to the last point are dropped
const MIX_MIN_DISTANCE: f32 = 1e-4;

/// Everything the selector reads besides the candidates
pub struct SelectionInput<'a, R: Raycaster + ?Sized> {
    pub state: &'a ConstraintState,
    pub settings: &'a SnapSettings,
    pub polyline: &'a RunningPolyline,
    pub frame: &'a ReferenceFrame,
    pub mouse: Vec2,
    pub raycaster: &'a R,
}

/// Result of one selection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Ranked candidates; the committed point is always the first entry
    pub ranked: Vec<SnapCandidate>,
    pub committed: CommittedSnapPoint,
    pub reference: ReferenceSnapPoint,
}

/// Intersections of the guide line with the planes through `snap_point`
/// normal to the three oriented world axes.
///
/// Points within 1e-4 of `last_point` are dropped; the rest are sorted by
/// descending distance from it.
pub fn mix_snap_and_axis(
    snap_point: Vec3,
    guide: &Segment,
    last_point: Vec3,
    frame: &ReferenceFrame,
) -> Vec<Vec3> {
    let mut points: Vec<Vec3> = [Vec3::X, Vec3::Y, Vec3::Z]
        .into_iter()
        .filter_map(|axis| {
            intersect_edge_plane(
                guide.start,
                guide.end,
                snap_point,
                frame.orient_vector(axis),
            )
        })
        .filter(|point| point.distance(last_point) > MIX_MIN_DISTANCE)
        .collect();

    points.sort_by(|a, b| b.distance(last_point).total_cmp(&a.distance(last_point)));
    points
}

/// Move the first entry matching `predicate` to the front
fn move_to_front(ranked: &mut Vec<SnapCandidate>, predicate: impl Fn(&SnapCandidate) -> bool) {
    if let Some(index) = ranked.iter().position(predicate) {
        let candidate = ranked.remove(index);
        ranked.insert(0, candidate);
    }
}

/// Filter, rank and commit the candidates of one detection pass
pub fn select_snapping_points<R: Raycaster + ?Sized>(
    candidates: Vec<SnapCandidate>,
    input: &SelectionInput<'_, R>,
) -> SnapResult<Selection> {
    let settings = input.settings;

    let mut by_group: Vec<SnapCandidate> = candidates
        .into_iter()
        .filter(|c| settings.is_group_enabled(c.group))
        .collect();

    let edges: Vec<SnapCandidate> = by_group
        .iter()
        .filter(|c| c.group.contributes_edges() && c.kind == SnapKind::Edge)
        .cloned()
        .collect();
    let guide = by_group
        .iter()
        .filter(|c| c.group == SnapGroup::Axis)
        .filter_map(|c| c.axis_segment)
        .last();

    let intersection = if edges.len() >= 2 {
        input
            .raycaster
            .ray_cast_to_edge_intersection(input.mouse, &edges)
    } else {
        None
    };
    if let Some(intersection) = intersection {
        tracing::trace!(point = ?intersection.point, "Edge intersection");
        by_group.insert(
            0,
            SnapCandidate {
                distance: 0.0,
                ..intersection
            },
        );
    }

    let mut ranked: Vec<SnapCandidate> = by_group
        .into_iter()
        .filter(|c| settings.is_kind_enabled(c.kind))
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let top = ranked
        .first()
        .cloned()
        .ok_or(SnapError::EmptyCandidateList)?;
    let reference = ReferenceSnapPoint::from(&top);

    let has_axis = ranked.iter().any(|c| c.kind == SnapKind::Axis);
    let committed = if input.state.is_axis_locked() && has_axis {
        move_to_front(&mut ranked, |c| c.kind == SnapKind::Axis);

        let mixable = !matches!(top.kind, SnapKind::Axis | SnapKind::Plane);
        if let Some(guide) = guide.filter(|_| mixable) {
            let last_point = input.polyline.reference_point(input.frame.elevation);
            for point in mix_snap_and_axis(top.point, &guide, last_point, input.frame) {
                let mix = SnapCandidate::new(
                    point,
                    SnapKind::Mix,
                    SnapGroup::Axis,
                    point.distance(last_point),
                )
                .with_object(top.object.clone());
                ranked.insert(0, mix);
            }
        }
        CommittedSnapPoint::without_object(&ranked[0])
    } else {
        CommittedSnapPoint::with_object(&ranked[0])
    };

    tracing::trace!(
        kind = %committed.kind,
        point = ?committed.point,
        ranked = ranked.len(),
        "Committed snapping point"
    );

    Ok(Selection {
        ranked,
        committed,
        reference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewportCamera;
    use crate::raycast::ViewportRaycaster;
    use crate::types::{AxisMethod, ObjectRef};
    use uuid::Uuid;

    struct Fixture {
        camera: ViewportCamera,
        settings: SnapSettings,
        state: ConstraintState,
        polyline: RunningPolyline,
        frame: ReferenceFrame,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                camera: ViewportCamera::top(Vec3::ZERO, 10.0, Vec2::new(800.0, 600.0)),
                settings: SnapSettings::default(),
                state: ConstraintState::default(),
                polyline: RunningPolyline::new(),
                frame: ReferenceFrame::default(),
            }
        }

        fn select(&self, candidates: Vec<SnapCandidate>, mouse: Vec2) -> SnapResult<Selection> {
            let raycaster = ViewportRaycaster::new(&self.camera, &self.settings);
            let input = SelectionInput {
                state: &self.state,
                settings: &self.settings,
                polyline: &self.polyline,
                frame: &self.frame,
                mouse,
                raycaster: &raycaster,
            };
            select_snapping_points(candidates, &input)
        }
    }

    fn wall() -> Option<ObjectRef> {
        Some(ObjectRef::new(Uuid::new_v4(), "Wall"))
    }

    #[test]
    fn test_sorted_by_distance() {
        let fixture = Fixture::new();
        let candidates = vec![
            SnapCandidate::plane(Vec3::ZERO),
            SnapCandidate::vertex(Vec3::X, SnapGroup::Object, 4.0).with_object(wall()),
            SnapCandidate::vertex(Vec3::Y, SnapGroup::EdgeVertex, 2.0),
        ];

        let selection = fixture.select(candidates, Vec2::ZERO).unwrap();
        let points: Vec<Vec3> = selection.ranked.iter().map(|c| c.point).collect();

        assert_eq!(points, vec![Vec3::Y, Vec3::X, Vec3::ZERO]);
        assert_eq!(selection.committed.point, selection.ranked[0].point);
        assert_eq!(selection.reference.point, Vec3::Y);
    }

    #[test]
    fn test_commit_keeps_object_name() {
        let fixture = Fixture::new();
        let candidates = vec![
            SnapCandidate::vertex(Vec3::X, SnapGroup::Object, 1.0).with_object(wall()),
            SnapCandidate::plane(Vec3::ZERO),
        ];

        let selection = fixture.select(candidates, Vec2::ZERO).unwrap();
        assert_eq!(selection.committed.object_name.as_deref(), Some("Wall"));
    }

    #[test]
    fn test_disabled_group_is_filtered() {
        let mut fixture = Fixture::new();
        fixture.settings.set_group_enabled(SnapGroup::Object, false);
        fixture.settings.set_group_enabled(SnapGroup::Plane, false);

        let candidates = vec![
            SnapCandidate::vertex(Vec3::X, SnapGroup::Object, 1.0),
            SnapCandidate::plane(Vec3::ZERO),
        ];
        let selection = fixture.select(candidates, Vec2::ZERO).unwrap();

        // Plane can't be switched off
        assert_eq!(selection.ranked.len(), 1);
        assert_eq!(selection.committed.kind, SnapKind::Plane);
    }

    #[test]
    fn test_disabled_kind_is_filtered() {
        let mut fixture = Fixture::new();
        fixture.settings.set_kind_enabled(SnapKind::Vertex, false);

        let candidates = vec![
            SnapCandidate::vertex(Vec3::X, SnapGroup::EdgeVertex, 1.0),
            SnapCandidate::plane(Vec3::ZERO),
        ];
        let selection = fixture.select(candidates, Vec2::ZERO).unwrap();
        assert_eq!(selection.committed.kind, SnapKind::Plane);
    }

    #[test]
    fn test_empty_list_is_an_error() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.select(Vec::new(), Vec2::ZERO),
            Err(SnapError::EmptyCandidateList)
        );
    }

    #[test]
    fn test_edge_intersection_ranks_first() {
        let fixture = Fixture::new();
        let a = Segment::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let b = Segment::new(Vec3::new(0.3, -1.0, 0.0), Vec3::new(0.3, 1.0, 0.0));
        let crossing = Vec3::new(0.3, 0.0, 0.0);
        let candidates = vec![
            SnapCandidate::vertex(Vec3::X, SnapGroup::Object, 0.5),
            SnapCandidate::edge(crossing, a, SnapGroup::Object, 1.0),
            SnapCandidate::edge(crossing, b, SnapGroup::EdgeVertex, 1.5),
            SnapCandidate::plane(crossing),
        ];

        let mouse = fixture.camera.world_to_screen(crossing).unwrap();
        let selection = fixture.select(candidates, mouse).unwrap();

        assert_eq!(selection.ranked[0].kind, SnapKind::EdgeIntersection);
        assert_eq!(selection.ranked[0].distance, 0.0);
        assert!(selection.committed.point.abs_diff_eq(crossing, 1e-4));
    }

    #[test]
    fn test_single_edge_has_no_intersection() {
        let fixture = Fixture::new();
        let a = Segment::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let candidates = vec![
            SnapCandidate::edge(Vec3::ZERO, a, SnapGroup::Object, 1.0),
            SnapCandidate::plane(Vec3::ZERO),
        ];

        let selection = fixture.select(candidates, Vec2::new(400.0, 300.0)).unwrap();
        assert!(
            selection
                .ranked
                .iter()
                .all(|c| c.kind != SnapKind::EdgeIntersection)
        );
    }

    #[test]
    fn test_locked_axis_mixes_with_object_snap() {
        let mut fixture = Fixture::new();
        fixture.state.axis_method = Some(AxisMethod::X);
        fixture.polyline.push(Vec3::ZERO);

        let guide = Segment::new(Vec3::new(1000.0, 0.0, 0.0), Vec3::new(-1000.0, 0.0, 0.0));
        let candidates = vec![
            SnapCandidate::vertex(Vec3::new(3.0, 2.0, 0.0), SnapGroup::Object, 1.0)
                .with_object(wall()),
            SnapCandidate::axis(Vec3::new(2.5, 0.0, 0.0), guide),
            SnapCandidate::plane(Vec3::new(2.5, 0.3, 0.0)),
        ];

        let selection = fixture.select(candidates, Vec2::ZERO).unwrap();
        let kinds: Vec<SnapKind> = selection.ranked.iter().map(|c| c.kind).collect();

        // The X plane through the vertex crosses the guide; Y and Z are parallel
        assert_eq!(
            kinds,
            vec![
                SnapKind::Mix,
                SnapKind::Axis,
                SnapKind::Vertex,
                SnapKind::Plane
            ]
        );
        assert!(selection.ranked[0].point.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-4));
        assert_eq!(selection.ranked[0].object_name(), Some("Wall"));
        assert_eq!(selection.ranked[0].group, SnapGroup::Axis);
        assert_eq!(selection.committed.kind, SnapKind::Mix);
        assert_eq!(selection.committed.object_name, None);
        assert_eq!(selection.reference.kind, SnapKind::Vertex);
    }

    #[test]
    fn test_locked_axis_without_object_snap() {
        let mut fixture = Fixture::new();
        fixture.state.lock_axis = true;

        let guide = Segment::new(Vec3::new(1000.0, 0.0, 0.0), Vec3::new(-1000.0, 0.0, 0.0));
        let candidates = vec![
            SnapCandidate::plane(Vec3::new(2.0, 0.4, 0.0)),
            SnapCandidate::axis(Vec3::new(2.0, 0.0, 0.0), guide),
        ];

        let selection = fixture.select(candidates, Vec2::ZERO).unwrap();
        assert_eq!(selection.ranked[0].kind, SnapKind::Axis);
        assert_eq!(selection.committed.kind, SnapKind::Axis);
        assert_eq!(selection.reference.kind, SnapKind::Plane);
    }

    #[test]
    fn test_mix_drops_points_at_last_point() {
        let guide = Segment::new(Vec3::new(1000.0, 0.0, 0.0), Vec3::new(-1000.0, 0.0, 0.0));
        let frame = ReferenceFrame::default();

        // The X plane through the origin meets the guide at the last point
        let mixes = mix_snap_and_axis(Vec3::new(0.0, 5.0, 0.0), &guide, Vec3::ZERO, &frame);
        assert!(mixes.is_empty());

        let diagonal = Segment::new(Vec3::new(-10.0, -10.0, 0.0), Vec3::new(10.0, 10.0, 0.0));
        let mixes = mix_snap_and_axis(Vec3::new(2.0, 5.0, 0.0), &diagonal, Vec3::ZERO, &frame);
        assert_eq!(mixes.len(), 2);
        assert!(mixes[0].abs_diff_eq(Vec3::new(5.0, 5.0, 0.0), 1e-4));
        assert!(mixes[1].abs_diff_eq(Vec3::new(2.0, 2.0, 0.0), 1e-4));
        assert!(
            mixes
                .iter()
                .all(|p| p.distance(Vec3::ZERO) > MIX_MIN_DISTANCE)
        );
    }
}
