//! Stepping through the ranked candidates between input samples

use crate::error::{SnapError, SnapResult};
use crate::types::{CommittedSnapPoint, SnapCandidate};

/// Result of one cycling step
#[derive(Debug, Clone, PartialEq)]
pub struct Cycled {
    pub ranked: Vec<SnapCandidate>,
    pub committed: CommittedSnapPoint,
}

/// Rotate the ranked list left by one and commit the new head.
///
/// With `axis_only`, only the Axis/Mix entries rotate and form the prefix of
/// the result; the remaining entries follow in their original order.
pub fn modify_snapping_point_selection(
    ranked: &[SnapCandidate],
    axis_only: bool,
) -> SnapResult<Cycled> {
    if ranked.is_empty() {
        return Err(SnapError::EmptyCandidateList);
    }

    let shifted = if axis_only {
        let (mut axis, rest): (Vec<SnapCandidate>, Vec<SnapCandidate>) = ranked
            .iter()
            .cloned()
            .partition(|c| c.kind.is_axis_family());
        if !axis.is_empty() {
            axis.rotate_left(1);
        }
        axis.extend(rest);
        axis
    } else {
        let mut all = ranked.to_vec();
        all.rotate_left(1);
        all
    };

    let committed = CommittedSnapPoint::without_object(&shifted[0]);
    tracing::trace!(kind = %committed.kind, axis_only, "Cycled snapping point");

    Ok(Cycled {
        ranked: shifted,
        committed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use crate::types::{ObjectRef, SnapGroup, SnapKind};
    use glam::Vec3;
    use uuid::Uuid;

    fn sample() -> Vec<SnapCandidate> {
        let guide = Segment::new(Vec3::X * 1000.0, Vec3::X * -1000.0);
        vec![
            SnapCandidate::new(Vec3::new(3.0, 0.0, 0.0), SnapKind::Mix, SnapGroup::Axis, 3.0),
            SnapCandidate::vertex(Vec3::new(3.0, 2.0, 0.0), SnapGroup::Object, 1.0)
                .with_object(Some(ObjectRef::new(Uuid::new_v4(), "Wall"))),
            SnapCandidate::axis(Vec3::new(2.5, 0.0, 0.0), guide),
            SnapCandidate::plane(Vec3::new(2.5, 0.3, 0.0)),
        ]
    }

    fn points(list: &[SnapCandidate]) -> Vec<Vec3> {
        list.iter().map(|c| c.point).collect()
    }

    #[test]
    fn test_rotates_left() {
        let ranked = sample();
        let cycled = modify_snapping_point_selection(&ranked, false).unwrap();

        assert_eq!(cycled.ranked[0], ranked[1]);
        assert_eq!(cycled.ranked[3], ranked[0]);
        assert_eq!(cycled.committed.point, ranked[1].point);
        assert_eq!(cycled.committed.object_name, None);
    }

    #[test]
    fn test_full_cycle_restores_order() {
        let ranked = sample();
        let mut current = ranked.clone();
        for _ in 0..ranked.len() {
            current = modify_snapping_point_selection(&current, false)
                .unwrap()
                .ranked;
        }
        assert_eq!(points(&current), points(&ranked));
    }

    #[test]
    fn test_axis_only_keeps_remainder() {
        let ranked = sample();
        let cycled = modify_snapping_point_selection(&ranked, true).unwrap();
        let kinds: Vec<SnapKind> = cycled.ranked.iter().map(|c| c.kind).collect();

        assert_eq!(
            kinds,
            vec![
                SnapKind::Axis,
                SnapKind::Mix,
                SnapKind::Vertex,
                SnapKind::Plane
            ]
        );
        assert_eq!(cycled.committed.kind, SnapKind::Axis);

        let again = modify_snapping_point_selection(&cycled.ranked, true).unwrap();
        assert_eq!(again.ranked[0].kind, SnapKind::Mix);
        assert_eq!(&again.ranked[2..], &cycled.ranked[2..]);
    }

    #[test]
    fn test_axis_only_without_axis_entries() {
        let ranked = vec![
            SnapCandidate::vertex(Vec3::X, SnapGroup::Object, 1.0),
            SnapCandidate::plane(Vec3::ZERO),
        ];
        let cycled = modify_snapping_point_selection(&ranked, true).unwrap();
        assert_eq!(cycled.ranked, ranked);
    }

    #[test]
    fn test_empty_list_is_an_error() {
        assert_eq!(
            modify_snapping_point_selection(&[], false),
            Err(SnapError::EmptyCandidateList)
        );
    }
}
