//! User-facing snapping settings

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{SnapGroup, SnapKind};

/// Snap toggles and tuning values.
///
/// Built once per frame from whatever settings UI exists and passed down
/// explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    /// Snap kinds the user has switched on
    pub enabled_kinds: BTreeSet<SnapKind>,
    /// Detection groups the user has switched on
    pub enabled_groups: BTreeSet<SnapGroup>,
    /// Maximum lateral deviation, in scene units, for a point to stick to a
    /// rotational axis
    pub axis_tolerance: f32,
    /// Pixel margin around screen bounding boxes, also used as the step of
    /// the retry grid when a direct object cast misses
    pub pick_offset_px: f32,
    /// Pixel radius for vertex and edge proximity hits
    pub proximity_px: f32,
    /// Largest gap, in scene units, between two edges still treated as
    /// intersecting
    pub edge_intersection_gap: f32,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled_kinds: SnapKind::all().into_iter().collect(),
            enabled_groups: SnapGroup::all().into_iter().collect(),
            axis_tolerance: 0.15,
            pick_offset_px: 10.0,
            proximity_px: 10.0,
            edge_intersection_gap: 1e-3,
        }
    }
}

impl SnapSettings {
    /// Plane and axis points can never be filtered out
    pub fn is_kind_enabled(&self, kind: SnapKind) -> bool {
        matches!(kind, SnapKind::Plane | SnapKind::Axis) || self.enabled_kinds.contains(&kind)
    }

    /// Edge-vertex, axis and plane groups can never be filtered out
    pub fn is_group_enabled(&self, group: SnapGroup) -> bool {
        matches!(group, SnapGroup::EdgeVertex | SnapGroup::Axis | SnapGroup::Plane)
            || self.enabled_groups.contains(&group)
    }

    pub fn set_kind_enabled(&mut self, kind: SnapKind, enabled: bool) {
        if enabled {
            self.enabled_kinds.insert(kind);
        } else {
            self.enabled_kinds.remove(&kind);
        }
    }

    pub fn set_group_enabled(&mut self, group: SnapGroup, enabled: bool) {
        if enabled {
            self.enabled_groups.insert(group);
        } else {
            self.enabled_groups.remove(&group);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_and_axis_always_enabled() {
        let settings = SnapSettings {
            enabled_kinds: BTreeSet::new(),
            enabled_groups: BTreeSet::new(),
            ..Default::default()
        };

        assert!(settings.is_kind_enabled(SnapKind::Plane));
        assert!(settings.is_kind_enabled(SnapKind::Axis));
        assert!(!settings.is_kind_enabled(SnapKind::Vertex));

        assert!(settings.is_group_enabled(SnapGroup::EdgeVertex));
        assert!(settings.is_group_enabled(SnapGroup::Axis));
        assert!(settings.is_group_enabled(SnapGroup::Plane));
        assert!(!settings.is_group_enabled(SnapGroup::Object));
    }

    #[test]
    fn test_toggle_kind() {
        let mut settings = SnapSettings::default();
        settings.set_kind_enabled(SnapKind::Face, false);
        assert!(!settings.is_kind_enabled(SnapKind::Face));

        settings.set_kind_enabled(SnapKind::Face, true);
        assert!(settings.is_kind_enabled(SnapKind::Face));
    }
}
