//! Mutable snapping context of one modal drawing interaction

use glam::{Vec2, Vec3};

use crate::camera::ViewportCamera;
use crate::cycle::modify_snapping_point_selection;
use crate::detect::{DetectionContext, ViewportShading, detect_snapping_points};
use crate::error::SnapResult;
use crate::geometry::Segment;
use crate::raycast::Raycaster;
use crate::scene::SceneObject;
use crate::select::{SelectionInput, select_snapping_points};
use crate::settings::SnapSettings;
use crate::types::{
    AxisMethod, CommittedSnapPoint, ConstraintState, PlaneMethod, ReferenceFrame,
    ReferenceSnapPoint, RunningPolyline, SnapCandidate,
};

/// Per-sample inputs owned by the caller
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Mouse position in viewport pixels
    pub mouse: Vec2,
    pub camera: &'a ViewportCamera,
    pub shading: ViewportShading,
    pub objects: &'a [SceneObject],
    /// Measurement polylines
    pub measurements: &'a [Vec<Vec3>],
    pub frame: ReferenceFrame,
}

/// Owns the constraint state, the running polyline and the output slots.
///
/// Each input sample runs detection, then selection, then writes every slot.
/// Cycling only happens between samples and works on the last ranked list.
#[derive(Debug, Clone, Default)]
pub struct SnapSession {
    settings: SnapSettings,
    state: ConstraintState,
    polyline: RunningPolyline,
    committed: Option<CommittedSnapPoint>,
    reference: Option<ReferenceSnapPoint>,
    guide: Option<Segment>,
    ranked: Vec<SnapCandidate>,
}

impl SnapSession {
    pub fn new(settings: SnapSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &SnapSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SnapSettings {
        &mut self.settings
    }

    pub fn state(&self) -> &ConstraintState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    pub fn polyline(&self) -> &RunningPolyline {
        &self.polyline
    }

    pub fn polyline_mut(&mut self) -> &mut RunningPolyline {
        &mut self.polyline
    }

    pub fn committed_point(&self) -> Option<&CommittedSnapPoint> {
        self.committed.as_ref()
    }

    pub fn reference_point(&self) -> Option<&ReferenceSnapPoint> {
        self.reference.as_ref()
    }

    /// Guide line of the axis resolved by the last update
    pub fn guide(&self) -> Option<&Segment> {
        self.guide.as_ref()
    }

    pub fn ranked(&self) -> &[SnapCandidate] {
        &self.ranked
    }

    /// Run detection and selection for one input sample
    pub fn update<R: Raycaster + ?Sized>(
        &mut self,
        input: &FrameInput<'_>,
        raycaster: &R,
    ) -> SnapResult<&[SnapCandidate]> {
        let ctx = DetectionContext {
            mouse: input.mouse,
            camera: input.camera,
            shading: input.shading,
            objects: input.objects,
            polyline: &self.polyline,
            measurements: input.measurements,
            frame: input.frame,
        };
        let detection = detect_snapping_points(&ctx, raycaster, &mut self.state, &self.settings);
        self.guide = detection.guide;

        let selection = select_snapping_points(
            detection.candidates,
            &SelectionInput {
                state: &self.state,
                settings: &self.settings,
                polyline: &self.polyline,
                frame: &input.frame,
                mouse: input.mouse,
                raycaster,
            },
        )?;

        self.committed = Some(selection.committed);
        self.reference = Some(selection.reference);
        self.ranked = selection.ranked;
        Ok(&self.ranked)
    }

    /// Step to the next candidate of the last ranked list
    pub fn cycle(&mut self, axis_only: bool) -> SnapResult<&CommittedSnapPoint> {
        let cycled = modify_snapping_point_selection(&self.ranked, axis_only)?;
        self.ranked = cycled.ranked;
        Ok(self.committed.insert(cycled.committed))
    }

    pub fn set_snap_plane_method(&mut self, method: Option<PlaneMethod>) {
        tracing::debug!(?method, "Set snap plane method");
        self.state.plane_method = method;
    }

    /// Select a plane method, or clear it when it is already active
    pub fn cycle_snap_plane_method(&mut self, method: PlaneMethod) {
        let next = if self.state.plane_method == Some(method) {
            None
        } else {
            Some(method)
        };
        self.set_snap_plane_method(next);
    }

    /// Lock the cursor to a world axis
    pub fn lock_axis(&mut self, method: AxisMethod) {
        tracing::debug!(?method, "Lock axis");
        self.state.axis_method = Some(method);
        self.state.lock_axis = true;
    }

    pub fn unlock_axis(&mut self) {
        self.state.axis_method = None;
        self.state.lock_axis = false;
        self.state.snap_angle = None;
    }

    /// Append the committed point to the running polyline
    pub fn add_committed_point(&mut self) -> Option<Vec3> {
        let point = self.committed.as_ref()?.point;
        self.polyline.push(point);
        Some(point)
    }

    pub fn clear_snapping_point(&mut self) {
        self.committed = None;
    }

    pub fn clear_snapping_ref(&mut self) {
        self.reference = None;
    }

    /// End of the modal interaction
    pub fn reset(&mut self) {
        tracing::debug!(points = self.polyline.len(), "Reset snap session");
        self.state = ConstraintState::default();
        self.polyline.clear();
        self.committed = None;
        self.reference = None;
        self.guide = None;
        self.ranked.clear();
    }
}
