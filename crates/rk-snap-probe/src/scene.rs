//! RON scene description and the replay of its mouse samples

use std::fmt;
use std::path::Path;

use glam::{Vec2, Vec3};
use rk_snap::{
    CommittedSnapPoint, ConstraintState, FrameInput, ReferenceFrame, RunningPolyline,
    SceneObject, Segment, SnapCandidate, SnapSession, SnapSettings, UnitSettings,
    ViewportCamera, ViewportRaycaster, ViewportShading,
};
use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, ProbeResult};

/// Where the mouse sits for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MousePosition {
    /// Viewport pixels, origin top-left
    Screen(Vec2),
    /// World point projected through the scene camera
    World(Vec3),
}

/// One input sample, optionally followed by cycling and a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseSample {
    pub at: MousePosition,
    /// Number of cycling steps after the update
    #[serde(default)]
    pub cycles: usize,
    #[serde(default)]
    pub axis_only: bool,
    /// Append the committed point to the polyline afterwards
    #[serde(default)]
    pub commit: bool,
}

/// Everything needed to replay a drawing interaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeScene {
    pub camera: ViewportCamera,
    pub shading: ViewportShading,
    pub frame: ReferenceFrame,
    pub objects: Vec<SceneObject>,
    /// Points already placed by the tool
    pub polyline: Vec<Vec3>,
    pub measurements: Vec<Vec<Vec3>>,
    pub state: ConstraintState,
    pub samples: Vec<MouseSample>,
    /// Overrides the configured snap settings
    pub settings: Option<SnapSettings>,
    /// Overrides the configured unit settings
    pub units: Option<UnitSettings>,
}

/// Outcome of one sample
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    pub mouse: Vec2,
    pub ranked: Vec<SnapCandidate>,
    pub committed: Option<CommittedSnapPoint>,
    pub guide: Option<Segment>,
}

impl ProbeScene {
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ProbeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_ron(&content)?;
        tracing::info!(
            objects = scene.objects.len(),
            samples = scene.samples.len(),
            "Loaded scene from {:?}",
            path
        );
        Ok(scene)
    }

    pub fn from_ron(content: &str) -> ProbeResult<Self> {
        let scene: Self = ron::from_str(content)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check mesh indices of every object
    pub fn validate(&self) -> ProbeResult<()> {
        for object in &self.objects {
            object.validate()?;
        }
        Ok(())
    }

    fn mouse(&self, at: MousePosition) -> Option<Vec2> {
        match at {
            MousePosition::Screen(mouse) => Some(mouse),
            MousePosition::World(point) => self.camera.world_to_screen(point),
        }
    }

    /// Replay every sample through one snap session
    pub fn run(&self, settings: SnapSettings) -> ProbeResult<Vec<SampleReport>> {
        let mut session = SnapSession::new(settings);
        *session.state_mut() = self.state.clone();
        *session.polyline_mut() = RunningPolyline::from_points(self.polyline.clone());
        let raycaster = ViewportRaycaster::new(&self.camera, session.settings());

        let mut reports = Vec::with_capacity(self.samples.len());
        for sample in &self.samples {
            let Some(mouse) = self.mouse(sample.at) else {
                tracing::warn!("Sample {:?} is behind the camera, skipped", sample.at);
                continue;
            };

            let input = FrameInput {
                mouse,
                camera: &self.camera,
                shading: self.shading,
                objects: &self.objects,
                measurements: &self.measurements,
                frame: self.frame,
            };
            session.update(&input, &raycaster)?;
            for _ in 0..sample.cycles {
                session.cycle(sample.axis_only)?;
            }

            reports.push(SampleReport {
                mouse,
                ranked: session.ranked().to_vec(),
                committed: session.committed_point().cloned(),
                guide: session.guide().copied(),
            });

            if sample.commit {
                session.add_committed_point();
            }
        }
        Ok(reports)
    }
}

fn fmt_point(point: Vec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", point.x, point.y, point.z)
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mouse ({:.1}, {:.1})", self.mouse.x, self.mouse.y)?;
        for (i, candidate) in self.ranked.iter().enumerate() {
            write!(
                f,
                "  {:>2}. {:<17} {:<11} {} d={:.3}",
                i,
                candidate.kind,
                candidate.group,
                fmt_point(candidate.point),
                candidate.distance
            )?;
            if let Some(name) = candidate.object_name() {
                write!(f, " [{}]", name)?;
            }
            writeln!(f)?;
        }
        if let Some(guide) = &self.guide {
            writeln!(
                f,
                "  guide {} -> {}",
                fmt_point(guide.start),
                fmt_point(guide.end)
            )?;
        }
        match &self.committed {
            Some(committed) => {
                write!(
                    f,
                    "  committed {} {}",
                    committed.kind,
                    fmt_point(committed.point)
                )?;
                if let Some(name) = &committed.object_name {
                    write!(f, " [{}]", name)?;
                }
                Ok(())
            }
            None => write!(f, "  nothing committed"),
        }
    }
}
