//! RK Snapping Engine
//!
//! Turns a 2D mouse position plus scene geometry into one authoritative 3D snap
//! point for the drawing tools (polylines, walls, measurements).
//!
//! # Architecture
//!
//! Every input sample runs the same pipeline:
//!
//! - [`raycast::Raycaster`] - Collaborator seam for screen-space ray casts
//! - [`detect::detect_snapping_points`] - Collects typed, scored candidates
//! - [`select::select_snapping_points`] - Filters, ranks and commits one point
//! - [`cycle::modify_snapping_point_selection`] - Steps to the next candidate
//!
//! [`axis::snap_on_axis`] projects free points onto rotational axes and
//! [`increment::get_increment_snap_value`] derives the grid increment from the
//! current zoom level. [`session::SnapSession`] owns the mutable state of one
//! modal interaction.
//!
//! # Example
//!
//! ```ignore
//! use rk_snap::{SnapSession, SnapSettings, ViewportCamera, ViewportRaycaster};
//!
//! let mut session = SnapSession::new(SnapSettings::default());
//! let raycaster = ViewportRaycaster::new(&camera, session.settings());
//! let ranked = session.update(&frame_input, &raycaster)?;
//! let committed = session.committed_point();
//! ```

pub mod axis;
pub mod camera;
pub mod cycle;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod increment;
pub mod raycast;
pub mod scene;
pub mod select;
pub mod session;
pub mod settings;
pub mod types;

pub use axis::{AxisSnap, snap_on_axis};
pub use camera::{Projection, ViewportCamera};
pub use cycle::{Cycled, modify_snapping_point_selection};
pub use detect::{
    Detection, DetectionContext, ShadingType, ViewportShading, detect_snapping_points,
};
pub use error::{MeshError, SnapError, SnapResult};
pub use geometry::{Ray, Rect2D, Segment};
pub use increment::{UnitSettings, UnitSystem, get_increment_snap_value};
pub use raycast::{ObjectHit, Raycaster, ViewportRaycaster};
pub use scene::{Curve, Mesh, ObjectData, ObjectKind, SceneObject};
pub use select::{Selection, SelectionInput, select_snapping_points};
pub use session::{FrameInput, SnapSession};
pub use settings::SnapSettings;
pub use types::*;
