//! Offline identity tracking for per-frame object detections
//!
//! Detections are associated frame to frame with an exact (Kuhn-Munkres) or
//! greedy assignment over a decayed cost matrix. Identities that disappear
//! are kept in a short-term cache and replayed as matching candidates, and
//! skipped frames between matched detections are filled by interpolation.
//!
//! ```rust,ignore
//! use idtrack::{BoundingBox, Detection, FrameStore, TrackerConfig};
//!
//! let frames: FrameStore = vec![
//!     Detection::new(1, BoundingBox::new(10.0, 10.0, 40.0, 80.0)),
//!     Detection::new(2, BoundingBox::new(12.0, 11.0, 40.0, 80.0)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let result = idtrack::process(frames, &TrackerConfig::default())?;
//! for (frame, detection) in result.reportable(1) {
//!     println!("{frame}: {:?} {}", detection.person_id, detection.bbox);
//! }
//! ```

pub mod assignment;
pub mod bbox;
pub mod config;
pub mod detection;
pub mod error;
pub mod interpolation;
pub mod matcher;
pub mod memory;
pub mod refinement;
pub mod similarity;
pub mod tracker;

pub use assignment::{AssignmentResult, AssignmentSolver};
pub use bbox::BoundingBox;
pub use config::{Modality, RefinementMode, SolverMode, TrackerConfig};
pub use detection::{
    Detection, FrameIndex, FrameStore, Joint, Origin, PersonId, Trajectories, JOINT_COUNT,
};
pub use error::{Result, TrackError};
pub use matcher::FrameMatcher;
pub use tracker::{process, IdentityTracker, TrackingResult};
