//! Detections, the sparse frame store and per-identity trajectory counters

use crate::bbox::BoundingBox;
use crate::error::{Result, TrackError};
use std::collections::BTreeMap;

/// Persistent identity label, allocated from 1 upwards
pub type PersonId = u32;

/// 1-based frame number
pub type FrameIndex = u32;

/// Single keypoint as (x, y)
pub type Joint = [f64; 2];

/// Number of keypoints carried by a pose detection
pub const JOINT_COUNT: usize = 16;

/// Where a detection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Produced by the detector
    #[default]
    Observed,
    /// Synthesized to fill a frame gap between two matched detections
    Interpolated,
    /// Replayed from the identity cache; drives matching only, never reported
    Cached,
}

/// One observed or synthesized object instance in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub frame_index: FrameIndex,
    pub bbox: BoundingBox,
    /// Empty when the detector produced no keypoints
    joints: Vec<Joint>,
    pub person_id: Option<PersonId>,
    pub origin: Origin,
}

impl Detection {
    /// Observed detection without keypoints
    pub fn new(frame_index: FrameIndex, bbox: BoundingBox) -> Self {
        Self {
            frame_index,
            bbox,
            joints: Vec::new(),
            person_id: None,
            origin: Origin::Observed,
        }
    }

    /// Observed detection with keypoints; either none or exactly [`JOINT_COUNT`]
    pub fn with_joints(
        frame_index: FrameIndex,
        bbox: BoundingBox,
        joints: Vec<Joint>,
    ) -> Result<Self> {
        if !joints.is_empty() && joints.len() != JOINT_COUNT {
            return Err(TrackError::InvalidJointCount {
                expected: JOINT_COUNT,
                actual: joints.len(),
            });
        }
        Ok(Self {
            joints,
            ..Self::new(frame_index, bbox)
        })
    }

    pub(crate) fn interpolated(
        frame_index: FrameIndex,
        bbox: BoundingBox,
        person_id: PersonId,
    ) -> Self {
        Self {
            person_id: Some(person_id),
            origin: Origin::Interpolated,
            ..Self::new(frame_index, bbox)
        }
    }

    pub(crate) fn cached(
        frame_index: FrameIndex,
        bbox: BoundingBox,
        joints: Vec<Joint>,
        person_id: PersonId,
    ) -> Self {
        Self {
            frame_index,
            bbox,
            joints,
            person_id: Some(person_id),
            origin: Origin::Cached,
        }
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn is_interpolated(&self) -> bool {
        self.origin == Origin::Interpolated
    }

    pub fn is_cached(&self) -> bool {
        self.origin == Origin::Cached
    }
}

/// Sparse, ordered map from frame index to that frame's detections.
///
/// Missing keys are frames without detector output. Any key may be written
/// at any time: interpolation writes back into frames that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStore {
    frames: BTreeMap<FrameIndex, Vec<Detection>>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a detection to its own frame
    pub fn push(&mut self, detection: Detection) {
        self.frames
            .entry(detection.frame_index)
            .or_default()
            .push(detection);
    }

    /// Append a detection under an explicit frame index
    pub fn insert(&mut self, frame_index: FrameIndex, detection: Detection) {
        self.frames.entry(frame_index).or_default().push(detection);
    }

    pub fn get(&self, frame_index: FrameIndex) -> Option<&[Detection]> {
        self.frames.get(&frame_index).map(Vec::as_slice)
    }

    /// Detach a frame so it can be mutated alongside the rest of the store
    pub fn take(&mut self, frame_index: FrameIndex) -> Vec<Detection> {
        self.frames.remove(&frame_index).unwrap_or_default()
    }

    /// Reattach a frame, keeping anything written to its key while detached
    pub fn restore(&mut self, frame_index: FrameIndex, mut detections: Vec<Detection>) {
        if let Some(written) = self.frames.remove(&frame_index) {
            detections.extend(written);
        }
        if !detections.is_empty() {
            self.frames.insert(frame_index, detections);
        }
    }

    pub fn has_detections(&self, frame_index: FrameIndex) -> bool {
        self.frames
            .get(&frame_index)
            .is_some_and(|frame| !frame.is_empty())
    }

    /// Frames in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, &[Detection])> {
        self.frames
            .iter()
            .map(|(index, frame)| (*index, frame.as_slice()))
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn num_detections(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FromIterator<Detection> for FrameStore {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        let mut store = Self::new();
        for detection in iter {
            store.push(detection);
        }
        store
    }
}

/// Per-identity count of frames the identity appeared in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectories {
    counts: BTreeMap<PersonId, u32>,
}

impl Trajectories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, person_id: PersonId, frames: u32) {
        *self.counts.entry(person_id).or_insert(0) += frames;
    }

    /// Frame count of an identity, 0 when never seen
    pub fn length(&self, person_id: PersonId) -> u32 {
        self.counts.get(&person_id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonId, u32)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox() -> BoundingBox {
        BoundingBox::new(1.0, 2.0, 3.0, 4.0)
    }

    #[test]
    fn test_new_detection_is_observed_without_identity() {
        let det = Detection::new(3, bbox());
        assert_eq!(det.origin, Origin::Observed);
        assert!(det.person_id.is_none());
        assert!(det.joints().is_empty());
    }

    #[test]
    fn test_joint_count_is_validated() {
        assert!(Detection::with_joints(1, bbox(), vec![[0.0, 0.0]; JOINT_COUNT]).is_ok());
        assert!(Detection::with_joints(1, bbox(), Vec::new()).is_ok());

        let err = Detection::with_joints(1, bbox(), vec![[0.0, 0.0]; 15]).unwrap_err();
        assert!(matches!(
            err,
            TrackError::InvalidJointCount {
                expected: JOINT_COUNT,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_frame_store_is_sparse_and_ordered() {
        let store: FrameStore = [5, 1, 5, 3]
            .into_iter()
            .map(|frame| Detection::new(frame, bbox()))
            .collect();

        let order: Vec<_> = store.iter().map(|(index, frame)| (index, frame.len())).collect();
        assert_eq!(order, vec![(1, 1), (3, 1), (5, 2)]);
        assert!(!store.has_detections(2));
        assert_eq!(store.num_detections(), 4);
    }

    #[test]
    fn test_restore_keeps_writes_made_while_detached() {
        let mut store = FrameStore::new();
        store.push(Detection::new(2, bbox()));

        let frame = store.take(2);
        assert!(store.get(2).is_none());
        store.insert(2, Detection::interpolated(2, bbox(), 9));
        store.restore(2, frame);

        let frame = store.get(2).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].origin, Origin::Observed);
        assert!(frame[1].is_interpolated());
    }

    #[test]
    fn test_restore_drops_empty_frames() {
        let mut store = FrameStore::new();
        store.restore(4, Vec::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_trajectories_credit() {
        let mut trajectories = Trajectories::new();
        trajectories.credit(2, 1);
        trajectories.credit(2, 3);
        assert_eq!(trajectories.length(2), 4);
        assert_eq!(trajectories.length(7), 0);
        assert_eq!(trajectories.len(), 1);
    }
}
