//! Online identity tracking over a whole sequence of frames

use crate::config::TrackerConfig;
use crate::detection::{Detection, FrameIndex, FrameStore, PersonId, Trajectories};
use crate::error::Result;
use crate::matcher::FrameMatcher;
use crate::memory::IdentityCache;
use std::ops::RangeInclusive;

/// Processing stops after this many frames in a row without detections
pub const MAX_CONSECUTIVE_MISSING_FRAMES: usize = 20;

/// Output of a tracking pass
#[derive(Debug, Clone)]
pub struct TrackingResult {
    /// Input frames with identities stamped, plus interpolated and cached
    /// detections
    pub frames: FrameStore,
    pub trajectories: Trajectories,
    /// Runs of frames without detections that processing resumed after
    pub gaps: Vec<RangeInclusive<FrameIndex>>,
    /// Number of identities allocated
    pub identities: u32,
}

impl TrackingResult {
    /// Detections worth reporting: everything except cache replays, limited
    /// to identities whose trajectory is at least `min_length` frames long.
    /// Frames come in ascending order, detections in insertion order.
    pub fn reportable(
        &self,
        min_length: u32,
    ) -> impl Iterator<Item = (FrameIndex, &Detection)> + '_ {
        self.frames.iter().flat_map(move |(frame_index, frame)| {
            frame
                .iter()
                .filter(move |detection| {
                    !detection.is_cached()
                        && detection
                            .person_id
                            .is_some_and(|id| self.trajectories.length(id) >= min_length)
                })
                .map(move |detection| (frame_index, detection))
        })
    }
}

/// Tracking state for one sequence
pub struct IdentityTracker {
    matcher: FrameMatcher,
    next_identity: PersonId,
    trajectories: Trajectories,
    cache: IdentityCache,
    previous_frame: Vec<Detection>,
    gaps: Vec<RangeInclusive<FrameIndex>>,
}

impl IdentityTracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        Ok(Self {
            matcher: FrameMatcher::new(config)?,
            next_identity: 0,
            trajectories: Trajectories::new(),
            cache: IdentityCache::new(),
            previous_frame: Vec::new(),
            gaps: Vec::new(),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        self.matcher.config()
    }

    /// Track every frame from index 1 until input runs out
    pub fn process(mut self, mut frames: FrameStore) -> Result<TrackingResult> {
        let mut frame_index: FrameIndex = 0;
        let mut missing: Vec<FrameIndex> = Vec::new();

        while missing.len() < MAX_CONSECUTIVE_MISSING_FRAMES {
            frame_index += 1;

            if !frames.has_detections(frame_index) {
                missing.push(frame_index);
                continue;
            }

            if let (Some(&first), Some(&last)) = (missing.first(), missing.last()) {
                log::warn!("Missing frames no. {:?}", missing);
                self.gaps.push(first..=last);
                missing.clear();
            }

            self.step(&mut frames, frame_index)?;
            log::debug!("Processed frame {}", frame_index);
        }

        let unprocessed = frames
            .iter()
            .filter(|(index, frame)| *index > frame_index && !frame.is_empty())
            .count();
        if unprocessed > 0 {
            log::warn!(
                "{} frames after frame {} were not processed",
                unprocessed,
                frame_index
            );
        }

        Ok(TrackingResult {
            frames,
            trajectories: self.trajectories,
            gaps: self.gaps,
            identities: self.next_identity,
        })
    }

    /// Match frame `frame_index` against the previous one and finalize it
    fn step(&mut self, frames: &mut FrameStore, frame_index: FrameIndex) -> Result<()> {
        let mut current = frames.take(frame_index);
        let previous = std::mem::take(&mut self.previous_frame);

        let continued = self.matcher.match_frames(
            frames,
            &mut self.trajectories,
            &previous,
            &mut current,
        )?;

        for detection in &previous {
            if let Some(person_id) = detection.person_id {
                if !continued.contains(&person_id) {
                    self.cache.remember(person_id, detection);
                }
            }
        }
        let ttl = self.config().memory_ttl;
        self.cache.prune(frame_index, ttl, &continued);

        for detection in current.iter_mut() {
            let person_id = match detection.person_id {
                Some(person_id) => person_id,
                None => {
                    self.next_identity += 1;
                    detection.person_id = Some(self.next_identity);
                    self.next_identity
                }
            };
            self.trajectories.credit(person_id, 1);
        }

        current.extend(self.cache.replay());
        self.previous_frame = current.clone();
        frames.restore(frame_index, current);
        Ok(())
    }
}

/// Track a whole sequence with the given configuration
pub fn process(frames: FrameStore, config: &TrackerConfig) -> Result<TrackingResult> {
    IdentityTracker::new(config.clone())?.process(frames)
}
