//! Association of detections between a previous and a current frame

use crate::assignment::AssignmentSolver;
use crate::config::TrackerConfig;
use crate::detection::{Detection, FrameIndex, FrameStore, PersonId, Trajectories};
use crate::error::{Result, TrackError};
use crate::interpolation::interpolate_gap;
use crate::refinement;
use crate::similarity::similarity;
use ndarray::Array2;
use rayon::prelude::*;
use std::collections::HashSet;

/// Number of frames skipped between two frame indices (0 when consecutive)
pub fn frame_gap(previous: FrameIndex, current: FrameIndex) -> u32 {
    current.saturating_sub(previous).saturating_sub(1)
}

/// Multiplier applied to a pair cost: `1 + decay * gap`
pub fn decay_factor(decay: f64, previous: FrameIndex, current: FrameIndex) -> f64 {
    1.0 + decay * f64::from(frame_gap(previous, current))
}

/// Matches one frame against the frame before it
#[derive(Debug, Clone)]
pub struct FrameMatcher {
    config: TrackerConfig,
}

impl FrameMatcher {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Decayed cost of pairing a previous-frame detection with a current one
    pub fn pair_cost(&self, previous: &Detection, current: &Detection) -> Result<f64> {
        let base = similarity(self.config.modality, previous, current)?;
        Ok(base
            * decay_factor(
                self.config.memory_decay,
                previous.frame_index,
                current.frame_index,
            ))
    }

    /// Cost matrix with previous-frame detections as rows
    pub fn cost_matrix(
        &self,
        previous: &[Detection],
        current: &[Detection],
    ) -> Result<Array2<f64>> {
        let costs = previous
            .par_iter()
            .flat_map_iter(|prev| current.iter().map(move |cur| self.pair_cost(prev, cur)))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array2::from_shape_vec((previous.len(), current.len()), costs)?)
    }

    /// Carry identities from `previous` into `current`.
    ///
    /// Stamps `person_id` on matched current detections, credits interpolated
    /// frames to the identity's trajectory and writes the interpolated
    /// detections into `frames`. Returns the identities that were continued;
    /// empty when either side has no detections.
    ///
    /// Only interpolated frames are credited here; the current frame of a
    /// continued identity is credited by `IdentityTracker::step`.
    pub fn match_frames(
        &self,
        frames: &mut FrameStore,
        trajectories: &mut Trajectories,
        previous: &[Detection],
        current: &mut [Detection],
    ) -> Result<HashSet<PersonId>> {
        let mut continued = HashSet::new();
        if previous.is_empty() || current.is_empty() {
            return Ok(continued);
        }

        let cost_matrix = self.cost_matrix(previous, current)?;
        let assignment = AssignmentSolver::solve(cost_matrix.view(), self.config.solver)?;

        for (row, col) in assignment.assignments {
            let prev = &previous[row];
            let cur = &mut current[col];

            if !refinement::accepts(self.config.refinement, prev, cur) {
                log::trace!(
                    "Refinement rejected pair {} (frame {}) -> {} (frame {})",
                    prev.bbox,
                    prev.frame_index,
                    cur.bbox,
                    cur.frame_index
                );
                continue;
            }

            let person_id = prev.person_id.ok_or(TrackError::MissingIdentity {
                frame_index: prev.frame_index,
            })?;
            cur.person_id = Some(person_id);
            continued.insert(person_id);

            if self.config.interpolation {
                let filled = interpolate_gap(prev, cur, person_id);
                if !filled.is_empty() {
                    trajectories.credit(person_id, filled.len() as u32);
                    for detection in filled {
                        frames.insert(detection.frame_index, detection);
                    }
                }
            }
        }

        Ok(continued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;
    use crate::config::{Modality, RefinementMode, SolverMode};
    use approx::assert_abs_diff_eq;

    fn det(frame: FrameIndex, x: f64, y: f64, id: Option<PersonId>) -> Detection {
        let mut detection = Detection::new(frame, BoundingBox::new(x, y, 10.0, 10.0));
        detection.person_id = id;
        detection
    }

    fn matcher(config: TrackerConfig) -> FrameMatcher {
        FrameMatcher::new(config).unwrap()
    }

    #[test]
    fn test_decay_factor() {
        assert_eq!(decay_factor(0.5, 4, 5), 1.0);
        assert_eq!(decay_factor(0.5, 4, 6), 1.5);
        assert_eq!(decay_factor(0.5, 4, 8), 2.5);
        assert_eq!(decay_factor(0.0, 1, 9), 1.0);
    }

    #[test]
    fn test_decayed_cost_strictly_increases_with_gap() {
        let m = matcher(TrackerConfig::default());
        let cur = det(20, 3.0, 4.0, None);
        let costs: Vec<f64> = (10..20)
            .rev()
            .map(|frame| m.pair_cost(&det(frame, 0.0, 0.0, Some(1)), &cur).unwrap())
            .collect();

        assert_abs_diff_eq!(costs[0], 5.0, epsilon = 1e-12);
        assert!(costs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_cost_matrix_layout() {
        let m = matcher(TrackerConfig::default());
        let previous = vec![det(1, 0.0, 0.0, Some(1)), det(1, 100.0, 0.0, Some(2))];
        let current = vec![
            det(2, 100.0, 0.0, None),
            det(2, 0.0, 3.0, None),
            det(2, 0.0, 0.0, None),
        ];

        let cost = m.cost_matrix(&previous, &current).unwrap();
        assert_eq!(cost.dim(), (2, 3));
        assert_abs_diff_eq!(cost[[0, 1]], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cost[[1, 0]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cost[[0, 2]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_side_continues_nothing() {
        let m = matcher(TrackerConfig::default());
        let mut frames = FrameStore::new();
        let mut trajectories = Trajectories::new();
        let mut current = vec![det(2, 0.0, 0.0, None)];

        let continued = m
            .match_frames(&mut frames, &mut trajectories, &[], &mut current)
            .unwrap();
        assert!(continued.is_empty());
        assert!(current[0].person_id.is_none());
        assert!(trajectories.is_empty());
    }

    #[test]
    fn test_match_carries_identity_forward() {
        for solver in [SolverMode::Exact, SolverMode::Greedy] {
            let m = matcher(TrackerConfig {
                solver,
                ..TrackerConfig::default()
            });
            let mut frames = FrameStore::new();
            let mut trajectories = Trajectories::new();
            let previous = vec![det(1, 0.0, 0.0, Some(1)), det(1, 200.0, 0.0, Some(2))];
            let mut current = vec![det(2, 202.0, 1.0, None), det(2, 1.0, 1.0, None)];

            let continued = m
                .match_frames(&mut frames, &mut trajectories, &previous, &mut current)
                .unwrap();

            assert_eq!(continued, HashSet::from([1, 2]));
            assert_eq!(current[0].person_id, Some(2));
            assert_eq!(current[1].person_id, Some(1));
            // Consecutive frames: nothing interpolated, nothing credited
            assert!(frames.is_empty());
            assert!(trajectories.is_empty());
        }
    }

    #[test]
    fn test_refinement_rejects_distant_pair() {
        let m = matcher(TrackerConfig {
            refinement: RefinementMode::Iou,
            ..TrackerConfig::default()
        });
        let mut frames = FrameStore::new();
        let mut trajectories = Trajectories::new();
        let previous = vec![det(1, 0.0, 0.0, Some(1))];
        let mut current = vec![det(2, 500.0, 500.0, None)];

        let continued = m
            .match_frames(&mut frames, &mut trajectories, &previous, &mut current)
            .unwrap();
        assert!(continued.is_empty());
        assert!(current[0].person_id.is_none());
    }

    #[test]
    fn test_gap_is_interpolated_and_credited() {
        let m = matcher(TrackerConfig::default());
        let mut frames = FrameStore::new();
        let mut trajectories = Trajectories::new();
        let previous = vec![det(3, 0.0, 0.0, Some(4))];
        let mut current = vec![det(6, 3.0, 6.0, None)];

        m.match_frames(&mut frames, &mut trajectories, &previous, &mut current)
            .unwrap();

        assert_eq!(trajectories.length(4), 2);
        let first = &frames.get(4).unwrap()[0];
        assert!(first.is_interpolated());
        assert_eq!(first.bbox, BoundingBox::new(1.0, 2.0, 10.0, 10.0));
        assert_eq!(frames.get(5).unwrap()[0].bbox.y, 4.0);
    }

    #[test]
    fn test_interpolation_disabled() {
        let m = matcher(TrackerConfig {
            interpolation: false,
            ..TrackerConfig::default()
        });
        let mut frames = FrameStore::new();
        let mut trajectories = Trajectories::new();
        let previous = vec![det(3, 0.0, 0.0, Some(4))];
        let mut current = vec![det(6, 3.0, 6.0, None)];

        let continued = m
            .match_frames(&mut frames, &mut trajectories, &previous, &mut current)
            .unwrap();
        assert_eq!(continued, HashSet::from([4]));
        assert!(frames.is_empty());
        assert_eq!(trajectories.length(4), 0);
    }

    #[test]
    fn test_previous_without_identity_is_an_error() {
        let m = matcher(TrackerConfig::default());
        let mut frames = FrameStore::new();
        let mut trajectories = Trajectories::new();
        let previous = vec![det(1, 0.0, 0.0, None)];
        let mut current = vec![det(2, 0.0, 0.0, None)];

        let err = m
            .match_frames(&mut frames, &mut trajectories, &previous, &mut current)
            .unwrap_err();
        assert!(matches!(err, TrackError::MissingIdentity { frame_index: 1 }));
    }

    #[test]
    fn test_joint_modality_without_joints_fails() {
        let m = matcher(TrackerConfig {
            modality: Modality::Joints,
            ..TrackerConfig::default()
        });
        let previous = vec![det(1, 0.0, 0.0, Some(1))];
        let current = vec![det(2, 0.0, 0.0, None)];
        assert!(matches!(
            m.cost_matrix(&previous, &current),
            Err(TrackError::JointCountMismatch { .. })
        ));
    }
}
