//! Pairwise detection similarity; every value is a cost, lower is better

use crate::bbox::{center_distance, inverse_iou};
use crate::config::Modality;
use crate::detection::{Detection, JOINT_COUNT};
use crate::error::{Result, TrackError};

/// Cost of pairing `previous` with `current` under the given modality.
///
/// Units depend on the modality (pixels for distances, [0, 1] for IoU), so
/// thresholds downstream live in the same unit space.
pub fn similarity(modality: Modality, previous: &Detection, current: &Detection) -> Result<f64> {
    match modality {
        Modality::BoundingBoxesDistance => Ok(center_distance(&previous.bbox, &current.bbox)),
        Modality::BoundingBoxesIou => Ok(inverse_iou(&previous.bbox, &current.bbox)),
        Modality::Joints => joint_distance(previous, current),
    }
}

/// Sum of Euclidean distances between corresponding keypoints
pub fn joint_distance(previous: &Detection, current: &Detection) -> Result<f64> {
    let (a, b) = (previous.joints(), current.joints());
    if a.len() != JOINT_COUNT || b.len() != JOINT_COUNT {
        return Err(TrackError::JointCountMismatch {
            previous: a.len(),
            current: b.len(),
        });
    }

    Ok(a.iter()
        .zip(b)
        .map(|(p, q)| (p[0] - q[0]).hypot(p[1] - q[1]))
        .sum())
}
