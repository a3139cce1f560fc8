//! Post-assignment veto of proposed pairs

use crate::bbox::{center_distance, inverse_iou};
use crate::config::RefinementMode;
use crate::detection::Detection;

/// Whether a pair chosen by the solver should be kept.
///
/// Independent of the cost that produced the pairing: a cheap pair under one
/// modality can still be rejected here.
pub fn accepts(mode: RefinementMode, previous: &Detection, current: &Detection) -> bool {
    match mode {
        RefinementMode::Off => true,
        RefinementMode::Iou => inverse_iou(&previous.bbox, &current.bbox) < 1.0,
        RefinementMode::Distance => {
            let allowed = previous.bbox.max_side().max(current.bbox.max_side());
            center_distance(&previous.bbox, &current.bbox) <= allowed
        }
    }
}
