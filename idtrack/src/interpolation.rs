//! Linear interpolation of boxes across skipped frames

use crate::bbox::BoundingBox;
use crate::detection::{Detection, FrameIndex, PersonId};

/// Decimal places kept on synthesized coordinates
const COORDINATE_DECIMALS: i32 = 2;

/// Synthesize one detection per frame strictly between `first` and `second`.
///
/// The left/top and right/bottom edges are interpolated independently, so
/// the size changes linearly as well. Returns nothing for consecutive frames.
pub fn interpolate_gap(
    first: &Detection,
    second: &Detection,
    person_id: PersonId,
) -> Vec<Detection> {
    let (start, end) = (first.frame_index, second.frame_index);
    if end <= start + 1 {
        return Vec::new();
    }

    let (a, b) = (&first.bbox, &second.bbox);
    (start + 1..end)
        .map(|frame| {
            let at = |from: f64, to: f64| lerp(frame, start, end, from, to);
            let bbox = BoundingBox::from_bounds(
                at(a.x, b.x),
                at(a.y, b.y),
                at(a.right(), b.right()),
                at(a.bottom(), b.bottom()),
            )
            .rounded(COORDINATE_DECIMALS);
            Detection::interpolated(frame, bbox, person_id)
        })
        .collect()
}

fn lerp(frame: FrameIndex, start: FrameIndex, end: FrameIndex, from: f64, to: f64) -> f64 {
    let t = f64::from(frame - start) / f64::from(end - start);
    from + (to - from) * t
}
