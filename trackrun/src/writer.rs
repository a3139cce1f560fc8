//! Writer for tracked detection files

use crate::error::Result;
use idtrack::{Detection, FrameIndex, TrackingResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Shortest round-trip form with a trailing `.0` on integral values.
/// Exponents are signed and at least two digits wide (`1e-07`, `1.5e+16`).
pub fn format_coordinate(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => repr,
    }
}

/// One output line: `frame,person_id,x,y,w,h,-1,-1,-1,-1`
pub fn format_line(frame_index: FrameIndex, detection: &Detection) -> Option<String> {
    let person_id = detection.person_id?;
    let bbox = &detection.bbox;
    Some(format!(
        "{},{},{},{},{},{},-1,-1,-1,-1",
        frame_index,
        person_id,
        format_coordinate(bbox.x),
        format_coordinate(bbox.y),
        format_coordinate(bbox.width),
        format_coordinate(bbox.height)
    ))
}

/// Write every reportable detection, returning the number of lines written
pub fn write_results<W: Write>(
    out: &mut W,
    result: &TrackingResult,
    min_trajectory_length: u32,
) -> Result<usize> {
    let mut lines = 0;
    for (frame_index, detection) in result.reportable(min_trajectory_length) {
        if let Some(line) = format_line(frame_index, detection) {
            writeln!(out, "{}", line)?;
            lines += 1;
        }
    }
    Ok(lines)
}

/// Write results to `path`, replacing any existing file
pub fn write(path: &Path, result: &TrackingResult, min_trajectory_length: u32) -> Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    let lines = write_results(&mut out, result, min_trajectory_length)?;
    out.flush()?;
    Ok(lines)
}
