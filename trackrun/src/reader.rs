//! Reader for comma-separated detection files
//!
//! One detection per line: `frame,id,x,y,w,h[,skeleton]`. The id column is a
//! placeholder and ignored. Lines with at least 38 fields carry 16 (x, y)
//! keypoints in columns 6..38; shorter lines (plain MOT rows with confidence
//! and world coordinates) have no keypoints.

use crate::error::{Result, RunError};
use idtrack::{BoundingBox, Detection, FrameStore, Joint, JOINT_COUNT};
use std::fs;
use std::path::Path;

/// Columns before the skeleton data: frame, id and the box
const BOX_COLUMNS: usize = 6;

/// Read a whole detection file into a frame store
pub fn read(path: &Path) -> Result<FrameStore> {
    let content = fs::read_to_string(path)?;
    parse_detections(&content, path)
}

/// Parse detection lines; `path` is only used in error messages
pub fn parse_detections(content: &str, path: &Path) -> Result<FrameStore> {
    let mut frames = FrameStore::new();

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let detection =
            parse_line(line).map_err(|message| RunError::parse(path, number + 1, message))?;
        frames.push(detection);
    }

    log::debug!(
        "Read {} detections in {} frames from {}",
        frames.num_detections(),
        frames.num_frames(),
        path.display()
    );
    Ok(frames)
}

fn parse_line(line: &str) -> std::result::Result<Detection, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < BOX_COLUMNS {
        return Err(format!("expected at least 6 fields, got {}", fields.len()));
    }

    let frame_index: u32 = fields[0]
        .parse()
        .map_err(|e| format!("invalid frame index {:?}: {}", fields[0], e))?;
    if frame_index == 0 {
        return Err("frame indices start at 1".to_string());
    }

    let coords = parse_floats(&fields[2..6])?;
    let bbox = BoundingBox::new(coords[0], coords[1], coords[2], coords[3]);

    let joints = if fields.len() >= BOX_COLUMNS + 2 * JOINT_COUNT {
        parse_floats(&fields[BOX_COLUMNS..BOX_COLUMNS + 2 * JOINT_COUNT])?
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
            .collect::<Vec<Joint>>()
    } else {
        Vec::new()
    };

    Detection::with_joints(frame_index, bbox, joints).map_err(|e| e.to_string())
}

fn parse_floats(fields: &[&str]) -> std::result::Result<Vec<f64>, String> {
    fields
        .iter()
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|e| format!("invalid number {:?}: {}", field, e))
        })
        .collect()
}
