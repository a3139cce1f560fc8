use idtrack::{process, BoundingBox, Detection, FrameStore, TrackerConfig};

fn main() -> anyhow::Result<()> {
    println!("Tracking a short synthetic sequence...");

    let mut frames = FrameStore::new();

    // Frames 1-3: two people walking right
    for frame in 1..=3 {
        let step = frame as f64 * 4.0;
        frames.push(Detection::new(frame, BoundingBox::new(10.0 + step, 20.0, 40.0, 90.0)));
        frames.push(Detection::new(frame, BoundingBox::new(300.0 + step, 25.0, 38.0, 85.0)));
    }

    // Frames 4-5: the second person is occluded
    for frame in 4..=5 {
        let step = frame as f64 * 4.0;
        frames.push(Detection::new(frame, BoundingBox::new(10.0 + step, 20.0, 40.0, 90.0)));
    }

    // Frame 6 is missing entirely, both are back in frame 7
    frames.push(Detection::new(7, BoundingBox::new(38.0, 21.0, 40.0, 90.0)));
    frames.push(Detection::new(7, BoundingBox::new(327.0, 24.0, 38.0, 85.0)));

    let config = TrackerConfig {
        min_trajectory_length: 3,
        ..TrackerConfig::default()
    };
    let result = process(frames, &config)?;

    println!("Identities allocated: {}", result.identities);
    println!("Gaps: {:?}", result.gaps);
    for (frame, detection) in result.reportable(config.min_trajectory_length) {
        println!(
            "  frame {:>2} id {:?} {:?} {}",
            frame, detection.person_id, detection.origin, detection.bbox
        );
    }
    for (person_id, length) in result.trajectories.iter() {
        println!("  trajectory {}: {} frames", person_id, length);
    }

    Ok(())
}
