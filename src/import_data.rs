use crate::position::PositionSample;
use anyhow::{Context, Result};
use gpx::read;
use std::{fs::File, io::BufReader, path::Path};

/// Reads every track point of a GPX file in file order, e.g. to replay a walk
/// as a live geolocation feed. Segment and track boundaries are flattened.
pub fn load_gpx(file_path: &Path) -> Result<Vec<PositionSample>> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open GPX file {}", file_path.display()))?;
    let gpx_data = read(BufReader::new(file))
        .with_context(|| format!("Failed to parse GPX file {}", file_path.display()))?;
    let samples: Vec<PositionSample> = gpx_data
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(PositionSample::from)
        .collect();
    info!(
        "loaded {} track points from {}",
        samples.len(),
        file_path.display()
    );
    Ok(samples)
}
