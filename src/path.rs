use crate::position::PositionSample;

/// The recorded trace of one tracking session, oldest fix first.
/// Append-only; it is dropped together with its session.
#[derive(Debug, Default, PartialEq)]
pub struct Path {
    track_points: Vec<PositionSample>,
}

impl Path {
    pub fn new() -> Self {
        Path {
            track_points: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, sample: PositionSample) {
        self.track_points.push(sample);
    }

    pub fn len(&self) -> usize {
        self.track_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_points.is_empty()
    }

    pub fn last(&self) -> Option<&PositionSample> {
        self.track_points.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionSample> {
        self.track_points.iter()
    }

    pub fn as_slice(&self) -> &[PositionSample] {
        &self.track_points
    }

    /// A line needs at least two points; returns `None` before that.
    pub fn polyline(&self) -> Option<Vec<[f64; 2]>> {
        if self.track_points.len() > 1 {
            Some(self.track_points.iter().map(|p| p.lat_lng()).collect())
        } else {
            None
        }
    }
}
