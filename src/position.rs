use serde::{Deserialize, Serialize};

/// A single geolocation fix.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionSample {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        PositionSample {
            latitude,
            longitude,
        }
    }

    /// Returns `None` for readings that cannot be a position on earth, such as
    /// NaN or a latitude past the poles. Those are treated as "no update".
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let sample = Self::new(latitude, longitude);
        if sample.is_valid() {
            Some(sample)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `[lat, lon]`, the order map widgets expect.
    pub fn lat_lng(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

impl From<&gpx::Waypoint> for PositionSample {
    fn from(waypoint: &gpx::Waypoint) -> Self {
        let point = waypoint.point();
        PositionSample::new(point.y(), point.x())
    }
}
