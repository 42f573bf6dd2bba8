use chrono::{DateTime, Utc};

/// Two points closer than this in both axes render as one map vertex.
pub const DEDUP_THRESHOLD_DEG: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedGeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub time: DateTime<Utc>,
}

impl TimedGeoPoint {
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn round5(value: f64) -> f64 {
    round_to(value, 5)
}

// The final input point is kept even when it falls inside the threshold,
// so the drawn line reaches the true endpoint.
pub fn thin_track(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut kept: Vec<GeoPoint> = Vec::new();
    for point in points {
        match kept.last() {
            Some(prev)
                if (prev.lat - point.lat).abs() < DEDUP_THRESHOLD_DEG
                    && (prev.lon - point.lon).abs() < DEDUP_THRESHOLD_DEG => {}
            _ => kept.push(*point),
        }
    }
    if let (Some(last_in), Some(last_kept)) = (points.last(), kept.last()) {
        if last_kept != last_in {
            kept.push(*last_in);
        }
    }
    kept
}
