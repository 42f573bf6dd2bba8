use chrono::{DateTime, Utc};

use crate::types::geo::TimedGeoPoint;

#[derive(Debug, Clone)]
pub struct Activity {
    pub sport: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub elapsed_seconds: u32,
    pub distance_km: f64,
    pub track: Vec<TimedGeoPoint>,
}

impl Activity {
    pub fn elapsed_hms(&self) -> String {
        format_hms(u64::from(self.elapsed_seconds))
    }
}

// Hours are unbounded: 90000 seconds is "25:00:00", not a clock time.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
