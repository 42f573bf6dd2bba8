mod profile;
mod reader;

pub use reader::FitReader;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum FitMessage {
    Position(PositionRecord),
    Session(SessionSummary),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRecord {
    pub raw_lat: i32,
    pub raw_lon: i32,
    pub time: DateTime<Utc>,
}

/// Summary fields as recorded; any subset may be present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSummary {
    pub start_time: Option<DateTime<Utc>>,
    pub total_elapsed_seconds: Option<u32>,
    pub sport: Option<String>,
    pub total_distance_m: Option<f64>,
}

pub fn semicircles_to_degrees(semicircles: i32) -> f64 {
    (semicircles as f64) * (180.0 / 2_147_483_648.0)
}
