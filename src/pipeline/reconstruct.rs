use chrono::{DateTime, Duration, Utc};

use crate::error::ReconstructError;
use crate::pipeline::fit::{semicircles_to_degrees, FitMessage};
use crate::types::activity::Activity;
use crate::types::geo::{round5, round_to, TimedGeoPoint};

#[derive(Debug, Default)]
struct ActivityDraft {
    track: Vec<TimedGeoPoint>,
    sport: Option<String>,
    start_time: Option<DateTime<Utc>>,
    total_elapsed_seconds: Option<u32>,
    total_distance_m: Option<f64>,
}

/// Folds one file's message stream into an [`Activity`]. Session fields
/// merge per field, last write wins.
pub fn reconstruct(
    messages: impl Iterator<Item = FitMessage>,
) -> Result<Activity, ReconstructError> {
    let mut draft = ActivityDraft::default();

    for message in messages {
        match message {
            FitMessage::Position(record) => {
                draft.track.push(TimedGeoPoint {
                    lat: round5(semicircles_to_degrees(record.raw_lat)),
                    lon: round5(semicircles_to_degrees(record.raw_lon)),
                    time: record.time,
                });
            }
            FitMessage::Session(summary) => {
                if let Some(start) = summary.start_time {
                    draft.start_time = Some(start);
                }
                if let Some(elapsed) = summary.total_elapsed_seconds {
                    draft.total_elapsed_seconds = Some(elapsed);
                }
                if let Some(sport) = summary.sport {
                    draft.sport = Some(sport);
                }
                if let Some(distance) = summary.total_distance_m {
                    draft.total_distance_m = Some(distance);
                }
            }
        }
    }

    draft.finish()
}

impl ActivityDraft {
    fn finish(self) -> Result<Activity, ReconstructError> {
        let mut missing = Vec::new();
        if self.track.is_empty() {
            missing.push("position records");
        }
        if self.sport.is_none() {
            missing.push("sport");
        }
        if self.start_time.is_none() {
            missing.push("start time");
        }
        if self.total_elapsed_seconds.is_none() {
            missing.push("total elapsed time");
        }
        if self.total_distance_m.is_none() {
            missing.push("total distance");
        }

        let (Some(sport), Some(start_time), Some(elapsed_seconds), Some(distance_m)) = (
            self.sport,
            self.start_time,
            self.total_elapsed_seconds,
            self.total_distance_m,
        ) else {
            return Err(ReconstructError::MissingRequiredFields(missing));
        };
        if self.track.is_empty() {
            return Err(ReconstructError::MissingRequiredFields(missing));
        }

        Ok(Activity {
            sport,
            start_time,
            end_time: start_time + Duration::seconds(i64::from(elapsed_seconds)),
            elapsed_seconds,
            distance_km: round_to(distance_m / 1000.0, 2),
            track: self.track,
        })
    }
}
