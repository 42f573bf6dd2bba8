use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use rusqlite::Connection;

use crate::config::Config;
use crate::db::{self, DbActivity, DbRoute};
use crate::error::ExtractError;
use crate::pipeline::export::{export, ArtifactLabel, GeoArtifacts, SourceKind};
use crate::pipeline::fit::FitReader;
use crate::pipeline::polyline;
use crate::pipeline::reconstruct::reconstruct;
use crate::report::{self, MapFrame, Row, Section};
use crate::types::activity::format_hms;
use crate::types::geo::GeoPoint;

/// Decimal shift of Strava's encoded polylines.
pub const POLYLINE_PRECISION: u32 = 5;

const DATABASE_NAME: &str = "Strava.sqlite";

const FIT_ACTIVITY_HEADERS: &[&str] = &[
    "Activity Type",
    "Start Time",
    "End Time",
    "Total Time (hh:mm:ss)",
    "Total Distance (km)",
    "Coordinates KML",
    "Map",
];

const DB_ACTIVITY_HEADERS: &[&str] = &[
    "Activity Name",
    "Activity Type",
    "Description",
    "Static (indoors)",
    "Start Time",
    "Total time (hh:mm:ss)",
    "Moving time (hh:mm:ss)",
    "Total distance (km)",
    "Coordinates KML",
    "Map",
];

const ATHLETE_HEADERS: &[&str] = &[
    "User status",
    "First name",
    "Last name",
    "Sex/Gender",
    "Date of birth",
    "City and State",
    "Email address",
    "Username",
    "Account creation date",
    "Biography",
    "Profile picture",
    "Instagram username",
    "Premium account",
];

const ROUTE_HEADERS: &[&str] = &[
    "Route name",
    "Distance (km)",
    "Coordinates KML",
    "Map",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub fit_activities: usize,
    pub db_activities: usize,
    pub athletes: usize,
    pub routes: usize,
}

/// Walks the configured inputs and extracts every Strava trace found.
/// Sources that fail to parse are logged and skipped; only report-level
/// write failures abort the run.
pub fn run(config: &Config) -> Result<RunSummary, ExtractError> {
    fs::create_dir_all(&config.report_dir)?;

    let files = discover_files(&config.inputs);
    let fit_files: Vec<&PathBuf> = files.iter().filter(|path| is_fit_file(path)).collect();
    let database = files.iter().filter(|path| is_strava_database(path)).last();

    let mut sections = Vec::new();
    let mut summary = RunSummary::default();

    if fit_files.is_empty() {
        tracing::info!("Strava FIT recordings: no data available");
    } else if let Some(section) = extract_fit_activities(&fit_files, config) {
        summary.fit_activities = section.rows.len();
        sections.push(section);
    }

    match database {
        None => tracing::info!("Strava database: no data available"),
        Some(path) => match db::open_readonly(path) {
            Err(err) => tracing::warn!("Skipping database {}: {}", path.display(), err),
            Ok(conn) => {
                if let Some(section) = extract_db_activities(&conn, config) {
                    summary.db_activities = section.rows.len();
                    sections.push(section);
                }
                if let Some(section) = extract_athletes(&conn, config) {
                    summary.athletes = section.rows.len();
                    sections.push(section);
                }
                if let Some(section) = extract_routes(&conn, config) {
                    summary.routes = section.rows.len();
                    sections.push(section);
                }
            }
        },
    }

    if sections.is_empty() {
        tracing::info!("Strava: nothing extracted, no report written");
        return Ok(summary);
    }

    let report_path = report::write_report(&config.report_dir, "Strava", &sections)?;
    tracing::info!("Report written to {}", report_path.display());
    Ok(summary)
}

// Sorted so artifact numbering is stable across runs.
fn discover_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for input in inputs {
        collect_files(input, &mut found);
    }
    found.sort();
    found
}

fn collect_files(path: &Path, found: &mut Vec<PathBuf>) {
    if path.is_file() {
        found.push(path.to_path_buf());
        return;
    }
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("Cannot read {}: {}", path.display(), err);
            return;
        }
    };
    for entry in entries.flatten() {
        collect_files(&entry.path(), found);
    }
}

fn is_fit_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("fit"))
        .unwrap_or(false)
}

fn is_strava_database(path: &Path) -> bool {
    path.file_name().map(|name| name == DATABASE_NAME).unwrap_or(false)
}

fn extract_fit_activities(files: &[&PathBuf], config: &Config) -> Option<Section> {
    let mut rows = Vec::new();
    let mut frames = Vec::new();
    for (index, path) in files.iter().enumerate() {
        let label = ArtifactLabel::new(SourceKind::FitFile, index + 1);
        tracing::info!("Processing {}", path.display());
        match fit_activity_row(path, label, config) {
            Ok((row, frame)) => {
                rows.push(row);
                frames.push(frame);
            }
            Err(err) => tracing::warn!("Skipping {}: {}", path.display(), err),
        }
    }
    if rows.is_empty() {
        tracing::info!("Strava FIT activities: no data available");
        return None;
    }
    Some(Section {
        title: "Strava - Activities (FIT)",
        tsv_stem: "strava_activities_fit",
        headers: FIT_ACTIVITY_HEADERS,
        rows: report::dedup_rows(rows),
        map_frames: frames,
    })
}

fn fit_activity_row(
    path: &Path,
    label: ArtifactLabel,
    config: &Config,
) -> Result<(Row, MapFrame), ExtractError> {
    let reader = FitReader::open(path)?;
    let activity = reconstruct(reader)?;
    let points: Vec<GeoPoint> = activity.track.iter().map(|p| p.position()).collect();
    let artifacts = export(&points, label, &config.report_dir)?;
    let row = vec![
        Some(activity.sport.clone()),
        Some(display_time(activity.start_time, config.utc_offset)),
        Some(display_time(activity.end_time, config.utc_offset)),
        Some(activity.elapsed_hms()),
        Some(format!("{:.2}", activity.distance_km)),
        Some(kml_link_cell(label)),
        Some(map_button_cell(label)),
    ];
    Ok((row, map_frame(label, &artifacts)))
}

fn extract_db_activities(conn: &Connection, config: &Config) -> Option<Section> {
    let activities = match db::fetch_activities(conn) {
        Ok(activities) => activities,
        Err(err) => {
            tracing::warn!("Strava activities query failed: {}", err);
            return None;
        }
    };
    if activities.is_empty() {
        tracing::info!("Strava activities: no data available");
        return None;
    }

    let mut rows = Vec::new();
    let mut frames = Vec::new();
    for (index, activity) in activities.iter().enumerate() {
        let label = ArtifactLabel::new(SourceKind::DbActivity, index + 1);
        let (kml_cell, map_cell, frame) = geo_cells(activity.polyline.as_deref(), label, config);
        if let Some(frame) = frame {
            frames.push(frame);
        }
        rows.push(db_activity_row(activity, kml_cell, map_cell, config));
    }
    Some(Section {
        title: "Strava - Activities (Strava.sqlite)",
        tsv_stem: "strava_activities_db",
        headers: DB_ACTIVITY_HEADERS,
        rows,
        map_frames: frames,
    })
}

fn db_activity_row(
    activity: &DbActivity,
    kml_cell: Option<String>,
    map_cell: Option<String>,
    config: &Config,
) -> Row {
    vec![
        activity.name.clone(),
        activity.sport_type.clone(),
        activity.description.clone(),
        Some(yes_no(activity.trainer.unwrap_or(false)).to_string()),
        activity
            .start_seconds
            .and_then(db::core_data_time)
            .map(|time| display_time(time, config.utc_offset)),
        activity.elapsed_seconds.map(|seconds| format_hms(seconds as u64)),
        activity.moving_seconds.map(|seconds| format_hms(seconds as u64)),
        activity.distance_m.map(|meters| format!("{:.3}", meters / 1000.0)),
        kml_cell,
        map_cell,
    ]
}

fn extract_athletes(conn: &Connection, config: &Config) -> Option<Section> {
    let athletes = match db::fetch_athletes(conn) {
        Ok(athletes) => athletes,
        Err(err) => {
            tracing::warn!("Strava athletes query failed: {}", err);
            return None;
        }
    };
    if athletes.is_empty() {
        tracing::info!("Strava athletes: no data available");
        return None;
    }

    let rows = athletes
        .iter()
        .map(|athlete| {
            vec![
                Some(athlete.user_status().to_string()),
                athlete.first_name.clone(),
                athlete.last_name.clone(),
                concat_pair(&athlete.sex, &athlete.gender, "/"),
                athlete
                    .date_of_birth_seconds
                    .and_then(db::core_data_time)
                    .map(|time| time.format("%Y-%m-%d").to_string()),
                concat_pair(&athlete.city, &athlete.state, ", "),
                athlete.email.clone(),
                athlete.username.clone(),
                athlete
                    .created_seconds
                    .and_then(db::core_data_time)
                    .map(|time| display_time(time, config.utc_offset)),
                athlete.bio.clone(),
                athlete.image_link.as_deref().map(image_cell),
                athlete.instagram_username.clone(),
                Some(yes_no(athlete.premium.unwrap_or(false)).to_string()),
            ]
        })
        .collect();
    Some(Section {
        title: "Strava - Athletes (Strava.sqlite)",
        tsv_stem: "strava_athletes",
        headers: ATHLETE_HEADERS,
        rows,
        map_frames: Vec::new(),
    })
}

fn extract_routes(conn: &Connection, config: &Config) -> Option<Section> {
    let routes = match db::fetch_routes(conn) {
        Ok(routes) => routes,
        Err(err) => {
            tracing::warn!("Strava routes query failed: {}", err);
            return None;
        }
    };
    if routes.is_empty() {
        tracing::info!("Strava routes: no data available");
        return None;
    }

    let mut rows = Vec::new();
    let mut frames = Vec::new();
    for (index, route) in routes.iter().enumerate() {
        let label = ArtifactLabel::new(SourceKind::DbRoute, index + 1);
        let (kml_cell, map_cell, frame) = geo_cells(route.polyline.as_deref(), label, config);
        if let Some(frame) = frame {
            frames.push(frame);
        }
        rows.push(route_row(route, kml_cell, map_cell));
    }
    Some(Section {
        title: "Strava - Routes (Strava.sqlite)",
        tsv_stem: "strava_routes",
        headers: ROUTE_HEADERS,
        rows,
        map_frames: frames,
    })
}

fn route_row(route: &DbRoute, kml_cell: Option<String>, map_cell: Option<String>) -> Row {
    vec![
        Some(route.name.clone()),
        route.distance_m.map(|meters| format!("{:.3}", meters / 1000.0)),
        kml_cell,
        map_cell,
    ]
}

// Rows without a usable path keep their place, and their label number,
// with empty cells.
fn geo_cells(
    encoded: Option<&str>,
    label: ArtifactLabel,
    config: &Config,
) -> (Option<String>, Option<String>, Option<MapFrame>) {
    let Some(encoded) = encoded else {
        return (None, None, None);
    };
    let points = match polyline::decode(encoded, POLYLINE_PRECISION) {
        Ok(points) => points,
        Err(err) => {
            tracing::warn!("Skipping path of {}: {}", label, err);
            return (None, None, None);
        }
    };
    if points.is_empty() {
        return (None, None, None);
    }
    match export(&points, label, &config.report_dir) {
        Ok(artifacts) => (
            Some(kml_link_cell(label)),
            Some(map_button_cell(label)),
            Some(map_frame(label, &artifacts)),
        ),
        Err(err) => {
            tracing::warn!("Export failed for {}: {}", label, err);
            (None, None, None)
        }
    }
}

fn display_time(time: DateTime<Utc>, offset: FixedOffset) -> String {
    time.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn concat_pair(first: &Option<String>, second: &Option<String>, separator: &str) -> Option<String> {
    match (first, second) {
        (Some(first), Some(second)) => Some(format!("{}{}{}", first, separator, second)),
        _ => None,
    }
}

fn kml_link_cell(label: ArtifactLabel) -> String {
    format!(
        r#"<a href="{label}.kml" class="badge badge-light" target="_blank">{label}.kml</a>"#
    )
}

fn map_button_cell(label: ArtifactLabel) -> String {
    format!(
        r#"<button type="button" class="btn btn-light btn-sm" onclick="openMap('{label}')">Show Map</button>"#
    )
}

fn image_cell(url: &str) -> String {
    format!(r#"<img src="{url}" alt="{url}" width="124px">"#)
}

fn map_frame(label: ArtifactLabel, artifacts: &GeoArtifacts) -> MapFrame {
    let src = artifacts
        .map_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    MapFrame { id: label.to_string(), src }
}
