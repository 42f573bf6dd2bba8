use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use rusqlite::{params, Connection};
use stravex::config::Config;
use stravex::extract;

// Decodes to (38.5, -120.2) and (40.7, -120.95).
const POLYLINE: &str = "_p~iF~ps|U_ulLnnqC";

fn schema(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE ZMAP (Z_PK INTEGER PRIMARY KEY, ZPOLYLINE TEXT);
         CREATE TABLE ZACTIVITY (
             Z_PK INTEGER PRIMARY KEY,
             ZNAME TEXT,
             ZSPORTTYPE TEXT,
             ZUSERDESCRIPTION TEXT,
             ZTRAINER INTEGER,
             ZSTARTTIMESTAMP REAL,
             ZELAPSEDTIME REAL,
             ZMOVINGTIME REAL,
             ZDISTANCE REAL,
             ZMAP INTEGER,
             ZATHLETE INTEGER
         );
         CREATE TABLE ZATHLETE (
             Z_PK INTEGER PRIMARY KEY,
             ZREMOTEID INTEGER,
             ZFIRSTNAME TEXT,
             ZLASTNAME TEXT,
             ZSEX TEXT,
             ZGENDER TEXT,
             ZDATEOFBIRTH REAL,
             ZLOCATIONCITY TEXT,
             ZLOCATIONSTATE TEXT,
             ZEMAIL TEXT,
             ZUSERNAME TEXT,
             ZCREATEDAT REAL,
             ZBIO TEXT,
             ZIMAGELINKLARGE TEXT,
             ZINSTAGRAMUSERNAME TEXT,
             ZPREMIUM INTEGER
         );
         CREATE TABLE ZATHLETEPROFILE (Z_PK INTEGER PRIMARY KEY, ZREMOTEID INTEGER);
         CREATE TABLE ZROUTE (
             Z_PK INTEGER PRIMARY KEY,
             ZNAME TEXT,
             ZDISTANCE REAL,
             ZMAP INTEGER,
             ZATHLETE INTEGER
         );",
    )
    .expect("schema");
}

fn seeded_database(dir: &Path) -> PathBuf {
    let path = dir.join("Strava.sqlite");
    let conn = Connection::open(&path).expect("create db");
    schema(&conn);

    conn.execute(
        "INSERT INTO ZMAP (Z_PK, ZPOLYLINE) VALUES (1, ?1), (2, ?1)",
        params![POLYLINE],
    )
    .expect("maps");

    // Main user's outdoor ride with a recorded path.
    conn.execute(
        "INSERT INTO ZACTIVITY VALUES
         (1, 'Morning Ride', 'Ride', NULL, 0, 700000000.0, 3661.0, 3600.0, 25000.0, 1, 1)",
        [],
    )
    .expect("activity 1");
    // Indoor session without a path.
    conn.execute(
        "INSERT INTO ZACTIVITY VALUES
         (2, 'Treadmill', 'Run', 'easy spin', 1, 700010000.0, 1800.0, 1700.0, 5000.0, NULL, 1)",
        [],
    )
    .expect("activity 2");
    // A friend's activity, not the main user's.
    conn.execute(
        "INSERT INTO ZACTIVITY VALUES
         (3, 'Evening Jog', 'Run', NULL, 0, 700020000.0, 900.0, 880.0, 3000.0, NULL, 2)",
        [],
    )
    .expect("activity 3");

    conn.execute(
        "INSERT INTO ZATHLETE VALUES
         (1, 100, 'Jo', 'Smith', 'M', 'Male', -336787200.0, 'Boulder', 'Colorado',
          'jo@example.com', 'josmith', 600000000.0, 'Rides bikes',
          'https://example.com/a.jpg', 'jo.gram', 1)",
        [],
    )
    .expect("athlete 1");
    conn.execute(
        "INSERT INTO ZATHLETE VALUES
         (2, 200, 'Ann', NULL, NULL, 'Female', NULL, NULL, NULL,
          NULL, NULL, NULL, NULL, NULL, NULL, NULL)",
        [],
    )
    .expect("athlete 2");
    // No profile row: excluded from the report.
    conn.execute(
        "INSERT INTO ZATHLETE VALUES
         (3, 300, 'Ghost', NULL, NULL, NULL, NULL, NULL, NULL,
          NULL, NULL, NULL, NULL, NULL, NULL, NULL)",
        [],
    )
    .expect("athlete 3");
    conn.execute(
        "INSERT INTO ZATHLETEPROFILE (Z_PK, ZREMOTEID) VALUES (1, 100), (2, 200)",
        [],
    )
    .expect("profiles");

    conn.execute(
        "INSERT INTO ZROUTE VALUES (1, 'To Work', 5255.0, 2, 1)",
        [],
    )
    .expect("route 1");
    // Unnamed routes are drafts and stay out of the report.
    conn.execute("INSERT INTO ZROUTE VALUES (2, NULL, 100.0, NULL, 1)", [])
        .expect("route 2");
    conn.execute(
        "INSERT INTO ZROUTE VALUES (3, 'Hill Loop', 12000.0, NULL, 1)",
        [],
    )
    .expect("route 3");

    path
}

fn config(input: &Path, report: &Path, offset_seconds: i32) -> Config {
    Config {
        inputs: vec![input.to_path_buf()],
        report_dir: report.to_path_buf(),
        utc_offset: FixedOffset::east_opt(offset_seconds).expect("offset"),
    }
}

#[test]
fn extracts_all_database_sections() {
    let input = tempfile::tempdir().expect("input dir");
    let report = tempfile::tempdir().expect("report dir");
    seeded_database(input.path());

    let summary = extract::run(&config(input.path(), report.path(), 0)).expect("run");
    assert_eq!(summary.fit_activities, 0);
    assert_eq!(summary.db_activities, 2);
    assert_eq!(summary.athletes, 2);
    assert_eq!(summary.routes, 2);

    let html = fs::read_to_string(report.path().join("Strava_Report.html")).expect("report");

    assert!(html.contains("<h2>Strava - Activities (Strava.sqlite)</h2>"));
    assert!(html.contains("Morning Ride"));
    assert!(html.contains("2023-03-08 20:26:40"));
    assert!(html.contains("<td>01:01:01</td>"));
    assert!(html.contains("<td>01:00:00</td>"));
    assert!(html.contains("<td>25.000</td>"));
    assert!(!html.contains("Evening Jog"));
    // Rows follow the start timestamp, oldest first.
    let morning = html.find("Morning Ride").expect("morning row");
    let treadmill = html.find("Treadmill").expect("treadmill row");
    assert!(morning < treadmill);
    // The pathless activity keeps its row with empty artifact cells.
    assert!(html.contains("<td>5.000</td><td></td><td></td>"));

    assert!(report.path().join("Strava_Activity_db_1.html").exists());
    assert!(report.path().join("db_1.kml").exists());
    assert!(!report.path().join("db_2.kml").exists());
    assert!(html.contains(r#"<iframe id="db_1" src="Strava_Activity_db_1.html""#));
    assert!(html.contains(r#"<a href="db_1.kml""#));

    assert!(html.contains("<h2>Strava - Athletes (Strava.sqlite)</h2>"));
    assert!(html.contains("<td>Main user</td>"));
    assert!(html.contains("<td>Friend</td>"));
    assert!(html.contains("<td>M/Male</td>"));
    // An unpaired sex or gender column renders nothing.
    assert!(!html.contains("Female"));
    assert!(html.contains("<td>1990-05-01</td>"));
    assert!(html.contains("<td>Boulder, Colorado</td>"));
    assert!(html.contains("2020-01-06 10:40:00"));
    assert!(html.contains(r#"<img src="https://example.com/a.jpg""#));
    assert!(!html.contains("Ghost"));

    assert!(html.contains("<h2>Strava - Routes (Strava.sqlite)</h2>"));
    assert!(html.contains("To Work"));
    assert!(html.contains("<td>5.255</td>"));
    assert!(html.contains("<td>Hill Loop</td><td>12.000</td><td></td><td></td>"));
    assert!(report.path().join("route_1.kml").exists());
    assert!(!report.path().join("route_2.kml").exists());

    let tsv = fs::read_to_string(report.path().join("strava_activities_db.tsv")).expect("tsv");
    assert!(tsv.starts_with("Activity Name\tActivity Type\t"));
    assert!(tsv.contains("Morning Ride\tRide"));
    assert!(report.path().join("strava_athletes.tsv").exists());
    assert!(report.path().join("strava_routes.tsv").exists());
}

#[test]
fn displayed_times_follow_the_configured_offset() {
    let input = tempfile::tempdir().expect("input dir");
    let report = tempfile::tempdir().expect("report dir");
    seeded_database(input.path());

    extract::run(&config(input.path(), report.path(), 2 * 3600)).expect("run");

    let html = fs::read_to_string(report.path().join("Strava_Report.html")).expect("report");
    assert!(html.contains("2023-03-08 22:26:40"));
    // Dates of birth are calendar dates and ignore the offset.
    assert!(html.contains("<td>1990-05-01</td>"));
}

#[test]
fn out_of_range_timestamp_renders_an_empty_cell() {
    let input = tempfile::tempdir().expect("input dir");
    let report = tempfile::tempdir().expect("report dir");
    let conn = Connection::open(input.path().join("Strava.sqlite")).expect("create db");
    schema(&conn);
    conn.execute(
        "INSERT INTO ZACTIVITY VALUES
         (1, 'Time Travel', 'Ride', NULL, 0, 1e300, 60.0, 60.0, 1000.0, NULL, 1)",
        [],
    )
    .expect("activity");
    drop(conn);

    let summary = extract::run(&config(input.path(), report.path(), 0)).expect("run");
    assert_eq!(summary.db_activities, 1);

    let html = fs::read_to_string(report.path().join("Strava_Report.html")).expect("report");
    assert!(html.contains("Time Travel"));
    // The start cell sits between the indoor flag and the elapsed time.
    assert!(html.contains("<td>No</td><td></td><td>00:01:00</td>"));
}

#[test]
fn empty_input_writes_no_report() {
    let input = tempfile::tempdir().expect("input dir");
    let report = tempfile::tempdir().expect("report dir");

    let summary = extract::run(&config(input.path(), report.path(), 0)).expect("run");
    assert_eq!(summary.db_activities, 0);
    assert_eq!(summary.fit_activities, 0);
    assert!(!report.path().join("Strava_Report.html").exists());
}

#[test]
fn database_without_rows_writes_no_report() {
    let input = tempfile::tempdir().expect("input dir");
    let report = tempfile::tempdir().expect("report dir");
    let conn = Connection::open(input.path().join("Strava.sqlite")).expect("create db");
    schema(&conn);
    drop(conn);

    let summary = extract::run(&config(input.path(), report.path(), 0)).expect("run");
    assert_eq!(summary.db_activities, 0);
    assert_eq!(summary.athletes, 0);
    assert_eq!(summary.routes, 0);
    assert!(!report.path().join("Strava_Report.html").exists());
}
