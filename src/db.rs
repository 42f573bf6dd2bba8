use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags};

use crate::error::DbError;

/// Core Data timestamps count seconds from 2001-01-01T00:00:00Z.
pub const CORE_DATA_EPOCH_UNIX: i64 = 978_307_200;

pub fn core_data_time(seconds: f64) -> Option<DateTime<Utc>> {
    // The cast saturates, so a wild column value lands on i64::MAX and the
    // checked add turns it into a blank cell instead of a panic.
    CORE_DATA_EPOCH_UNIX
        .checked_add(seconds as i64)
        .and_then(|unix| DateTime::from_timestamp(unix, 0))
}

pub fn open_readonly(path: &Path) -> Result<Connection, DbError> {
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(DbError::Open)
}

// The queries select raw column values; formatting (epoch conversion,
// H:MM:SS, Yes/No flags, concatenations) happens in Rust at row-assembly
// time.

const ACTIVITY_QUERY: &str = "\
SELECT
    ZACTIVITY.ZNAME,
    ZACTIVITY.ZSPORTTYPE,
    ZACTIVITY.ZUSERDESCRIPTION,
    ZACTIVITY.ZTRAINER,
    ZACTIVITY.ZSTARTTIMESTAMP,
    ZACTIVITY.ZELAPSEDTIME,
    ZACTIVITY.ZMOVINGTIME,
    ZACTIVITY.ZDISTANCE,
    ZMAP.ZPOLYLINE
FROM ZACTIVITY
LEFT JOIN ZMAP ON ZACTIVITY.ZMAP = ZMAP.Z_PK
WHERE ZACTIVITY.ZATHLETE = 1
ORDER BY ZACTIVITY.ZSTARTTIMESTAMP ASC";

const ATHLETE_QUERY: &str = "\
SELECT
    ZATHLETE.Z_PK,
    ZATHLETE.ZFIRSTNAME,
    ZATHLETE.ZLASTNAME,
    ZATHLETE.ZSEX,
    ZATHLETE.ZGENDER,
    ZATHLETE.ZDATEOFBIRTH,
    ZATHLETE.ZLOCATIONCITY,
    ZATHLETE.ZLOCATIONSTATE,
    ZATHLETE.ZEMAIL,
    ZATHLETE.ZUSERNAME,
    ZATHLETE.ZCREATEDAT,
    ZATHLETE.ZBIO,
    ZATHLETE.ZIMAGELINKLARGE,
    ZATHLETE.ZINSTAGRAMUSERNAME,
    ZATHLETE.ZPREMIUM
FROM ZATHLETE
INNER JOIN ZATHLETEPROFILE ON ZATHLETE.ZREMOTEID = ZATHLETEPROFILE.ZREMOTEID
ORDER BY ZATHLETE.Z_PK ASC";

const ROUTE_QUERY: &str = "\
SELECT
    ZROUTE.ZNAME,
    ZROUTE.ZDISTANCE,
    ZMAP.ZPOLYLINE
FROM ZROUTE
LEFT JOIN ZMAP ON ZMAP.Z_PK = ZROUTE.ZMAP
WHERE ZROUTE.ZNAME IS NOT NULL
ORDER BY ZROUTE.Z_PK ASC";

#[derive(Debug, Clone)]
pub struct DbActivity {
    pub name: Option<String>,
    pub sport_type: Option<String>,
    pub description: Option<String>,
    pub trainer: Option<bool>,
    pub start_seconds: Option<f64>,
    pub elapsed_seconds: Option<f64>,
    pub moving_seconds: Option<f64>,
    pub distance_m: Option<f64>,
    pub polyline: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DbAthlete {
    pub pk: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth_seconds: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub created_seconds: Option<f64>,
    pub bio: Option<String>,
    pub image_link: Option<String>,
    pub instagram_username: Option<String>,
    pub premium: Option<bool>,
}

impl DbAthlete {
    // Primary key 1 is the device owner.
    pub fn user_status(&self) -> &'static str {
        if self.pk == 1 {
            "Main user"
        } else {
            "Friend"
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbRoute {
    pub name: String,
    pub distance_m: Option<f64>,
    pub polyline: Option<String>,
}

pub fn fetch_activities(conn: &Connection) -> Result<Vec<DbActivity>, DbError> {
    let mut stmt = conn.prepare(ACTIVITY_QUERY)?;
    let rows = stmt.query_map([], |row| {
        Ok(DbActivity {
            name: row.get(0)?,
            sport_type: row.get(1)?,
            description: row.get(2)?,
            trainer: row.get(3)?,
            start_seconds: row.get(4)?,
            elapsed_seconds: row.get(5)?,
            moving_seconds: row.get(6)?,
            distance_m: row.get(7)?,
            polyline: row.get(8)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn fetch_athletes(conn: &Connection) -> Result<Vec<DbAthlete>, DbError> {
    let mut stmt = conn.prepare(ATHLETE_QUERY)?;
    let rows = stmt.query_map([], |row| {
        Ok(DbAthlete {
            pk: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            sex: row.get(3)?,
            gender: row.get(4)?,
            date_of_birth_seconds: row.get(5)?,
            city: row.get(6)?,
            state: row.get(7)?,
            email: row.get(8)?,
            username: row.get(9)?,
            created_seconds: row.get(10)?,
            bio: row.get(11)?,
            image_link: row.get(12)?,
            instagram_username: row.get(13)?,
            premium: row.get(14)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn fetch_routes(conn: &Connection) -> Result<Vec<DbRoute>, DbError> {
    let mut stmt = conn.prepare(ROUTE_QUERY)?;
    let rows = stmt.query_map([], |row| {
        Ok(DbRoute {
            name: row.get(0)?,
            distance_m: row.get(1)?,
            polyline: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
