use chrono::{DateTime, Utc};

// Global message numbers and field numbers from the FIT profile, limited to
// what activity reconstruction reads.
pub const MSG_SESSION: u16 = 18;
pub const MSG_RECORD: u16 = 20;

pub const FIELD_TIMESTAMP: u8 = 253;
pub const RECORD_POSITION_LAT: u8 = 0;
pub const RECORD_POSITION_LONG: u8 = 1;
pub const SESSION_START_TIME: u8 = 2;
pub const SESSION_SPORT: u8 = 5;
pub const SESSION_TOTAL_ELAPSED_TIME: u8 = 7;
pub const SESSION_TOTAL_DISTANCE: u8 = 9;

// FIT timestamps count seconds from 1989-12-31T00:00:00Z.
pub const FIT_EPOCH_UNIX_OFFSET: i64 = 631_065_600;

pub fn fit_time(raw: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::from(raw) + FIT_EPOCH_UNIX_OFFSET, 0)
}

// None for the base type's invalid sentinel, non-integer base types, and
// sizes that do not match the scalar width (array fields).
pub fn integer_value(base_type: u8, bytes: &[u8], big_endian: bool) -> Option<i64> {
    match base_type {
        // enum, uint8
        0x00 | 0x02 => single(bytes).filter(|&v| v != 0xff).map(i64::from),
        // sint8
        0x01 => single(bytes)
            .filter(|&v| v != 0x7f)
            .map(|v| i64::from(v as i8)),
        // uint8z
        0x0a => single(bytes).filter(|&v| v != 0x00).map(i64::from),
        // sint16
        0x83 => wide16(bytes, big_endian)
            .filter(|&v| v != 0x7fff)
            .map(|v| i64::from(v as i16)),
        // uint16
        0x84 => wide16(bytes, big_endian)
            .filter(|&v| v != 0xffff)
            .map(i64::from),
        // uint16z
        0x8b => wide16(bytes, big_endian)
            .filter(|&v| v != 0x0000)
            .map(i64::from),
        // sint32
        0x85 => wide32(bytes, big_endian)
            .filter(|&v| v != 0x7fff_ffff)
            .map(|v| i64::from(v as i32)),
        // uint32
        0x86 => wide32(bytes, big_endian)
            .filter(|&v| v != 0xffff_ffff)
            .map(i64::from),
        // uint32z
        0x8c => wide32(bytes, big_endian)
            .filter(|&v| v != 0x0000_0000)
            .map(i64::from),
        _ => None,
    }
}

fn single(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [value] => Some(*value),
        _ => None,
    }
}

fn wide16(bytes: &[u8], big_endian: bool) -> Option<u16> {
    let arr: [u8; 2] = bytes.try_into().ok()?;
    Some(if big_endian {
        u16::from_be_bytes(arr)
    } else {
        u16::from_le_bytes(arr)
    })
}

fn wide32(bytes: &[u8], big_endian: bool) -> Option<u32> {
    let arr: [u8; 4] = bytes.try_into().ok()?;
    Some(if big_endian {
        u32::from_be_bytes(arr)
    } else {
        u32::from_le_bytes(arr)
    })
}

pub fn sport_name(value: u8) -> String {
    let name = match value {
        0 => "generic",
        1 => "running",
        2 => "cycling",
        3 => "transition",
        4 => "fitness_equipment",
        5 => "swimming",
        6 => "basketball",
        7 => "soccer",
        8 => "tennis",
        9 => "american_football",
        10 => "training",
        11 => "walking",
        12 => "cross_country_skiing",
        13 => "alpine_skiing",
        14 => "snowboarding",
        15 => "rowing",
        16 => "mountaineering",
        17 => "hiking",
        18 => "multisport",
        19 => "paddling",
        20 => "flying",
        21 => "e_biking",
        22 => "motorcycling",
        23 => "boating",
        24 => "driving",
        25 => "golf",
        26 => "hang_gliding",
        27 => "horseback_riding",
        28 => "hunting",
        29 => "fishing",
        30 => "inline_skating",
        31 => "rock_climbing",
        32 => "sailing",
        33 => "ice_skating",
        34 => "sky_diving",
        35 => "snowshoeing",
        36 => "snowmobiling",
        37 => "stand_up_paddleboarding",
        38 => "surfing",
        39 => "wakeboarding",
        40 => "water_skiing",
        41 => "kayaking",
        42 => "rafting",
        43 => "windsurfing",
        44 => "kitesurfing",
        45 => "tactical",
        46 => "jumpmaster",
        47 => "boxing",
        48 => "floor_climbing",
        254 => "all",
        other => return format!("sport_{}", other),
    };
    name.to_string()
}
