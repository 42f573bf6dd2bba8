use crate::error::DecodeError;
use crate::types::geo::GeoPoint;

// Printable floor of the encoding alphabet ('?'). Every encoded byte is
// value + 63, with 0x20 marking a continuation chunk.
const CHAR_FLOOR: u8 = 63;
const CONTINUATION_BIT: u64 = 0x20;

/// Decodes a delta-encoded polyline string into coordinate pairs.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<GeoPoint>, DecodeError> {
    let scale = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut pos = 0usize;
    let mut lat = 0i64;
    let mut lon = 0i64;

    while pos < bytes.len() {
        let (delta_lat, next) = decode_value(bytes, pos)?;
        let (delta_lon, next) = decode_value(bytes, next)?;
        // A single value can reach i64::MIN, so the running sums can
        // overflow even though each delta decoded cleanly.
        lat = lat
            .checked_add(delta_lat)
            .ok_or(DecodeError::ValueOverflow(pos))?;
        lon = lon
            .checked_add(delta_lon)
            .ok_or(DecodeError::ValueOverflow(pos))?;
        pos = next;
        points.push(GeoPoint {
            lat: lat as f64 / scale,
            lon: lon as f64 / scale,
        });
    }

    Ok(points)
}

fn decode_value(bytes: &[u8], mut pos: usize) -> Result<(i64, usize), DecodeError> {
    let mut accumulated = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(pos) else {
            return Err(DecodeError::UnexpectedEof(pos));
        };
        if byte < CHAR_FLOOR {
            return Err(DecodeError::InvalidCharacter(byte, pos));
        }
        if shift > 63 {
            return Err(DecodeError::ValueOverflow(pos));
        }
        let chunk = u64::from(byte - CHAR_FLOOR);
        accumulated |= (chunk & 0x1f) << shift;
        pos += 1;
        shift += 5;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    let half = (accumulated >> 1) as i64;
    let value = if accumulated & 1 != 0 { !half } else { half };
    Ok((value, pos))
}
