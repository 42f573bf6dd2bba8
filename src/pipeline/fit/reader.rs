use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::FitError;
use crate::pipeline::fit::{profile, FitMessage, PositionRecord, SessionSummary};

const FILE_HEADER_LEN: usize = 12;
const FIT_MAGIC: &[u8; 4] = b".FIT";

#[derive(Debug, thiserror::Error)]
enum FrameError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    #[error("data message references undefined local type {0}")]
    UndefinedLocalType(u8),
    #[error("frame extends past the declared data size")]
    Truncated,
}

struct FieldDef {
    number: u8,
    size: usize,
    base_type: u8,
}

struct Definition {
    global: u16,
    big_endian: bool,
    fields: Vec<FieldDef>,
    // Total data message length, developer fields included.
    data_len: usize,
}

/// Lazy, single-pass reader over the data messages of a FIT file.
pub struct FitReader<R> {
    input: R,
    definitions: HashMap<u8, Definition>,
    remaining: usize,
    last_timestamp: Option<u32>,
    finished: bool,
}

impl FitReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, FitError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> FitReader<R> {
    pub fn new(input: R) -> Result<Self, FitError> {
        let mut reader = Self {
            input,
            definitions: HashMap::new(),
            remaining: 0,
            last_timestamp: None,
            finished: false,
        };
        reader.read_file_header(None)?;
        Ok(reader)
    }

    fn read_file_header(&mut self, first: Option<u8>) -> Result<(), FitError> {
        let mut fixed = [0u8; FILE_HEADER_LEN];
        match first {
            Some(byte) => {
                fixed[0] = byte;
                self.input.read_exact(&mut fixed[1..])?;
            }
            None => self.input.read_exact(&mut fixed)?,
        }

        let header_len = fixed[0] as usize;
        if header_len < FILE_HEADER_LEN {
            return Err(FitError::InvalidHeader(format!(
                "header length {}",
                header_len
            )));
        }
        if &fixed[8..12] != FIT_MAGIC {
            return Err(FitError::InvalidHeader("missing .FIT magic".to_string()));
        }

        // Extended header bytes (normally the header CRC) are not validated:
        // forensic inputs are frequently carved or truncated and a checksum
        // mismatch must not discard decodable records.
        let mut extra = vec![0u8; header_len - FILE_HEADER_LEN];
        self.input.read_exact(&mut extra)?;

        self.remaining = u32::from_le_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]) as usize;
        self.definitions.clear();
        self.last_timestamp = None;
        Ok(())
    }

    // Consumes the trailing CRC and probes for a chained file.
    fn advance_chained_file(&mut self) -> bool {
        let mut crc = [0u8; 2];
        if self.input.read_exact(&mut crc).is_err() {
            return false;
        }
        let mut probe = [0u8; 1];
        match self.input.read(&mut probe) {
            Ok(0) | Err(_) => false,
            Ok(_) => match self.read_file_header(Some(probe[0])) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!("Ignoring trailing bytes after FIT data: {}", err);
                    false
                }
            },
        }
    }

    fn take(&mut self, len: usize) -> Result<Vec<u8>, FrameError> {
        take_from(&mut self.input, &mut self.remaining, len)
    }

    fn take_byte(&mut self) -> Result<u8, FrameError> {
        if self.remaining == 0 {
            return Err(FrameError::Truncated);
        }
        let mut buf = [0u8; 1];
        self.input.read_exact(&mut buf)?;
        self.remaining -= 1;
        Ok(buf[0])
    }

    fn next_frame(&mut self) -> Result<Option<FitMessage>, FrameError> {
        let header = self.take_byte()?;
        if header & 0x80 != 0 {
            // Compressed timestamp header: bits 5-6 carry the local type,
            // bits 0-4 a rolling 32-second time offset.
            let local = (header >> 5) & 0x03;
            let offset = u32::from(header & 0x1f);
            return self.read_data_message(local, Some(offset));
        }
        if header & 0x40 != 0 {
            self.read_definition(header & 0x0f, header & 0x20 != 0)?;
            return Ok(None);
        }
        self.read_data_message(header & 0x0f, None)
    }

    fn read_definition(&mut self, local: u8, has_dev_fields: bool) -> Result<(), FrameError> {
        let _reserved = self.take_byte()?;
        let arch = self.take_byte()?;
        let global_bytes = [self.take_byte()?, self.take_byte()?];
        let field_count = self.take_byte()? as usize;

        let mut fields = Vec::with_capacity(field_count);
        let mut data_len = 0usize;
        for _ in 0..field_count {
            let number = self.take_byte()?;
            let size = self.take_byte()? as usize;
            let base_type = self.take_byte()?;
            data_len += size;
            fields.push(FieldDef {
                number,
                size,
                base_type,
            });
        }

        if has_dev_fields {
            let dev_count = self.take_byte()? as usize;
            for _ in 0..dev_count {
                let _number = self.take_byte()?;
                data_len += self.take_byte()? as usize;
                let _dev_data_index = self.take_byte()?;
            }
        }

        if arch > 1 {
            tracing::warn!(
                "Skipping definition for local type {} with unknown architecture {}",
                local,
                arch
            );
            self.definitions.remove(&local);
            return Ok(());
        }

        let big_endian = arch == 1;
        let global = if big_endian {
            u16::from_be_bytes(global_bytes)
        } else {
            u16::from_le_bytes(global_bytes)
        };
        self.definitions.insert(
            local,
            Definition {
                global,
                big_endian,
                fields,
                data_len,
            },
        );
        Ok(())
    }

    fn read_data_message(
        &mut self,
        local: u8,
        time_offset: Option<u32>,
    ) -> Result<Option<FitMessage>, FrameError> {
        let Some(def) = self.definitions.get(&local) else {
            return Err(FrameError::UndefinedLocalType(local));
        };
        let payload = take_from(&mut self.input, &mut self.remaining, def.data_len)?;
        let (message, timestamp) = decode_data(def, &payload, self.last_timestamp, time_offset);
        if timestamp.is_some() {
            self.last_timestamp = timestamp;
        }
        Ok(message)
    }
}

impl<R: Read> Iterator for FitReader<R> {
    type Item = FitMessage;

    fn next(&mut self) -> Option<FitMessage> {
        loop {
            if self.finished {
                return None;
            }
            if self.remaining == 0 {
                if !self.advance_chained_file() {
                    self.finished = true;
                    return None;
                }
                continue;
            }
            match self.next_frame() {
                Ok(Some(message)) => return Some(message),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!("FIT stream ended early: {}", err);
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}

fn take_from<R: Read>(
    input: &mut R,
    remaining: &mut usize,
    len: usize,
) -> Result<Vec<u8>, FrameError> {
    if len > *remaining {
        return Err(FrameError::Truncated);
    }
    let mut buf = vec![0u8; len];
    input.read_exact(&mut buf)?;
    *remaining -= len;
    Ok(buf)
}

fn decode_data(
    def: &Definition,
    payload: &[u8],
    last_timestamp: Option<u32>,
    time_offset: Option<u32>,
) -> (Option<FitMessage>, Option<u32>) {
    let mut offset = 0usize;
    let mut timestamp: Option<u32> = None;
    let mut raw_lat: Option<i32> = None;
    let mut raw_lon: Option<i32> = None;
    let mut start_time: Option<u32> = None;
    let mut sport: Option<u8> = None;
    let mut elapsed_ms: Option<u32> = None;
    let mut distance_cm: Option<u32> = None;

    for field in &def.fields {
        let bytes = &payload[offset..offset + field.size];
        offset += field.size;

        let Some(value) = profile::integer_value(field.base_type, bytes, def.big_endian) else {
            continue;
        };
        if field.number == profile::FIELD_TIMESTAMP {
            timestamp = u32::try_from(value).ok();
            continue;
        }
        match def.global {
            profile::MSG_RECORD => match field.number {
                profile::RECORD_POSITION_LAT => raw_lat = i32::try_from(value).ok(),
                profile::RECORD_POSITION_LONG => raw_lon = i32::try_from(value).ok(),
                _ => {}
            },
            profile::MSG_SESSION => match field.number {
                profile::SESSION_START_TIME => start_time = u32::try_from(value).ok(),
                profile::SESSION_SPORT => sport = u8::try_from(value).ok(),
                profile::SESSION_TOTAL_ELAPSED_TIME => elapsed_ms = u32::try_from(value).ok(),
                profile::SESSION_TOTAL_DISTANCE => distance_cm = u32::try_from(value).ok(),
                _ => {}
            },
            _ => {}
        }
    }

    // A compressed header supplies the timestamp when the field is absent.
    let resolved = timestamp.or_else(|| match (time_offset, last_timestamp) {
        (Some(bits), Some(last)) => Some(expand_compressed_timestamp(last, bits)),
        _ => None,
    });

    let message = match def.global {
        profile::MSG_RECORD => match (raw_lat, raw_lon, resolved.and_then(profile::fit_time)) {
            // A record missing either axis or a usable timestamp is not a
            // position fix and is dropped rather than emitted degenerate.
            (Some(raw_lat), Some(raw_lon), Some(time)) => {
                Some(FitMessage::Position(PositionRecord {
                    raw_lat,
                    raw_lon,
                    time,
                }))
            }
            _ => None,
        },
        profile::MSG_SESSION => Some(FitMessage::Session(SessionSummary {
            start_time: start_time.and_then(profile::fit_time),
            total_elapsed_seconds: elapsed_ms.map(|ms| ms / 1000),
            sport: sport.map(profile::sport_name),
            total_distance_m: distance_cm.map(|cm| f64::from(cm) / 100.0),
        })),
        _ => None,
    };

    (message, resolved)
}

// FIT timestamps are modular u32, so the rollover wraps at the top of the
// range instead of overflowing.
fn expand_compressed_timestamp(last: u32, offset_bits: u32) -> u32 {
    let rolled = (last & !0x1f) | offset_bits;
    if rolled < last {
        rolled.wrapping_add(0x20)
    } else {
        rolled
    }
}
