use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid polyline character {0:#04x} at byte {1}")]
    InvalidCharacter(u8, usize),
    #[error("Polyline ended mid-value at byte {0}")]
    UnexpectedEof(usize),
    #[error("Polyline value too long at byte {0}")]
    ValueOverflow(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("Failed to read FIT data: {0}")]
    Io(#[from] io::Error),
    #[error("Not a FIT file: {0}")]
    InvalidHeader(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReconstructError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No coordinates to export")]
    EmptyTrack,
    #[error("Failed to write {}: {}", .0.display(), .1)]
    Write(PathBuf, #[source] io::Error),
    #[error("KML generation failed: {0}")]
    Kml(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to open database: {0}")]
    Open(#[source] rusqlite::Error),
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Reconstruct(#[from] ReconstructError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Report write failed: {0}")]
    Report(#[from] io::Error),
    #[error("TSV export failed: {0}")]
    Tsv(#[from] csv::Error),
}
