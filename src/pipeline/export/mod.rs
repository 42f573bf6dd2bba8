mod kml;
mod map;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::types::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    FitFile,
    DbActivity,
    DbRoute,
}

impl SourceKind {
    fn prefix(self) -> &'static str {
        match self {
            SourceKind::FitFile => "fit",
            SourceKind::DbActivity => "db",
            SourceKind::DbRoute => "route",
        }
    }
}

/// Deterministic base name for one entity's exported artifacts (`fit_3`,
/// `route_1`).
#[derive(Debug, Clone, Copy)]
pub struct ArtifactLabel {
    pub kind: SourceKind,
    pub index: usize,
}

impl ArtifactLabel {
    pub fn new(kind: SourceKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for ArtifactLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.prefix(), self.index)
    }
}

#[derive(Debug, Clone)]
pub struct GeoArtifacts {
    pub map_file: PathBuf,
    pub kml_file: PathBuf,
}

/// Writes the interactive map and the KML document for one track.
pub fn export(
    points: &[GeoPoint],
    label: ArtifactLabel,
    dir: &Path,
) -> Result<GeoArtifacts, ExportError> {
    if points.is_empty() {
        return Err(ExportError::EmptyTrack);
    }

    let map_file = dir.join(format!("Strava_Activity_{}.html", label));
    fs::write(&map_file, map::map_document(points))
        .map_err(|err| ExportError::Write(map_file.clone(), err))?;

    let kml_file = dir.join(format!("{}.kml", label));
    let kml = kml::kml_document(points)?;
    fs::write(&kml_file, kml).map_err(|err| ExportError::Write(kml_file.clone(), err))?;

    Ok(GeoArtifacts { map_file, kml_file })
}
