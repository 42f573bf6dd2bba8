use serde::Serialize;

/// Descriptor printed by `describe`, for frameworks that discover tools.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactDescriptor {
    pub name: &'static str,
    pub version: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    /// Glob patterns locating the artifacts in an iOS filesystem dump.
    pub paths: [&'static str; 2],
    pub report_sections: [&'static str; 4],
}

pub fn descriptor() -> ArtifactDescriptor {
    ArtifactDescriptor {
        name: "Strava Artifacts",
        version: env!("CARGO_PKG_VERSION"),
        category: "Health & Fitness",
        description: "Extracts Strava activities, athletes and routes from FIT \
                      recordings and the Strava.sqlite database",
        paths: [
            "*/var/mobile/Containers/Data/Application/*/Library/Application Support/Strava.sqlite*",
            "*/var/mobile/Containers/Data/Application/*/Documents/FIT/Recordings*",
        ],
        report_sections: [
            "Strava - Activities (FIT)",
            "Strava - Activities (Strava.sqlite)",
            "Strava - Athletes (Strava.sqlite)",
            "Strava - Routes (Strava.sqlite)",
        ],
    }
}
