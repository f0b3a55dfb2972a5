use std::path::PathBuf;

/// Errors raised while loading destinations, outlines or configuration.
/// Projection, rotation and picking are total and never produce one.
#[derive(Debug, thiserror::Error)]
pub enum GlobeError {
    #[error("invalid coordinate for {label:?}: lat {latitude}, lon {longitude}")]
    InvalidCoordinate {
        label: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("malformed config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GlobeError>;
