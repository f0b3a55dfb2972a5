//! Rotating destination globe: orthographic sphere projection, smoothed
//! drag/idle rotation and marker hit-testing, rendered to a Braille canvas.

pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod map;

pub use error::{GlobeError, Result};
pub use geo::GeoPoint;
