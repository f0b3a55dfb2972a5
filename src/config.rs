use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{GlobeError, Result};
use crate::map::{RotationParams, StyleKind, DEFAULT_HIT_RADIUS, DEFAULT_VISIBILITY_THRESHOLD};

#[derive(Parser, Debug, Default)]
#[command(name = "globe-tour")]
#[command(about = "Rotating destination globe for the terminal")]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GeoJSON file of Point features to show instead of the built-in list
    #[arg(short, long)]
    pub destinations: Option<PathBuf>,

    /// GeoJSON coastline/border file for the outline overlay
    #[arg(short, long)]
    pub outlines: Option<PathBuf>,

    /// Globe look
    #[arg(short, long, value_enum)]
    pub style: Option<StyleKind>,

    /// Start with idle rotation paused
    #[arg(long)]
    pub no_auto_rotate: bool,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "globe_tour=debug"; falls back to RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,
}

/// On-disk config. Every key is optional; missing keys keep defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    globe: GlobeSection,
    rotation: RotationSection,
    display: DisplaySection,
    data: DataSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GlobeSection {
    visibility_threshold: Option<f64>,
    hit_radius: Option<f64>,
    zoom: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RotationSection {
    auto_rotate: Option<bool>,
    auto_speed: Option<f64>,
    sensitivity: Option<f64>,
    clamp_tilt: Option<bool>,
    tilt_limit_deg: Option<f64>,
    damping: Option<f64>,
    friction: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DisplaySection {
    style: Option<StyleKind>,
    fps: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DataSection {
    destinations: Option<PathBuf>,
    outlines: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Back-face slack as a fraction of the radius
    pub visibility_threshold: f64,
    /// Hover distance in canvas dots
    pub hit_radius: f64,
    pub zoom: f64,
    pub rotation: RotationParams,
    pub auto_rotate: bool,
    pub style: StyleKind,
    pub fps: u32,
    pub destinations: Option<PathBuf>,
    pub outlines: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            hit_radius: DEFAULT_HIT_RADIUS,
            zoom: 1.0,
            rotation: RotationParams::default(),
            auto_rotate: true,
            style: StyleKind::default(),
            fps: 60,
            destinations: None,
            outlines: None,
        }
    }
}

impl Settings {
    /// Defaults, then the config file (if any), then CLI flags.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(path) = &cli.destinations {
            settings.destinations = Some(path.clone());
        }
        if let Some(path) = &cli.outlines {
            settings.outlines = Some(path.clone());
        }
        if let Some(style) = cli.style {
            settings.style = style;
        }
        if cli.no_auto_rotate {
            settings.auto_rotate = false;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| GlobeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml_str(&content)?;

        // Data paths are relative to the config file
        let base = path.parent().unwrap_or(Path::new("."));
        for p in [&mut settings.destinations, &mut settings.outlines].into_iter().flatten() {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)?;
        let mut settings = Self::default();
        settings.apply(file);
        settings.validate()?;
        Ok(settings)
    }

    fn apply(&mut self, file: FileConfig) {
        let FileConfig { globe, rotation, display, data } = file;

        if let Some(v) = globe.visibility_threshold {
            self.visibility_threshold = v;
        }
        if let Some(v) = globe.hit_radius {
            self.hit_radius = v;
        }
        if let Some(v) = globe.zoom {
            self.zoom = v;
        }

        let params = &mut self.rotation;
        if let Some(v) = rotation.auto_speed {
            params.auto_speed = v;
        }
        if let Some(v) = rotation.sensitivity {
            params.sensitivity = v;
        }
        if let Some(v) = rotation.damping {
            params.damping = v;
        }
        if let Some(v) = rotation.friction {
            params.friction = v;
        }
        if let Some(deg) = rotation.tilt_limit_deg {
            params.tilt_limit = Some(deg.to_radians());
        }
        if rotation.clamp_tilt == Some(false) {
            params.tilt_limit = None;
        }
        if let Some(v) = rotation.auto_rotate {
            self.auto_rotate = v;
        }

        if let Some(v) = display.style {
            self.style = v;
        }
        if let Some(v) = display.fps {
            self.fps = v;
        }

        self.destinations = data.destinations;
        self.outlines = data.outlines;
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(GlobeError::InvalidConfig(msg)) };

        if !(self.visibility_threshold.is_finite() && self.visibility_threshold >= 0.0) {
            return invalid(format!("visibility_threshold must be >= 0, got {}", self.visibility_threshold));
        }
        if !(self.hit_radius.is_finite() && self.hit_radius > 0.0) {
            return invalid(format!("hit_radius must be > 0, got {}", self.hit_radius));
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return invalid(format!("zoom must be > 0, got {}", self.zoom));
        }
        let r = &self.rotation;
        if !(r.damping > 0.0 && r.damping <= 1.0) {
            return invalid(format!("damping must be in (0, 1], got {}", r.damping));
        }
        if !(r.friction >= 0.0 && r.friction < 1.0) {
            return invalid(format!("friction must be in [0, 1), got {}", r.friction));
        }
        if !r.auto_speed.is_finite() || !r.sensitivity.is_finite() {
            return invalid("auto_speed and sensitivity must be finite".to_string());
        }
        if let Some(limit) = r.tilt_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return invalid(format!("tilt_limit_deg must be > 0, got {}", limit.to_degrees()));
            }
        }
        if self.fps == 0 || self.fps > 240 {
            return invalid(format!("fps must be in 1..=240, got {}", self.fps));
        }
        Ok(())
    }
}
