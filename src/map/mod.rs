mod geometry;
mod globe;
mod picking;
mod renderer;
mod rotation;
mod style;

pub use globe::{project, walk_great_circle, ProjectedPoint, SphereProjector, DEFAULT_VISIBILITY_THRESHOLD};
pub use picking::{hit_test, nearest_hit, DEFAULT_HIT_RADIUS};
pub use renderer::{GlobeLayers, GlobeRenderer, Label, LineString, Scene};
pub use rotation::{advance, approach, RotationInput, RotationParams, RotationState, SmoothRotation};
pub use style::{GlobeStyle, LabelMode, StyleKind};
