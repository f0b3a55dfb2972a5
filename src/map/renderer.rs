use rayon::prelude::*;

use crate::braille::BrailleCanvas;
use crate::geo::GeoPoint;
use crate::map::geometry::{draw_disc, draw_line, draw_ring};
use crate::map::globe::{walk_great_circle, ProjectedPoint, SphereProjector};
use crate::map::rotation::RotationState;
use crate::map::style::{GlobeStyle, LabelMode};

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Spacing in degrees between interpolated outline vertices.
const DENSIFY_STEP_DEG: f64 = 2.0;

/// Grid spacing in degrees.
const GRATICULE_SPACING_DEG: f64 = 30.0;

/// Longest label we place next to a marker.
const MAX_LABEL_CHARS: usize = 24;

/// Everything the renderer reads for one frame.
pub struct Scene<'a> {
    pub projector: &'a SphereProjector,
    pub rotation: RotationState,
    pub points: &'a [GeoPoint],
    /// Same order and length as `points`
    pub projected: &'a [ProjectedPoint],
    pub hovered: Option<usize>,
    pub selected: Option<usize>,
}

/// Text placed over the globe, in character cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: String,
    /// Hovered or selected
    pub focused: bool,
}

/// Per-layer canvases so the UI can color each one.
pub struct GlobeLayers {
    pub silhouette: BrailleCanvas,
    pub graticule: BrailleCanvas,
    pub outlines: BrailleCanvas,
    pub markers: BrailleCanvas,
    pub focus: BrailleCanvas,
    pub labels: Vec<Label>,
}

impl GlobeLayers {
    fn new(width: usize, height: usize) -> Self {
        Self {
            silhouette: BrailleCanvas::new(width, height),
            graticule: BrailleCanvas::new(width, height),
            outlines: BrailleCanvas::new(width, height),
            markers: BrailleCanvas::new(width, height),
            focus: BrailleCanvas::new(width, height),
            labels: Vec::new(),
        }
    }
}

/// Draws a globe frame. Holds the static line data (continent outlines and
/// the lat/lon grid), pre-densified along great circles so straight
/// segments between projected vertices follow the sphere.
pub struct GlobeRenderer {
    outlines: Vec<LineString>,
    graticule: Vec<LineString>,
}

impl GlobeRenderer {
    pub fn new(outlines: Vec<LineString>) -> Self {
        Self {
            outlines: outlines.iter().map(|line| densify(line)).collect(),
            graticule: build_graticule(GRATICULE_SPACING_DEG),
        }
    }

    /// Render one frame onto fresh canvases of `width` x `height` characters.
    pub fn render(&self, scene: &Scene, style: &GlobeStyle, width: usize, height: usize) -> GlobeLayers {
        let mut layers = GlobeLayers::new(width, height);
        if width == 0 || height == 0 {
            return layers;
        }

        if style.show_silhouette {
            let c = scene.projector.center;
            draw_ring(
                &mut layers.silhouette,
                c.x.round() as i32,
                c.y.round() as i32,
                scene.projector.radius.round() as i32,
            );
        }

        if style.show_graticule {
            draw_lines(&mut layers.graticule, &self.graticule, scene);
        }

        if style.show_outlines {
            draw_lines(&mut layers.outlines, &self.outlines, scene);
        }

        self.draw_markers(&mut layers, scene, style);
        layers.labels = place_labels(scene, style, width, height);
        layers
    }

    fn draw_markers(&self, layers: &mut GlobeLayers, scene: &Scene, style: &GlobeStyle) {
        for (idx, p) in scene.projected.iter().enumerate() {
            if !p.visible {
                continue;
            }
            let (px, py) = p.pixel();
            let focused = is_focused(scene, idx);
            let base = if focused { style.focus_marker_radius } else { style.marker_radius };
            // Past the limb but inside the visibility slack: shrink
            let radius = if p.depth < 0.0 { base - 1 } else { base };
            draw_disc(&mut layers.markers, px, py, radius.max(0));

            if focused {
                draw_ring(&mut layers.focus, px, py, style.focus_radius);
            }
        }
    }
}

fn is_focused(scene: &Scene, idx: usize) -> bool {
    scene.hovered == Some(idx) || scene.selected == Some(idx)
}

/// Project lines in parallel, then rasterize the front-facing segments.
fn draw_lines(canvas: &mut BrailleCanvas, lines: &[LineString], scene: &Scene) {
    let projected: Vec<Vec<ProjectedPoint>> = lines
        .par_iter()
        .map(|line| {
            line.iter()
                .map(|&(lon, lat)| scene.projector.project_lonlat(lon, lat, &scene.rotation))
                .collect()
        })
        .collect();

    for line in &projected {
        for pair in line.windows(2) {
            // Lines use strict culling; slack is for markers only
            if pair[0].depth < 0.0 || pair[1].depth < 0.0 {
                continue;
            }
            let (x0, y0) = pair[0].pixel();
            let (x1, y1) = pair[1].pixel();
            draw_line(canvas, x0, y0, x1, y1);
        }
    }
}

/// Label positions in character cells, right of each marker.
fn place_labels(scene: &Scene, style: &GlobeStyle, width: usize, height: usize) -> Vec<Label> {
    let mut labels = Vec::new();

    for (idx, (point, p)) in scene.points.iter().zip(scene.projected).enumerate() {
        if !p.visible {
            continue;
        }
        let focused = is_focused(scene, idx);
        let wanted = match style.labels {
            LabelMode::Focused => focused,
            LabelMode::All => true,
        };
        if !wanted {
            continue;
        }

        let (px, py) = p.pixel();
        if px < 0 || py < 0 {
            continue;
        }
        let col = (px / 2) as usize + 2;
        let row = (py / 4) as usize;
        if col >= width || row >= height {
            continue;
        }

        let room = (width - col).min(MAX_LABEL_CHARS);
        let text: String = point.label.chars().take(room).collect();
        labels.push(Label { col: col as u16, row: row as u16, text, focused });
    }

    // Focused labels last so they draw over overlapping neighbours
    labels.sort_by_key(|l| l.focused);
    labels
}

/// Insert great-circle vertices between consecutive points.
fn densify(line: &[(f64, f64)]) -> LineString {
    let Some(&first) = line.first() else {
        return Vec::new();
    };

    let mut out = vec![first];
    for pair in line.windows(2) {
        let ((lon0, lat0), (lon1, lat1)) = (pair[0], pair[1]);
        walk_great_circle(lon0, lat0, lon1, lat1, DENSIFY_STEP_DEG, |lon, lat| out.push((lon, lat)));
    }
    out
}

/// Meridians and parallels every `spacing` degrees, sampled densely enough
/// to draw as short straight segments.
fn build_graticule(spacing: f64) -> Vec<LineString> {
    let mut lines = Vec::new();
    let steps = (180.0 / DENSIFY_STEP_DEG) as usize;

    let mut lon = -180.0;
    while lon < 180.0 {
        lines.push((0..=steps).map(|i| (lon, -90.0 + i as f64 * DENSIFY_STEP_DEG)).collect());
        lon += spacing;
    }

    let mut lat = -90.0 + spacing;
    while lat < 90.0 {
        lines.push((0..=steps * 2).map(|i| (-180.0 + i as f64 * DENSIFY_STEP_DEG, lat)).collect());
        lat += spacing;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::style::StyleKind;
    use glam::DVec2;

    fn projector() -> SphereProjector {
        // 40x20 characters = 80x80 dots
        SphereProjector::new(DVec2::new(40.0, 40.0), 30.0, 0.3)
    }

    fn points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0, "Front").unwrap(),
            GeoPoint::new(0.0, 180.0, "Back").unwrap(),
            GeoPoint::new(0.0, 60.0, "Side").unwrap(),
            // 10° past the limb, inside the visibility slack
            GeoPoint::new(0.0, -100.0, "Limb").unwrap(),
        ]
    }

    fn render(style: StyleKind, hovered: Option<usize>) -> GlobeLayers {
        let projector = projector();
        let points = points();
        let rotation = RotationState::facing(0.0, 0.0);
        let projected = projector.project_all(&points, &rotation);
        let scene = Scene {
            projector: &projector,
            rotation,
            points: &points,
            projected: &projected,
            hovered,
            selected: None,
        };
        let outlines = vec![vec![(-20.0, -20.0), (20.0, 20.0)], vec![(160.0, 0.0), (170.0, 10.0)]];
        GlobeRenderer::new(outlines).render(&scene, &GlobeStyle::preset(style), 40, 20)
    }

    #[test]
    fn test_front_marker_drawn_back_marker_skipped() {
        let layers = render(StyleKind::Dots, None);
        // Facing (0, 0): the front marker sits at the disk center
        assert!(layers.markers.is_set(40, 40));
        // Side marker at x = 40 - 30·cos(30°) ≈ 14
        assert!(layers.markers.is_set(14, 40));
        assert!(!layers.markers.is_set(10, 40));
        // Limb marker shrinks to a single dot at x ≈ 69.5
        assert!(layers.markers.is_set(70, 40));
        assert!(!layers.markers.is_set(71, 40));
    }

    #[test]
    fn test_dots_style_has_no_outlines() {
        let layers = render(StyleKind::Dots, None);
        assert_eq!(layers.outlines.glyphs().count(), 0);
        assert_eq!(layers.graticule.glyphs().count(), 0);
        assert!(layers.silhouette.is_set(70, 40));
    }

    #[test]
    fn test_continents_draw_front_outline_only() {
        let layers = render(StyleKind::Continents, None);
        // Front diagonal passes through the center
        assert!(layers.outlines.is_set(40, 40));
        assert!(layers.graticule.glyphs().count() > 0);
    }

    #[test]
    fn test_focused_label_only_for_hover() {
        let layers = render(StyleKind::Dots, None);
        assert!(layers.labels.is_empty());

        let layers = render(StyleKind::Dots, Some(0));
        assert_eq!(layers.labels.len(), 1);
        assert_eq!(layers.labels[0].text, "Front");
        assert_eq!((layers.labels[0].col, layers.labels[0].row), (22, 10));
        assert!(layers.focus.glyphs().count() > 0);
    }

    #[test]
    fn test_tooltip_labels_every_visible_marker() {
        let layers = render(StyleKind::Tooltip, None);
        let names: Vec<_> = layers.labels.iter().map(|l| l.text.as_str()).collect();
        // Limb is past the edge but inside the slack; Back is culled
        assert_eq!(names, vec!["Front", "Side", "Limb"]);
    }

    #[test]
    fn test_tooltip_enlarges_hovered_marker() {
        let plain = render(StyleKind::Tooltip, None);
        assert!(!plain.markers.is_set(42, 40));

        let hovered = render(StyleKind::Tooltip, Some(0));
        assert!(hovered.markers.is_set(42, 40));
        assert!(hovered.markers.is_set(40, 38));

        // Dots keeps the hovered marker at its normal size
        let dots = render(StyleKind::Dots, Some(0));
        assert!(!dots.markers.is_set(42, 40));
    }

    #[test]
    fn test_zero_size_canvas() {
        let projector = projector();
        let scene = Scene {
            projector: &projector,
            rotation: RotationState::default(),
            points: &[],
            projected: &[],
            hovered: None,
            selected: None,
        };
        let layers = GlobeRenderer::new(Vec::new()).render(&scene, &GlobeStyle::default(), 0, 0);
        assert!(layers.labels.is_empty());
    }

    #[test]
    fn test_densify_keeps_endpoints() {
        let line = densify(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(line.first(), Some(&(0.0, 0.0)));
        assert_eq!(line.last(), Some(&(10.0, 0.0)));
        assert!(line.len() >= 6);
        assert!(densify(&[]).is_empty());
    }

    #[test]
    fn test_graticule_shape() {
        let grid = build_graticule(30.0);
        // 12 meridians, 5 parallels
        assert_eq!(grid.len(), 17);
    }
}
