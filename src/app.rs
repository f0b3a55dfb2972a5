use glam::DVec2;

use globe_tour::config::Settings;
use globe_tour::geo::{format_lat_lon, GeoPoint};
use globe_tour::map::{
    hit_test, nearest_hit, GlobeLayers, GlobeRenderer, GlobeStyle, LineString, ProjectedPoint,
    RotationState, Scene, SmoothRotation, SphereProjector,
};

/// Rows taken by the border (2) and the status lines (2).
const CHROME_ROWS: usize = 4;
/// Columns taken by the border.
const CHROME_COLS: usize = 2;

/// Keyboard nudge in canvas dots.
const NUDGE_DOTS: f64 = 12.0;

/// Where the globe faces on startup and after reset.
const HOME_LAT: f64 = 20.0;
const HOME_LON: f64 = 10.0;

/// Application state. Owns the rotation, the pointer and the per-frame
/// projection; the main loop is the only writer.
pub struct App {
    pub settings: Settings,
    pub projector: SphereProjector,
    pub rotation: SmoothRotation,
    pub style: GlobeStyle,
    pub renderer: GlobeRenderer,
    pub destinations: Vec<GeoPoint>,
    /// This frame's projection, index-aligned with `destinations`
    projected: Vec<ProjectedPoint>,
    pub hovered: Option<usize>,
    pub selected: Option<usize>,
    /// Current mouse position (terminal column/row)
    pub mouse_pos: Option<(u16, u16)>,
    /// Last mouse position while the left button is held
    last_mouse: Option<(u16, u16)>,
    /// Whether the held button has moved since it went down
    drag_moved: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        width: usize,
        height: usize,
        settings: Settings,
        destinations: Vec<GeoPoint>,
        outlines: Vec<LineString>,
    ) -> Self {
        let (pw, ph) = canvas_pixels(width, height);
        let projector = SphereProjector::fitted(pw, ph, settings.zoom, settings.visibility_threshold);
        let rotation = SmoothRotation::new(
            RotationState::facing(HOME_LAT, HOME_LON),
            settings.auto_rotate,
            &settings.rotation,
        );
        let style = GlobeStyle::preset(settings.style);

        let mut app = Self {
            settings,
            projector,
            rotation,
            style,
            renderer: GlobeRenderer::new(outlines),
            destinations,
            projected: Vec::new(),
            hovered: None,
            selected: None,
            mouse_pos: None,
            last_mouse: None,
            drag_moved: false,
            should_quit: false,
        };
        app.reproject();
        app
    }

    /// Update canvas size when the terminal resizes.
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pw, ph) = canvas_pixels(width, height);
        self.projector.fit(pw, ph);
        self.reproject();
    }

    /// Advance one frame of `dt` seconds: rotate, reproject, refresh hover.
    pub fn tick(&mut self, dt: f64) {
        self.rotation.tick(dt, &self.settings.rotation);
        self.reproject();
    }

    fn reproject(&mut self) {
        let rotation = self.rotation.current();
        self.projected = self.projector.project_all(&self.destinations, &rotation);
        self.hovered = self
            .mouse_pixel_pos()
            .and_then(|p| hit_test(p, &self.projected, self.settings.hit_radius));
    }

    pub fn projected(&self) -> &[ProjectedPoint] {
        &self.projected
    }

    /// Draw the globe for a canvas of `width` x `height` characters.
    pub fn render_layers(&self, width: usize, height: usize) -> GlobeLayers {
        let scene = Scene {
            projector: &self.projector,
            rotation: self.rotation.current(),
            points: &self.destinations,
            projected: &self.projected,
            hovered: self.hovered,
            selected: self.selected,
        };
        self.renderer.render(&scene, &self.style, width, height)
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        self.hovered = self
            .mouse_pixel_pos()
            .and_then(|p| hit_test(p, &self.projected, self.settings.hit_radius));
    }

    /// Mouse position in canvas dots, at the middle of the character cell.
    pub fn mouse_pixel_pos(&self) -> Option<DVec2> {
        self.mouse_pos.map(|(col, row)| cell_to_pixel(col, row))
    }

    pub fn begin_drag(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.drag_moved = false;
        self.rotation.begin_drag();
        log::debug!("drag start at {col},{row}");
    }

    /// Rotate by the mouse movement since the last event.
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            // Braille cells are 2 dots wide and 4 tall
            let dx = (col as f64 - last_col as f64) * 2.0;
            let dy = (row as f64 - last_row as f64) * 4.0;
            if dx != 0.0 || dy != 0.0 {
                self.drag_moved = true;
                // Zoomed in, the same drag should turn the globe less
                let zoom = self.projector.zoom();
                self.rotation.drag(dx / zoom, dy / zoom, &self.settings.rotation);
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Finish a drag. A press that never moved is a click and selects
    /// the nearest marker under the pointer (or clears the selection).
    pub fn end_drag(&mut self, col: u16, row: u16) {
        self.rotation.end_drag();
        self.last_mouse = None;
        if !self.drag_moved {
            let pointer = cell_to_pixel(col, row);
            self.selected = nearest_hit(pointer, &self.projected, self.settings.hit_radius);
            if let Some(idx) = self.selected {
                log::info!("Selected {}", self.destinations[idx].label);
            }
        }
        log::debug!("drag end at {col},{row}");
    }

    pub fn nudge(&mut self, dx: f64, dy: f64) {
        self.rotation.nudge(dx * NUDGE_DOTS, dy * NUDGE_DOTS, &self.settings.rotation);
    }

    pub fn zoom_in(&mut self) {
        self.projector.zoom_in();
        log::debug!("zoom {:.2}", self.projector.zoom());
        self.reproject();
    }

    pub fn zoom_out(&mut self) {
        self.projector.zoom_out();
        log::debug!("zoom {:.2}", self.projector.zoom());
        self.reproject();
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.rotation.auto_rotate = !self.rotation.auto_rotate;
    }

    pub fn cycle_style(&mut self) {
        self.style = GlobeStyle::preset(self.style.kind.next());
        log::info!("Style: {}", self.style.kind.name());
    }

    pub fn reset(&mut self) {
        self.rotation.reset();
        self.selected = None;
        self.reproject();
    }

    /// Select the next destination in list order and turn the globe to it.
    pub fn select_next(&mut self) {
        let len = self.destinations.len();
        if len == 0 {
            return;
        }
        let idx = self.selected.map_or(0, |i| (i + 1) % len);
        self.fly_to(idx);
    }

    pub fn select_previous(&mut self) {
        let len = self.destinations.len();
        if len == 0 {
            return;
        }
        let idx = self.selected.map_or(len - 1, |i| (i + len - 1) % len);
        self.fly_to(idx);
    }

    fn fly_to(&mut self, idx: usize) {
        let dest = &self.destinations[idx];
        self.rotation
            .look_at(RotationState::facing(dest.latitude, dest.longitude), &self.settings.rotation);
        self.rotation.auto_rotate = false;
        self.selected = Some(idx);
        log::info!("Flying to {}", dest.label);
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.projector.zoom())
    }

    /// Geographic point at the disk center.
    pub fn center_coords(&self) -> String {
        let (lat, lon) = self.rotation.current().center_lat_lon();
        format_lat_lon(lat, lon)
    }

    /// Geographic point under the mouse, if it is over the globe.
    pub fn cursor_coords(&self) -> Option<String> {
        let p = self.mouse_pixel_pos()?;
        let (lat, lon) = self.projector.unproject(p.x, p.y, &self.rotation.current())?;
        Some(format_lat_lon(lat, lon))
    }

    pub fn hovered_destination(&self) -> Option<&GeoPoint> {
        self.hovered.map(|i| &self.destinations[i])
    }

    pub fn selected_destination(&self) -> Option<&GeoPoint> {
        self.selected.map(|i| &self.destinations[i])
    }
}

/// Braille canvas size in dots for a terminal of `width` x `height` cells.
fn canvas_pixels(width: usize, height: usize) -> (usize, usize) {
    let (cols, rows) = canvas_cells(width, height);
    (cols * 2, rows * 4)
}

/// Globe area in character cells.
pub fn canvas_cells(width: usize, height: usize) -> (usize, usize) {
    (width.saturating_sub(CHROME_COLS), height.saturating_sub(CHROME_ROWS))
}

/// Terminal cell to canvas dot, accounting for the 1-cell border.
fn cell_to_pixel(col: u16, row: u16) -> DVec2 {
    let px = col.saturating_sub(1) as f64 * 2.0 + 1.0;
    let py = row.saturating_sub(1) as f64 * 4.0 + 2.0;
    DVec2::new(px, py)
}
