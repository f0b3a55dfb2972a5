use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use globe_tour::braille::BrailleCanvas;
use globe_tour::map::GlobeLayers;

use crate::app::App;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(2), // Status lines
        ])
        .split(frame.area());

    render_globe(frame, app, chunks[0]);
    render_status(frame, app, chunks[1]);
}

fn render_globe(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Destinations ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layers = app.render_layers(inner.width as usize, inner.height as usize);
    frame.render_widget(GlobeWidget { layers }, inner);
}

/// Braille layers composited back to front, then labels on top.
struct GlobeWidget {
    layers: GlobeLayers,
}

impl GlobeWidget {
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (col, row, ch) in canvas.glyphs() {
            if col >= area.width as usize || row >= area.height as usize {
                continue;
            }
            let x = area.x + col as u16;
            let y = area.y + row as u16;
            buf[(x, y)].set_char(ch).set_fg(color);
        }
    }
}

impl Widget for GlobeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layers = &self.layers;
        Self::render_layer(&layers.graticule, Color::DarkGray, area, buf);
        Self::render_layer(&layers.silhouette, Color::Blue, area, buf);
        Self::render_layer(&layers.outlines, Color::Green, area, buf);
        Self::render_layer(&layers.markers, Color::Yellow, area, buf);
        Self::render_layer(&layers.focus, Color::LightRed, area, buf);

        for label in &layers.labels {
            if label.row >= area.height || label.col >= area.width {
                continue;
            }
            let style = if label.focused {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let max_width = area.width.saturating_sub(label.col) as usize;
            buf.set_stringn(area.x + label.col, area.y + label.row, &label.text, max_width, style);
        }
    }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let value = Style::default().fg(Color::White);
    let dim = Style::default().fg(Color::DarkGray);

    let spin = if app.rotation.is_dragging() {
        "drag"
    } else if app.rotation.auto_rotate {
        "on"
    } else {
        "off"
    };
    let cursor = app.cursor_coords().unwrap_or_else(|| "-".to_string());

    let top = Line::from(vec![
        Span::styled(" style ", key),
        Span::styled(app.style.kind.name(), value),
        Span::styled("  zoom ", key),
        Span::styled(app.zoom_level(), value),
        Span::styled("  center ", key),
        Span::styled(app.center_coords(), value),
        Span::styled("  cursor ", key),
        Span::styled(cursor, value),
        Span::styled("  spin ", key),
        Span::styled(spin, value),
    ]);

    let focus = match (app.hovered_destination(), app.selected_destination()) {
        (Some(p), _) => Span::styled(format!(" ▸ {} ({})", p.label, p.describe()), value),
        (None, Some(p)) => Span::styled(
            format!(" ● {} ({})", p.label, p.describe()),
            value.add_modifier(Modifier::BOLD),
        ),
        (None, None) => Span::styled(" hover a marker", dim),
    };
    let bottom = Line::from(vec![
        focus,
        Span::styled(
            "   drag rotate · scroll zoom · click select · n/p next/prev · space spin · s style · r reset · q quit",
            dim,
        ),
    ]);

    frame.render_widget(Paragraph::new(vec![top, bottom]), area);
}
