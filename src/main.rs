mod app;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use globe_tour::config::{Cli, Settings};
use globe_tour::data;
use globe_tour::geo::GeoPoint;
use globe_tour::map::LineString;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let settings = Settings::resolve(&cli).context("Failed to load settings")?;
    let (destinations, outlines) = load_data(&settings)?;
    log::info!(
        "Starting with {} destinations, {} outline lines, style {}",
        destinations.len(),
        outlines.len(),
        settings.style.name()
    );

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, settings, destinations, outlines);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Logs go to a file when asked for; the terminal belongs to the UI.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let mut builder = match &cli.log_level {
        Some(filters) => {
            let mut builder = env_logger::Builder::new();
            builder.parse_filters(filters);
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")),
    };
    builder.target(env_logger::Target::Pipe(Box::new(file))).init();
    Ok(())
}

fn load_data(settings: &Settings) -> Result<(Vec<GeoPoint>, Vec<LineString>)> {
    let destinations = match &settings.destinations {
        Some(path) => data::load_destinations(path)
            .with_context(|| format!("Failed to load destinations from {}", path.display()))?,
        None => data::builtin_destinations(),
    };
    if destinations.is_empty() {
        log::warn!("No destinations to show");
    }

    // A broken outline file only costs the overlay
    let outlines = match &settings.outlines {
        Some(path) => data::load_outlines(path).unwrap_or_else(|e| {
            log::warn!("Falling back to built-in outlines: {e}");
            data::builtin_outlines()
        }),
        None => data::builtin_outlines(),
    };

    Ok((destinations, outlines))
}

/// Handle mouse events for rotating, hovering, selecting and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        MouseEventKind::Down(MouseButton::Left) => app.begin_drag(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(mouse.column, mouse.row),
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Rotate with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.nudge(-1.0, 0.0),
        KeyCode::Right | KeyCode::Char('l') => app.nudge(1.0, 0.0),
        KeyCode::Up | KeyCode::Char('k') => app.nudge(0.0, -1.0),
        KeyCode::Down | KeyCode::Char('j') => app.nudge(0.0, 1.0),

        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        KeyCode::Char(' ') => app.toggle_auto_rotate(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.cycle_style(),
        KeyCode::Char('n') | KeyCode::Tab => app.select_next(),
        KeyCode::Char('p') | KeyCode::BackTab => app.select_previous(),
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset(),
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    settings: Settings,
    destinations: Vec<GeoPoint>,
    outlines: Vec<LineString>,
) -> Result<()> {
    let size = terminal.size()?;
    let frame_time = Duration::from_secs_f64(1.0 / settings.fps as f64);
    let mut app = App::new(size.width as usize, size.height as usize, settings, destinations, outlines);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Drain input until the next frame is due
        let deadline = last_frame + frame_time;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key.code),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
            if app.should_quit {
                return Ok(());
            }
        }

        let now = Instant::now();
        app.tick(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;
    }
}
