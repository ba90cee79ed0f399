use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use radar_rescuer_core::app::{App, UiAction};
use radar_rescuer_core::config::AppConfig;
use radar_rescuer_core::geolocation::FeedGeolocation;
use radar_rescuer_core::import_data;
use radar_rescuer_core::renderer::{MapRenderer, MapServer};
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const REPLAY_INTERVAL: Duration = Duration::from_millis(500);

fn redraw(app: &App, map_url: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    // raw mode needs explicit carriage returns
    let text = app.render().to_string().replace('\n', "\r\n");
    write!(stdout, "{text}\r\n\r\n")?;
    write!(stdout, "map: {map_url}\r\n")?;
    write!(
        stdout,
        "keys: [f] find your path  [s] stop  [e] exit  [t] theme  [h] scan for humans  [q] quit\r\n"
    )?;
    stdout.flush()
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let args: Vec<String> = env::args().collect();
    let gpx_path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("./tests/data/cubbon_park_walk.gpx");
    let config = match args.get(2) {
        Some(config_path) => AppConfig::load(Path::new(config_path))?,
        None => AppConfig::default(),
    };

    let samples = import_data::load_gpx(Path::new(gpx_path))?;
    if samples.is_empty() {
        return Err(format!("no track points in {gpx_path}").into());
    }

    let map_renderer = Arc::new(Mutex::new(MapRenderer::new()));
    let mut server = MapServer::new("localhost", 0);
    server.start()?;
    let token = server.register(Arc::downgrade(&map_renderer));

    let geolocation = FeedGeolocation::new();
    let mut app = App::new(config, Box::new(geolocation.clone()))
        .with_map_widget(Box::new(map_renderer.clone()));

    // Plays the track in a loop, like a phone walking the same route.
    std::thread::spawn(move || loop {
        for sample in &samples {
            geolocation.emit(*sample);
            std::thread::sleep(REPLAY_INTERVAL);
        }
    });

    ctrlc::set_handler(move || {
        let _ = disable_raw_mode();
        println!("\nReceived Ctrl+C! Shutting down...");
        std::process::exit(0);
    })?;

    enable_raw_mode()?;
    redraw(&app, &token.url())?;
    loop {
        let mut changed = false;
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                let action = match code {
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('q') => break,
                    KeyCode::Char('f') => Some(UiAction::FindYourPath),
                    KeyCode::Char('s') => Some(UiAction::StopTracking),
                    KeyCode::Char('e') => Some(UiAction::ExitTracking),
                    KeyCode::Char('t') => Some(UiAction::ToggleTheme),
                    KeyCode::Char('h') => Some(UiAction::ScanForHumans),
                    _ => None,
                };
                if let Some(action) = action {
                    app.dispatch(action);
                    changed = true;
                }
            }
        }
        if !app.pump().is_empty() {
            changed = true;
        }
        if changed {
            redraw(&app, &token.url())?;
        }
    }

    disable_raw_mode()?;
    println!("Stopping map server...");
    drop(token);
    server.stop();
    Ok(())
}
