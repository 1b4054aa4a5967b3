#![warn(clippy::all, clippy::pedantic)]

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use fallingblocks_core::app::App;
use fallingblocks_core::config::loader::{get_config_file_path, load_config_from};
use fallingblocks_core::input::{Key, KeyState};
use fallingblocks_core::ui;
use log::{debug, error, info, trace};
use ratatui::{Terminal, prelude::*};

const LOG_PATH: &str = "fallingblocks.log";
const FRAME_TIME: Duration = Duration::from_millis(16);
// Without release events a key counts as held until its auto-repeat stops
const HELD_DECAY: Duration = Duration::from_millis(120);

fn main() -> anyhow::Result<()> {
    // Log to a file so the terminal UI stays clean
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(LOG_PATH)
        .with_context(|| format!("failed to create {LOG_PATH}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting Falling Blocks");

    let config_path = get_config_file_path();
    let app = match load_config_from(&config_path) {
        Ok(config) => {
            info!("Configuration loaded from {}", config_path.display());
            App::new(config, Some(config_path))
        }
        Err(err) => {
            // Keep the broken file untouched and play with defaults
            error!("Failed to load configuration: {err}");
            App::new(fallingblocks_core::config::Config::default(), None)
        }
    };

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let reports_release = supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, reports_release);

    // Restore terminal
    if reports_release {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("Game error: {err:?}");
    }
    info!("Exiting");
    res
}

/// Turns crossterm key events into per-frame key snapshots
struct KeyTracker {
    held: HashMap<Key, Instant>,
    pressed: Vec<Key>,
    shift: bool,
    reports_release: bool,
}

impl KeyTracker {
    fn new(reports_release: bool) -> Self {
        Self {
            held: HashMap::new(),
            pressed: Vec::new(),
            shift: false,
            reports_release,
        }
    }

    fn record(&mut self, event: KeyEvent) {
        let Some(key) = map_key(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press => {
                self.pressed.push(key);
                self.shift = event.modifiers.contains(KeyModifiers::SHIFT);
                self.held.insert(key.normalized(), Instant::now());
            }
            KeyEventKind::Repeat => {
                self.held.insert(key.normalized(), Instant::now());
            }
            KeyEventKind::Release => {
                self.held.remove(&key.normalized());
            }
        }
    }

    fn snapshot(&mut self) -> KeyState {
        if !self.reports_release {
            self.held.retain(|_, seen| seen.elapsed() < HELD_DECAY);
        }
        let mut keys = KeyState::new().with_shift(self.shift);
        for key in self.pressed.drain(..) {
            keys = keys.press(key);
        }
        for &key in self.held.keys() {
            keys = keys.hold(key);
        }
        self.shift = false;
        keys
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    };
    Some(key)
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    reports_release: bool,
) -> anyhow::Result<()> {
    let mut tracker = KeyTracker::new(reports_release);
    let mut last_frame = Instant::now();

    // Flush any pending input events that might be in the buffer
    while event::poll(Duration::ZERO)? {
        let _ = event::read()?;
    }
    debug!("Input flushed, entering main loop");

    loop {
        terminal.draw(|f| ui::render(f, &mut app))?;

        // Collect key events until the frame is due
        let deadline = last_frame + FRAME_TIME;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                trace!("Key event: {key:?}");
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    info!("Interrupted");
                    return Ok(());
                }
                tracker.record(key);
            }
        }

        let delta_seconds = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();

        let keys = tracker.snapshot();
        app.advance(delta_seconds, &keys);

        // No audio backend; the cues only show up in the log
        for cue in app.drain_sound_cues() {
            trace!("Sound cue: {cue:?}");
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
