//! Pi Pong entry point
//!
//! Owns the boundary glue: logger setup, raw-mode terminal, the fixed-rate
//! loop, keyboard and button polling, and display-mode cycling. Everything
//! with gameplay meaning lives in `pi_pong::sim`.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use termion::cursor::HideCursor;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;

use pi_pong::buttons::{ButtonBridge, PinConfig};
use pi_pong::consts::{TICK_RATE, TICK_RATE_FLOOR};
use pi_pong::input::{ButtonState, KeyCode};
use pi_pong::render::Frame;
use pi_pong::settings::Settings;
use pi_pong::sim::{GameState, TickInput, Viewport, tick};

/// 16:9 display modes, largest first; `+`/`-` cycle through them
const DISPLAY_MODES: &[(f32, f32)] = &[
    (1920.0, 1080.0),
    (1600.0, 900.0),
    (1280.0, 720.0),
    (1024.0, 576.0),
];

const SETTINGS_PATH: &str = "pi-pong.json";

/// Ticks a keyboard key stays held after its last press event. Terminals
/// deliver no key-up, so release is synthesized once auto-repeat stops
/// refreshing the key; the button bridge carries real release edges.
const KEY_HOLD_TICKS: u64 = 30;

fn main() {
    if let Err(err) = init_logging().and_then(|()| run()) {
        log::error!("fatal: {err:#}");
        eprintln!("pi-pong: {err:#}");
        std::process::exit(1);
    }
}

/// Route leveled records to a timestamped file; the terminal owns stdout
fn init_logging() -> Result<()> {
    fs::create_dir_all("logs").context("creating log directory")?;
    let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let file =
        fs::File::create(format!("logs/{stamp}.log")).context("creating log file")?;
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run() -> Result<()> {
    let mut settings = Settings::load(SETTINGS_PATH);
    let gpio_buttons = gpio_enabled(env::args(), &settings);
    let mut mode_index = settings.mode_index.min(DISPLAY_MODES.len() - 1);
    let (width, height) = DISPLAY_MODES[mode_index];
    log::info!("screen width: {width}px, screen height: {height}px");

    let seed = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64;
    let mut state = GameState::new(seed, Viewport::new(width, height));
    log::info!("match started with seed {seed}");

    // Physical buttons push into this channel from the pin-polling thread;
    // the loop below is the single consumer
    let (bridge, button_rx) = ButtonBridge::channel();
    if gpio_buttons {
        let pins = PinConfig::from_env();
        log::info!(
            "button pins: left {}/{}, right {}/{}",
            pins.left_up,
            pins.left_down,
            pins.right_up,
            pins.right_down
        );
        #[cfg(feature = "gpio")]
        pi_pong::buttons::gpio::attach(&pins, bridge.clone())
            .context("attaching GPIO buttons")?;
        #[cfg(not(feature = "gpio"))]
        log::warn!("built without the gpio feature; physical buttons stay idle");
    }

    let raw = io::stdout()
        .into_raw_mode()
        .context("entering raw mode (is stdout a terminal?)")?;
    let mut stdout = HideCursor::from(raw);
    let mut keys = termion::async_stdin().keys();

    let tick_duration = Duration::from_secs_f32(1.0 / TICK_RATE);
    let mut last_frame = Instant::now();
    let mut held: HashMap<KeyCode, u64> = HashMap::new();
    let mut tick_count: u64 = 0;

    loop {
        tick_count += 1;

        // Tick scale from observed frame rate; an undefined rate (first
        // frame, stalled clock) falls back to the floor instead of blowing
        // the scale up
        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();
        let observed = if dt > 0.0 { 1.0 / dt } else { TICK_RATE_FLOOR };
        let tick_scale = TICK_RATE / observed;

        let mut input = TickInput::default();
        let mut quit = false;

        for key in keys.by_ref() {
            match key.context("reading key events")? {
                Key::Char('q') | Key::Esc | Key::Ctrl('c') => quit = true,
                Key::Char('+') | Key::Char('=') => {
                    if mode_index > 0 {
                        mode_index -= 1;
                        apply_mode(&mut state, mode_index);
                    }
                }
                Key::Char('-') => {
                    if mode_index + 1 < DISPLAY_MODES.len() {
                        mode_index += 1;
                        apply_mode(&mut state, mode_index);
                    }
                }
                other => {
                    if let Some(code) = translate(other) {
                        input.key_downs.push(code);
                        held.insert(code, tick_count);
                    }
                }
            }
        }

        // Synthesize releases for keys auto-repeat stopped refreshing
        held.retain(|code, pressed_at| {
            if tick_count - *pressed_at >= KEY_HOLD_TICKS {
                input.key_ups.push(*code);
                false
            } else {
                true
            }
        });

        if gpio_buttons {
            for event in button_rx.try_iter() {
                match event.state {
                    ButtonState::Pressed => input.key_downs.push(event.key),
                    ButtonState::Released => input.key_ups.push(event.key),
                }
            }
        }

        tick(&mut state, &input, tick_scale);

        let (cols, rows) = termion::terminal_size().context("querying terminal size")?;
        let frame = Frame::compose(&state, cols, rows, settings.debug_markers);
        frame.present(&mut stdout).context("presenting frame")?;

        // Quit only after the tick's render has completed
        if quit {
            break;
        }

        let elapsed = last_frame.elapsed();
        if elapsed < tick_duration {
            thread::sleep(tick_duration - elapsed);
        }
    }

    drop(bridge);
    settings.mode_index = mode_index;
    if let Err(err) = settings.save(SETTINGS_PATH) {
        log::warn!("failed to save settings: {err}");
    }
    write!(stdout, "{}{}", termion::clear::All, termion::cursor::Goto(1, 1))?;
    stdout.flush()?;
    log::debug!("closing program");
    Ok(())
}

/// GPIO wiring is on when either the settings file or a `--gpio` argument
/// asks for it
fn gpio_enabled<I: IntoIterator<Item = String>>(args: I, settings: &Settings) -> bool {
    settings.gpio_buttons || args.into_iter().any(|arg| arg == "--gpio")
}

fn apply_mode(state: &mut GameState, mode_index: usize) {
    let (width, height) = DISPLAY_MODES[mode_index];
    state.resync(Viewport::new(width, height));
}

fn translate(key: Key) -> Option<KeyCode> {
    match key {
        Key::Up => Some(KeyCode::Up),
        Key::Down => Some(KeyCode::Down),
        Key::Char(c) => Some(KeyCode::Char(c)),
        _ => None,
    }
}
