//! conscope - console session probe
//!
//! Runs one editing session against the real console and reports what was
//! negotiated: the input mode before, during and after the session, the
//! mouse policy in effect, and the cursor sizes learned from the host.
//!
//! # Quick Start
//!
//! ```text
//! conscope                 # Probe with settings from ~/.conscope/config.toml
//! conscope --mouse auto    # Override the mouse input setting
//! conscope --enhanced      # Also flash the enhanced cursor
//! ```

use std::env;
use std::thread;
use std::time::Duration;

use anyhow::bail;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use conscope::config::{self, Config};
use conscope::console::{ConsoleHost, CursorStyle, HostKind, ModeFlags, NativeConsole, StdStream};
use conscope::session::{Console, ConsoleOut, PrinterSession, PrinterSlot};
use conscope::MouseInput;

/// Command line options
struct Options {
    /// Overrides `terminal.mouse_input`
    mouse_input: Option<MouseInput>,
    /// Whether the session accepts mouse input at all
    accept_mouse: bool,
    /// Overrides host terminal detection
    host_kind: Option<HostKind>,
    /// Overrides `terminal.adjust_cursor_style`
    adjust_cursor_style: Option<bool>,
    /// Show the enhanced cursor during the session
    enhanced: bool,
    /// How long to hold the session open
    hold: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mouse_input: None,
            accept_mouse: true,
            host_kind: None,
            adjust_cursor_style: None,
            enhanced: false,
            hold: Duration::ZERO,
        }
    }
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("conscope {}", VERSION);
}

fn print_help() {
    eprintln!("conscope {} - console session probe", VERSION);
    eprintln!();
    eprintln!("Usage: conscope [OPTIONS]");
    eprintln!();
    eprintln!("Mouse options:");
    eprintln!("  -m, --mouse <MODE>    Mouse input: off, on, auto");
    eprintln!("  --no-mouse            Leave the mouse to the terminal");
    eprintln!();
    eprintln!("Host options:");
    eprintln!("  (default)             Detect from the environment");
    eprintln!("  --legacy              Windows console host");
    eprintln!("  --multiplexer         ConEmu-style host");
    eprintln!("  --modern              Windows Terminal or similar");
    eprintln!();
    eprintln!("Cursor options:");
    eprintln!("  -e, --enhanced        Show the enhanced cursor during the session");
    eprintln!("  --cursor-style        Adjust the cursor even if disabled in config");
    eprintln!("  --no-cursor-style     Never adjust the cursor");
    eprintln!("  --hold <MS>           Keep the session open for MS milliseconds");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Configuration: ~/.conscope/config.toml");
    eprintln!("Log file:      ~/.conscope/conscope.log (level via CONSCOPE_LOG)");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            // Mouse
            "-m" | "--mouse" => {
                i += 1;
                let value = args.get(i).ok_or("Missing mouse input argument")?;
                options.mouse_input = Some(value.parse()?);
            }
            "--no-mouse" => {
                options.accept_mouse = false;
            }
            // Host
            "--legacy" => {
                options.host_kind = Some(HostKind::LegacyConsole);
            }
            "--multiplexer" => {
                options.host_kind = Some(HostKind::Multiplexer);
            }
            "--modern" => {
                options.host_kind = Some(HostKind::Modern);
            }
            // Cursor
            "-e" | "--enhanced" => {
                options.enhanced = true;
            }
            "--cursor-style" => {
                options.adjust_cursor_style = Some(true);
            }
            "--no-cursor-style" => {
                options.adjust_cursor_style = Some(false);
            }
            "--hold" => {
                i += 1;
                let value = args.get(i).ok_or("Missing hold duration")?;
                let ms = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid hold duration: {}", value))?;
                options.hold = Duration::from_millis(ms);
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn init_logging() {
    let log_path = config::config_dir()
        .map(|dir| dir.join("conscope.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("conscope.log"));

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env("CONSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn read_input_mode<H: ConsoleHost>(console: &Console<H>) -> Option<ModeFlags> {
    let host = console.host();
    let handle = host.std_handle(StdStream::Input)?;
    host.mode(handle).ok().map(ModeFlags::from_raw)
}

fn show_mode(mode: Option<ModeFlags>) -> String {
    mode.map(|m| m.to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging();
    info!("conscope starting...");

    let mut terminal = Config::load().terminal;
    if let Some(mouse_input) = options.mouse_input {
        terminal.mouse_input = mouse_input;
    }
    let host_kind = options.host_kind.unwrap_or_else(HostKind::detect);

    info!("Host terminal: {}", host_kind.name());
    info!("Mouse input: {}", terminal.mouse_input);

    let mut console = Console::new(NativeConsole::new(), &terminal, host_kind);
    console.override_adjust_cursor_style(options.adjust_cursor_style);

    let before = read_input_mode(&console);
    let during;
    {
        let mut out = ConsoleOut::new(NativeConsole::new());
        let mut printers = PrinterSlot::new();
        let _printer = PrinterSession::begin(&mut out, &mut printers, "probe")?;

        let mut guard = console.enter(None, options.accept_mouse);
        during = guard.applied_mode();

        if options.enhanced {
            let was_visible = guard.set_cursor_style(None, Some(CursorStyle::Enhanced), Some(true));
            thread::sleep(options.hold);
            guard.set_cursor_style(None, Some(CursorStyle::Default), Some(was_visible));
        } else {
            thread::sleep(options.hold);
        }
    }
    let after = read_input_mode(&console);

    eprintln!("Host terminal:   {}", host_kind.name());
    eprintln!("Mouse input:     {} (accepting: {})", terminal.mouse_input, options.accept_mouse);
    eprintln!("Adjust cursor:   {}", console.adjust_cursor_style());
    if let (Some(default), Some(alternate)) = (console.cursor().default_size(), console.cursor().alternate_size()) {
        eprintln!("Cursor sizes:    default {}, enhanced {}", default, alternate);
    }
    eprintln!("Mode before:     {}", show_mode(before));
    eprintln!("Mode editing:    {}", show_mode(during));
    eprintln!("Mode after:      {}", show_mode(after));

    if before != after {
        warn!("Input mode not restored: {} != {}", show_mode(before), show_mode(after));
        bail!("input mode was not restored");
    }

    info!("conscope finished");
    Ok(())
}
