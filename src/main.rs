//! room-scanner - interactive front end for the rover room scanner.
//!
//! Reads commands from stdin:
//! - `start`: begin a scan session (ignored with a warning if one is running)
//! - `stop` / `s`: stop the running session
//! - `status`: print the current session status
//! - `exit`: stop any running session and quit (Ctrl-C does the same)

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;

use clap::Parser;
use crossbeam_channel::{Receiver, bounded, select, unbounded};

use room_scanner::config::{ScannerConfig, load_config};
use room_scanner::controller::{SessionController, StartOutcome};
use room_scanner::io::{RoverTransport, SessionLogSink, SimulatedRover, init_logging};

#[derive(Parser, Debug)]
#[command(author, version, about = "Autonomous wall-following room scanner", long_about = None)]
struct Args {
    /// Configuration file (default: room-scanner.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rover controller base URL (overrides [rover] base_url)
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for session logs and reports (overrides [session] log_dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Session step ceiling (overrides [navigation] max_steps)
    #[arg(long)]
    max_steps: Option<u32>,

    /// Run against a simulated rectangular room instead of the rover, e.g. 6x4
    #[arg(long, value_name = "WxH")]
    simulate: Option<RoomSize>,
}

impl Args {
    fn apply_overrides(&self, config: &mut ScannerConfig) {
        if let Some(url) = &self.base_url {
            config.rover.base_url = url.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.session.log_dir = dir.clone();
        }
        if let Some(max_steps) = self.max_steps {
            config.navigation.max_steps = max_steps;
        }
    }
}

/// Simulated room dimensions in meters.
#[derive(Debug, Clone, Copy)]
struct RoomSize {
    width_m: f32,
    height_m: f32,
}

impl FromStr for RoomSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| *v > 0.0)
                .ok_or_else(|| format!("invalid room dimension '{}'", v))
        };
        Ok(Self {
            width_m: parse(w)?,
            height_m: parse(h)?,
        })
    }
}

fn build_controller(config: ScannerConfig, simulate: Option<RoomSize>) -> SessionController {
    match simulate {
        Some(room) => {
            log::info!(
                "Using simulated {:.1} m x {:.1} m room",
                room.width_m,
                room.height_m
            );
            SessionController::new(config, move |config: &ScannerConfig| {
                let rover = SimulatedRover::centered(room.width_m, room.height_m)
                    .with_step(config.navigation.step_distance_m);
                Ok(Box::new(rover) as Box<dyn RoverTransport>)
            })
        }
        None => {
            log::info!("Rover controller at {}", config.rover.base_url);
            SessionController::http(config)
        }
    }
}

/// Forward stdin lines to a channel so the main loop can also watch Ctrl-C.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            loop {
                print!("Enter command (start/stop/status/exit): ");
                let _ = io::stdout().flush();
                let mut line = String::new();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                }
            }
        })
        .expect("Failed to spawn stdin thread");
    rx
}

/// Handle one command line. Returns false when the REPL should exit.
fn handle_command(controller: &SessionController, line: &str) -> bool {
    match line.trim().to_lowercase().as_str() {
        "start" => match controller.start() {
            Ok(StartOutcome::Started) => log::info!("Scan started."),
            Ok(StartOutcome::AlreadyRunning) => {}
            Err(e) => log::error!("Failed to start scan: {}", e),
        },
        "stop" | "s" => {
            controller.stop();
        }
        "status" => {
            println!("{}", controller.status());
            if let Some(report) = controller.last_report() {
                println!(
                    "Last scan: {} after {} steps, area {:.2} m²",
                    report.reason, report.step_count, report.area.area_m2
                );
            }
        }
        "exit" | "quit" => return false,
        "" => {}
        _ => log::warn!("Unknown command."),
    }
    true
}

fn main() {
    let args = Args::parse();

    let log_sink = SessionLogSink::new();
    init_logging(log_sink.clone());

    let mut config = load_config(args.config.as_deref());
    args.apply_overrides(&mut config);
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let controller = build_controller(config, args.simulate).with_log_sink(log_sink);

    // Setup signal handler
    let (interrupt_tx, interrupt_rx) = bounded(1);
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt_tx.try_send(());
    }) {
        log::warn!("Error setting Ctrl-C handler: {}", e);
    }

    let lines = spawn_stdin_reader();
    loop {
        select! {
            recv(lines) -> line => match line {
                Ok(line) => {
                    if !handle_command(&controller, &line) {
                        break;
                    }
                }
                Err(_) => {
                    log::info!("Input closed; waiting for the running scan to finish");
                    controller.wait();
                    break;
                }
            },
            recv(interrupt_rx) -> _ => {
                println!();
                log::info!("Received shutdown signal");
                break;
            }
        }
    }

    controller.shutdown();
    log::info!("room-scanner exiting");
}
