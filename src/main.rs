//! Thermostat, host entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  SimTemperature  LogDisplay  SerialTelegramSink  LocalClock  │
//! │  (Temperature)   (Display)   (Telegram)          (Clock)     │
//! │  IndicatorAnimator ◀── SignalIndicators (IndicatorPort)      │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │        Controller (Mutex: FSM · setpoint · policy)   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │        ▲ InputDispatcher            ▲ RefreshCycle           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Threads: indicator animator, refresh cycle, input dispatcher.  The main
//! thread reads button presses from stdin until `q` or end of input.
//!
//! Usage: `thermostat [config.json]`

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, info, warn};

use thermostat::adapters::config_file::JsonConfigFile;
use thermostat::adapters::indicators::IndicatorAnimator;
use thermostat::adapters::log_display::LogDisplay;
use thermostat::adapters::serial::{LogTelegramSink, SerialTelegramSink};
use thermostat::adapters::sim::{self, SimPwm, SimTemperature};
use thermostat::adapters::time::LocalClock;
use thermostat::app::controller::Controller;
use thermostat::app::dispatch::{InputDispatcher, InputQueue};
use thermostat::app::ports::{PulseTiming, TelegramPort, TemperaturePort};
use thermostat::app::refresh::RefreshCycle;
use thermostat::config::ThermostatConfig;

const DEFAULT_CONFIG_PATH: &str = "thermostat.json";

fn main() -> Result<()> {
    // ── 1. Config + logging ───────────────────────────────────
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());
    let (config, loaded) = ThermostatConfig::load_or_default(&JsonConfigFile::new(&path))
        .with_context(|| format!("loading {}", path))?;
    init_logging(config.debug);

    info!("╔══════════════════════════════════════╗");
    info!("║  Thermostat v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    if loaded {
        info!("Config loaded from {}", path);
    } else {
        warn!("No config at {}, using defaults", path);
    }

    // ── 2. Adapters ───────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let (animator, indicators) =
        IndicatorAnimator::new(SimPwm::new(), SimPwm::new(), config.indicator_frame_ms);
    let mut sensor = SimTemperature::default();
    let telegrams = open_telegrams(&config)?;

    // ── 3. Controller ─────────────────────────────────────────
    let pulse = PulseTiming::new(config.pulse_fade_in_ms, config.pulse_fade_out_ms);
    let seed = sensor
        .read_fahrenheit()
        .map(|t| t.floor() as i32)
        .unwrap_or_default();
    let controller = Arc::new(Controller::new(indicators, pulse, seed));
    let queue = Arc::new(InputQueue::new());

    // ── 4. Threads ────────────────────────────────────────────
    let animator_thread = spawn("indicators", {
        let shutdown = shutdown.clone();
        move || animator.run(&shutdown)
    })?;

    let refresh = RefreshCycle::new(
        controller.clone(),
        sensor,
        LogDisplay::new(),
        telegrams,
        LocalClock::new(),
        &config,
        shutdown.clone(),
    );
    let refresh_thread = spawn("refresh", move || refresh.run())?;

    let dispatcher = InputDispatcher::new(queue.clone(), controller.clone());
    let dispatch_thread = spawn("input", move || dispatcher.run())?;

    info!("System ready. Reading buttons from stdin.");

    // ── 5. Input until quit ───────────────────────────────────
    let presses = sim::read_buttons(io::stdin().lock(), &queue);
    info!("Shutting down after {} presses", presses);

    shutdown.store(true, Ordering::Release);
    queue.stop();

    let stats = join(refresh_thread, "refresh")?;
    join(dispatch_thread, "input")?;
    join(animator_thread, "indicators")?;

    info!(
        "Stopped: {} ticks, {} telegrams ({} failed), {} sensor failures",
        stats.ticks, stats.telegrams_sent, stats.telegram_failures, stats.sensor_failures
    );
    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` when the config asks.
fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn open_telegrams(config: &ThermostatConfig) -> Result<Box<dyn TelegramPort + Send>> {
    match &config.serial_port {
        Some(path) => {
            let sink = SerialTelegramSink::open(path, config.baud_rate)
                .map_err(|e| anyhow!(e))
                .with_context(|| format!("opening serial port {}", path))?;
            Ok(Box::new(sink))
        }
        None => {
            warn!("No serial_port configured, telegrams go to the log");
            Ok(Box::new(LogTelegramSink::new()))
        }
    }
}

fn spawn<T, F>(name: &str, f: F) -> Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(f)
        .with_context(|| format!("spawning {} thread", name))
}

fn join<T>(handle: JoinHandle<T>, name: &str) -> Result<T> {
    handle
        .join()
        .map_err(|_| anyhow!("{} thread panicked", name))
}
