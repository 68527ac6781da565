//! RakshaIO daemon entry point
//!
//! Startup order matters for safety: the actuation loop is running and
//! holding the actuator at zero before the first client can connect.

use raksha_io::config::Config;
use raksha_io::devices;
use raksha_io::error::{Error, Result};
use raksha_io::server::CommandServer;
use raksha_io::supervisor::SupervisorState;
use raksha_io::supervisor::actuation::spawn_actuation_loop;
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `raksha-io <path>` (positional)
/// - `raksha-io --config <path>` (flag-based)
/// - `raksha-io -c <path>` (short flag)
///
/// Defaults to `/etc/rakshaio.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/rakshaio.toml".to_string()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("RakshaIO v0.2.0 starting...");

    let config_path = parse_config_path();
    log::info!("Using config: {}", config_path);
    let config = Config::load(&config_path)?;

    let profile = config.clamp_profile();
    log::info!(
        "Actuator: {} on {}, clamp profile: {}",
        config.actuator.driver,
        config.actuator.port,
        profile
    );

    // Opening the actuator must not move the motor; the loop's first tick
    // applies 0.0 because the state starts disarmed.
    let actuator = devices::create_actuator(&config.actuator)?;

    let state = Arc::new(SupervisorState::new());
    let running = Arc::new(AtomicBool::new(true));

    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    // Bind before the first actuation tick so every fatal startup error
    // happens while the actuator has still never been commanded.
    let server = CommandServer::bind(&config.network, Arc::clone(&state), Arc::clone(&running))?;

    let actuation_handle = spawn_actuation_loop(
        Arc::clone(&state),
        actuator,
        profile,
        config.tick_interval(),
        Arc::clone(&running),
    )?;

    server.run()?;

    // Accept loop is done; the actuation loop performs its final neutral
    // cycle before joining. Client session threads die with the process.
    log::info!("Shutting down...");
    actuation_handle
        .join()
        .map_err(|_| Error::Other("actuation thread panicked".to_string()))?;

    log::info!("RakshaIO stopped");
    Ok(())
}
