//! The actuation loop
//!
//! A single long-lived thread wakes on a fixed period, snapshots the shared
//! state, computes the clamped output, and pushes it to the actuator. Its
//! cadence depends only on the timer; it never blocks on network input, so a
//! slow or hostile client cannot starve it.
//!
//! Apply failures are logged and the loop carries on: the next tick
//! recomputes the output from the clamp, never from history, so a
//! failure-then-retry pattern can never compound into an over-limit command.

use crate::devices::Actuator;
use crate::supervisor::safety::ClampProfile;
use crate::supervisor::state::SupervisorState;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Output for one tick: zero when disarmed, clamped commanded duty otherwise
pub fn effective_output(armed: bool, commanded_duty: f64, profile: &ClampProfile) -> f64 {
    if armed {
        profile.clamp(commanded_duty)
    } else {
        0.0
    }
}

/// Spawn the actuation thread
///
/// Runs until `running` goes false, then performs one final neutral cycle
/// (state forced to safe idle, `apply(0.0)`) before exiting, so the actuator
/// is left at zero output even on an abrupt shutdown.
pub fn spawn_actuation_loop(
    state: Arc<SupervisorState>,
    mut actuator: Box<dyn Actuator>,
    profile: ClampProfile,
    period: Duration,
    running: Arc<AtomicBool>,
) -> crate::error::Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("actuation".to_string())
        .spawn(move || {
            log::info!(
                "Actuation loop started: period {:?}, profile {}",
                period,
                profile
            );

            while running.load(Ordering::Relaxed) {
                let cycle_start = Instant::now();

                let (armed, commanded) = state.snapshot();
                let effective = effective_output(armed, commanded, &profile);

                if let Err(e) = actuator.apply(effective) {
                    // Transient fault: retry next tick with a freshly
                    // clamped value, never escalate the output.
                    log::error!("Actuator apply failed (duty {:.4}): {}", effective, e);
                }

                let elapsed = cycle_start.elapsed();
                if elapsed < period {
                    thread::sleep(period - elapsed);
                } else {
                    log::warn!(
                        "Actuation cycle overrun: {:?} (target: {:?})",
                        elapsed,
                        period
                    );
                }
            }

            // Final neutral cycle before stopping
            state.stop();
            if let Err(e) = actuator.apply(0.0) {
                log::error!("Final neutral apply failed: {}", e);
            }

            log::info!("Actuation loop stopped");
        })?;

    Ok(handle)
}
