//! Actuation loop safety tests
//!
//! Drives the real loop thread against the mock actuator and checks the
//! hard guarantees: every value reaching the actuator is clamped, disarm
//! means zero on the next tick, apply failures never escalate the output,
//! and shutdown ends on a neutral cycle.

use raksha_io::devices::MockActuator;
use raksha_io::supervisor::actuation::spawn_actuation_loop;
use raksha_io::supervisor::{ClampProfile, SupervisorState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(5);
const HARD_SAFE: ClampProfile = ClampProfile::HardSafe { max_duty: 0.05 };

struct LoopFixture {
    state: Arc<SupervisorState>,
    actuator: MockActuator,
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

fn start_loop(profile: ClampProfile) -> LoopFixture {
    let state = Arc::new(SupervisorState::new());
    let actuator = MockActuator::new();
    let running = Arc::new(AtomicBool::new(true));

    let handle = spawn_actuation_loop(
        Arc::clone(&state),
        Box::new(actuator.clone()),
        profile,
        TICK,
        Arc::clone(&running),
    )
    .expect("failed to spawn actuation loop");

    LoopFixture {
        state,
        actuator,
        running,
        handle,
    }
}

impl LoopFixture {
    /// Block until at least `count` duties have been applied
    fn wait_for_applies(&self, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while self.actuator.apply_count() < count {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {} applies (got {})",
                count,
                self.actuator.apply_count()
            );
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn shutdown(self) -> MockActuator {
        self.running.store(false, Ordering::Relaxed);
        self.handle.join().expect("actuation thread panicked");
        self.actuator
    }
}

#[test]
fn test_overlimit_duty_reaches_actuator_clamped() {
    // Scenario: arm, command 0.9 under a 0.05 cap. The ack side echoes 0.9;
    // the hardware side must only ever see 0.05.
    let fixture = start_loop(HARD_SAFE);

    fixture.state.arm();
    assert_eq!(fixture.state.set_duty(0.9), Ok(0.9));

    let seen = fixture.actuator.apply_count();
    fixture.wait_for_applies(seen + 3);

    assert_eq!(fixture.actuator.last_applied(), Some(0.05));
    for duty in fixture.actuator.applied() {
        assert!(duty.abs() <= 0.05, "unclamped value reached actuator: {}", duty);
    }

    fixture.shutdown();
}

#[test]
fn test_negative_duty_clamped_with_sign() {
    let fixture = start_loop(HARD_SAFE);

    fixture.state.arm();
    fixture.state.set_duty(-0.9).unwrap();

    let seen = fixture.actuator.apply_count();
    fixture.wait_for_applies(seen + 3);

    assert_eq!(fixture.actuator.last_applied(), Some(-0.05));

    fixture.shutdown();
}

#[test]
fn test_disarm_forces_zero_from_next_tick() {
    let fixture = start_loop(HARD_SAFE);

    fixture.state.arm();
    fixture.state.set_duty(0.02).unwrap();
    fixture.wait_for_applies(fixture.actuator.apply_count() + 3);
    assert_eq!(fixture.actuator.last_applied(), Some(0.02));

    fixture.state.disarm();
    // One tick may already be in flight with a pre-disarm snapshot; every
    // tick after it must apply exactly zero.
    let mark = fixture.actuator.apply_count();
    fixture.wait_for_applies(mark + 5);

    let applied = fixture.actuator.applied();
    for &duty in &applied[mark + 1..] {
        assert_eq!(duty, 0.0, "nonzero output after disarm: {:?}", applied);
    }

    fixture.shutdown();
}

#[test]
fn test_apply_failure_does_not_stop_or_escalate() {
    let fixture = start_loop(HARD_SAFE);

    fixture.state.arm();
    fixture.state.set_duty(0.03).unwrap();
    fixture.wait_for_applies(fixture.actuator.apply_count() + 2);

    // Three ticks fail; the loop must keep its cadence and come back with
    // the same clamped value, not a compensated one.
    fixture.actuator.fail_next(3);
    let seen = fixture.actuator.apply_count();
    fixture.wait_for_applies(seen + 3);

    assert_eq!(fixture.actuator.last_applied(), Some(0.03));
    for duty in fixture.actuator.applied() {
        assert!(duty.abs() <= 0.05);
    }

    fixture.shutdown();
}

#[test]
fn test_shutdown_ends_on_neutral_cycle() {
    let fixture = start_loop(HARD_SAFE);

    fixture.state.arm();
    fixture.state.set_duty(0.04).unwrap();
    fixture.wait_for_applies(fixture.actuator.apply_count() + 3);

    let state = Arc::clone(&fixture.state);
    let actuator = fixture.shutdown();

    // Final cycle: state forced to safe idle, actuator left at zero
    assert_eq!(actuator.last_applied(), Some(0.0));
    assert_eq!(state.snapshot(), (false, 0.0));
}

#[test]
fn test_spin_profile_band_applied_at_loop() {
    let spin = ClampProfile::Spin {
        min_duty: 0.5,
        max_duty: 1.0,
    };
    let fixture = start_loop(spin);

    fixture.state.arm();

    // Below the stall floor: lifted
    fixture.state.set_duty(0.2).unwrap();
    let seen = fixture.actuator.apply_count();
    fixture.wait_for_applies(seen + 3);
    assert_eq!(fixture.actuator.last_applied(), Some(0.5));

    // Above the ceiling, negative: capped, sign kept
    fixture.state.set_duty(-1.8).unwrap();
    let seen = fixture.actuator.apply_count();
    fixture.wait_for_applies(seen + 3);
    assert_eq!(fixture.actuator.last_applied(), Some(-1.0));

    fixture.shutdown();
}
