//! Configuration for the RakshaIO daemon
//!
//! Loads configuration from a TOML file. The `[safety]` section is the one
//! that matters: it selects the clamp profile and the actuation period, both
//! fixed for the lifetime of the process.

use crate::error::{Error, Result};
use crate::supervisor::safety::ClampProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Upper bound on the actuation period. A disarm observed one tick late must
/// still reach the hardware within 100 ms.
pub const MAX_TICK_INTERVAL_MS: u64 = 100;

/// Top-level daemon configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub actuator: ActuatorConfig,
    pub safety: SafetyConfig,
}

/// TCP command server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// TCP bind address for inbound command connections
    ///
    /// Examples:
    /// - `127.0.0.1:12345` - Localhost only
    /// - `0.0.0.0:12345` - All interfaces
    pub bind_address: String,

    /// Maximum concurrent client sessions; further connections are closed
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Force armed=false and duty=0 when a client disconnects
    ///
    /// The default keeps the original behavior: arming state is independent
    /// of connection lifetime and only an explicit disarm/stop clears it.
    #[serde(default)]
    pub stop_on_disconnect: bool,
}

/// Actuator driver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActuatorConfig {
    /// Driver name: "vesc" (serial hardware) or "mock" (no hardware)
    pub driver: String,

    /// Serial port of the VESC (e.g. "/dev/ttyACM0")
    pub port: String,

    /// Serial baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Safety profile configuration
///
/// `profile` names the clamp policy:
/// - `"hard-safe"`: output magnitude capped at `max_duty`
/// - `"spin"`: output magnitude held inside `[min_spin_duty, max_duty]`,
///   sign preserved, zero stays zero
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SafetyConfig {
    /// Clamp profile name
    pub profile: String,

    /// Hard ceiling on output magnitude (duty fraction)
    pub max_duty: f64,

    /// Stall floor for the "spin" profile (ignored by "hard-safe")
    #[serde(default = "default_min_spin_duty")]
    pub min_spin_duty: f64,

    /// Actuation loop period in milliseconds (must be <= 100)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_max_sessions() -> usize {
    8
}

fn default_baud_rate() -> u32 {
    115200
}

fn default_min_spin_duty() -> f64 {
    0.5
}

fn default_tick_interval_ms() -> u64 {
    50
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration: hard-safe profile on localhost
    ///
    /// Suitable for bench testing. Deployments should use a TOML file.
    pub fn hard_safe_defaults() -> Self {
        Self {
            network: NetworkConfig {
                bind_address: "127.0.0.1:12345".to_string(),
                max_sessions: default_max_sessions(),
                stop_on_disconnect: false,
            },
            actuator: ActuatorConfig {
                driver: "vesc".to_string(),
                port: "/dev/ttyACM0".to_string(),
                baud_rate: default_baud_rate(),
            },
            safety: SafetyConfig {
                profile: "hard-safe".to_string(),
                max_duty: 0.05,
                min_spin_duty: default_min_spin_duty(),
                tick_interval_ms: default_tick_interval_ms(),
            },
        }
    }

    /// Check safety-relevant bounds
    pub fn validate(&self) -> Result<()> {
        let s = &self.safety;

        if s.tick_interval_ms == 0 || s.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(Error::InvalidParameter(format!(
                "tick_interval_ms must be in 1..={} (got {})",
                MAX_TICK_INTERVAL_MS, s.tick_interval_ms
            )));
        }

        if !(s.max_duty > 0.0 && s.max_duty <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "max_duty must be in (0.0, 1.0] (got {})",
                s.max_duty
            )));
        }

        match s.profile.as_str() {
            "hard-safe" => {}
            "spin" => {
                if !(s.min_spin_duty > 0.0 && s.min_spin_duty <= s.max_duty) {
                    return Err(Error::InvalidParameter(format!(
                        "min_spin_duty must be in (0.0, max_duty] (got {})",
                        s.min_spin_duty
                    )));
                }
            }
            other => {
                return Err(Error::InvalidParameter(format!(
                    "unknown safety profile: {}",
                    other
                )));
            }
        }

        if self.network.max_sessions == 0 {
            return Err(Error::InvalidParameter(
                "max_sessions must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the clamp profile from the validated `[safety]` section
    pub fn clamp_profile(&self) -> ClampProfile {
        match self.safety.profile.as_str() {
            "spin" => ClampProfile::Spin {
                min_duty: self.safety.min_spin_duty,
                max_duty: self.safety.max_duty,
            },
            // validate() only admits "hard-safe" beyond this point
            _ => ClampProfile::HardSafe {
                max_duty: self.safety.max_duty,
            },
        }
    }

    /// Actuation loop period
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.safety.tick_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::hard_safe_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::hard_safe_defaults();
        assert_eq!(config.network.bind_address, "127.0.0.1:12345");
        assert_eq!(config.network.max_sessions, 8);
        assert!(!config.network.stop_on_disconnect);
        assert_eq!(config.safety.profile, "hard-safe");
        assert_eq!(config.safety.max_duty, 0.05);
        assert_eq!(config.safety.tick_interval_ms, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[network]
bind_address = "0.0.0.0:12345"
max_sessions = 4
stop_on_disconnect = true

[actuator]
driver = "mock"
port = "/dev/ttyACM1"

[safety]
profile = "spin"
max_duty = 1.0
min_spin_duty = 0.5
tick_interval_ms = 20
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.network.bind_address, "0.0.0.0:12345");
        assert_eq!(config.network.max_sessions, 4);
        assert!(config.network.stop_on_disconnect);
        assert_eq!(config.actuator.driver, "mock");
        assert_eq!(config.actuator.baud_rate, 115200); // default applied
        assert_eq!(config.safety.min_spin_duty, 0.5);
        assert!(config.validate().is_ok());

        match config.clamp_profile() {
            ClampProfile::Spin { min_duty, max_duty } => {
                assert_eq!(min_duty, 0.5);
                assert_eq!(max_duty, 1.0);
            }
            other => panic!("expected spin profile, got {:?}", other),
        }
    }

    #[test]
    fn test_toml_serialization() {
        let config = Config::hard_safe_defaults();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[network]"));
        assert!(toml_string.contains("[actuator]"));
        assert!(toml_string.contains("[safety]"));
        assert!(toml_string.contains("max_duty = 0.05"));
    }

    #[test]
    fn test_validate_rejects_slow_tick() {
        let mut config = Config::hard_safe_defaults();
        config.safety.tick_interval_ms = 250;
        assert!(config.validate().is_err());

        config.safety.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_duty_bounds() {
        let mut config = Config::hard_safe_defaults();
        config.safety.max_duty = 0.0;
        assert!(config.validate().is_err());

        config.safety.max_duty = 1.5;
        assert!(config.validate().is_err());

        config = Config::hard_safe_defaults();
        config.safety.profile = "spin".to_string();
        config.safety.max_duty = 0.3;
        config.safety.min_spin_duty = 0.5; // floor above ceiling
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_profile() {
        let mut config = Config::hard_safe_defaults();
        config.safety.profile = "turbo".to_string();
        assert!(config.validate().is_err());
    }
}
