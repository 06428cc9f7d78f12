//! Typed, validated configuration for the sensor module.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Configuration is supplied by
//! the caller (compile-time env, NVS, whatever) - the core consumes an
//! already-built [`Config`] and refuses to run on an invalid one.
//!
//! # Example
//!
//! ```rust
//! use rs_trackstate::config::{Config, StationConfig, SamplingConfig};
//!
//! let config = Config::default()
//!     .with_station(StationConfig::default().with_host("192.168.178.112"))
//!     .with_sampling(SamplingConfig::default().with_ports(16));
//!
//! config.validate().unwrap();
//! ```

use heapless::String as HString;

use crate::mcan::{CMD_TRACK_STATE, CS_TCP_PORT};
use crate::mux::{CHECK_DELAY_US, CHECK_MAX, CHECK_MIN_ZEROS, PORTS_DEFAULT, PORTS_MAX};

/// Maximum length for short config strings (hostnames, device names)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, _)| *i < take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Device identification
    pub device: DeviceConfig,
    /// WiFi connection configuration
    pub wifi: WifiConfig,
    /// Central station link configuration
    pub station: StationConfig,
    /// Contact sampling configuration
    pub sampling: SamplingConfig,
}

impl Config {
    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Set WiFi configuration
    pub fn with_wifi(mut self, wifi: WifiConfig) -> Self {
        self.wifi = wifi;
        self
    }

    /// Set station configuration
    pub fn with_station(mut self, station: StationConfig) -> Self {
        self.station = station;
        self
    }

    /// Set sampling configuration
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Fail-fast startup validation.
    ///
    /// The core refuses to run without a station host and a sane
    /// channel/debounce setup, and enforces the protocol requirement
    /// that track-state commands carry the response bit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.station.host.is_empty() {
            return Err(ConfigError::MissingStationHost);
        }
        if self.sampling.ports == 0 || self.sampling.ports > PORTS_MAX {
            return Err(ConfigError::InvalidPortCount(self.sampling.ports));
        }
        if self.sampling.check_max == 0 {
            return Err(ConfigError::ZeroSampleBudget);
        }
        if self.sampling.min_zeros == 0 || self.sampling.min_zeros > self.sampling.check_max {
            return Err(ConfigError::DebounceThreshold {
                min_zeros: self.sampling.min_zeros,
                check_max: self.sampling.check_max,
            });
        }
        if self.device.module_number == 0 {
            return Err(ConfigError::InvalidModuleNumber);
        }
        if self.station.command == CMD_TRACK_STATE && !self.station.response_expected {
            return Err(ConfigError::ResponseFlagRequired);
        }
        Ok(())
    }
}

/// Startup configuration errors. All fatal: the core does not start on
/// an invalid configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No central station host configured.
    MissingStationHost,
    /// Port count outside 1..=16.
    InvalidPortCount(u8),
    /// Sample budget is zero.
    ZeroSampleBudget,
    /// Debounce threshold is zero or exceeds the sample budget.
    DebounceThreshold {
        /// Configured low-reading threshold.
        min_zeros: u16,
        /// Configured sample budget.
        check_max: u16,
    },
    /// Module number must be 1-based.
    InvalidModuleNumber,
    /// Track-state commands must be sent with the response bit set.
    ResponseFlagRequired,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::MissingStationHost => write!(f, "no central station host configured"),
            ConfigError::InvalidPortCount(n) => {
                write!(f, "port count {n} outside 1..=16")
            }
            ConfigError::ZeroSampleBudget => write!(f, "sample budget must be nonzero"),
            ConfigError::DebounceThreshold {
                min_zeros,
                check_max,
            } => write!(
                f,
                "debounce threshold {min_zeros} invalid for sample budget {check_max}"
            ),
            ConfigError::InvalidModuleNumber => write!(f, "module number must be >= 1"),
            ConfigError::ResponseFlagRequired => {
                write!(f, "track-state command requires the response flag")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name
    pub name: ShortString,
    /// Device group id carried in every frame payload
    pub device_id: u16,
    /// 1-based module number; each module covers 16 contacts
    pub module_number: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-trackstate"),
            device_id: 0,
            module_number: 1,
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the device group id
    pub fn with_device_id(mut self, id: u16) -> Self {
        self.device_id = id;
        self
    }

    /// Set the 1-based module number
    pub fn with_module_number(mut self, module: u16) -> Self {
        self.module_number = module;
        self
    }

    /// First absolute contact number of this module:
    /// `(module_number - 1) * 16`.
    pub fn contact_base(&self) -> u16 {
        self.module_number.saturating_sub(1) * 16
    }
}

// ============================================================================
// Station Config
// ============================================================================

/// Central station link configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationConfig {
    /// Station hostname or IP
    pub host: ShortString,
    /// Station TCP port
    pub port: u16,
    /// Reachability probe timeout in milliseconds
    pub probe_timeout_ms: u32,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u32,
    /// Per-frame write timeout in milliseconds
    pub write_timeout_ms: u32,
    /// Idle liveness re-probe cadence in milliseconds
    pub liveness_interval_ms: u32,
    /// Command code for occupancy events
    pub command: u8,
    /// Whether frames carry the response bit (required for track-state)
    pub response_expected: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            host: ShortString::new(),
            port: CS_TCP_PORT,
            probe_timeout_ms: 500,
            connect_timeout_ms: 500,
            write_timeout_ms: 500,
            liveness_interval_ms: 5000,
            command: CMD_TRACK_STATE,
            response_expected: true,
        }
    }
}

impl StationConfig {
    /// Set the station host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = short_string(host);
        self
    }

    /// Set the station port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the probe timeout
    pub fn with_probe_timeout_ms(mut self, ms: u32) -> Self {
        self.probe_timeout_ms = ms;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout_ms(mut self, ms: u32) -> Self {
        self.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout
    pub fn with_write_timeout_ms(mut self, ms: u32) -> Self {
        self.write_timeout_ms = ms;
        self
    }

    /// Set the idle liveness cadence
    pub fn with_liveness_interval_ms(mut self, ms: u32) -> Self {
        self.liveness_interval_ms = ms;
        self
    }

    /// Check if a station host is configured
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
    }
}

// ============================================================================
// Sampling Config
// ============================================================================

/// Contact sampling configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplingConfig {
    /// Number of mux ports to sweep (1..=16)
    pub ports: u8,
    /// Sample budget per channel
    pub check_max: u16,
    /// Low-reading threshold for accepting a channel as set
    pub min_zeros: u16,
    /// Delay between samples in microseconds
    pub delay_us: u32,
    /// Idle delay between poll cycles in milliseconds
    pub idle_delay_ms: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            ports: PORTS_DEFAULT,
            check_max: CHECK_MAX,
            min_zeros: CHECK_MIN_ZEROS,
            delay_us: CHECK_DELAY_US,
            idle_delay_ms: 20,
        }
    }
}

impl SamplingConfig {
    /// Set the port count
    pub fn with_ports(mut self, ports: u8) -> Self {
        self.ports = ports;
        self
    }

    /// Set the sample budget
    pub fn with_check_max(mut self, check_max: u16) -> Self {
        self.check_max = check_max;
        self
    }

    /// Set the low-reading threshold
    pub fn with_min_zeros(mut self, min_zeros: u16) -> Self {
        self.min_zeros = min_zeros;
        self
    }

    /// Set the sample spacing
    pub fn with_delay_us(mut self, delay_us: u32) -> Self {
        self.delay_us = delay_us;
        self
    }

    /// Set the idle delay between poll cycles
    pub fn with_idle_delay_ms(mut self, ms: u32) -> Self {
        self.idle_delay_ms = ms;
        self
    }

    /// Debounce parameters for the channel reader
    pub fn debounce(&self) -> crate::mux::Debounce {
        crate::mux::Debounce {
            check_max: self.check_max,
            min_zeros: self.min_zeros,
            delay_us: self.delay_us,
        }
    }
}

// ============================================================================
// WiFi Config
// ============================================================================

/// WiFi connection configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WifiConfig {
    /// WiFi network SSID
    pub ssid: ShortString,
    /// WiFi password
    pub password: ShortString,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u32,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: ShortString::new(),
            password: ShortString::new(),
            connect_timeout_ms: 30_000,
        }
    }
}

impl WifiConfig {
    /// Set the SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout_ms(mut self, ms: u32) -> Self {
        self.connect_timeout_ms = ms;
        self
    }

    /// Check if WiFi credentials are configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config::default().with_station(StationConfig::default().with_host("192.168.178.112"))
    }

    #[test]
    fn default_with_host_validates() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn missing_host_rejected() {
        let config = Config::default();
        assert_eq!(config.validate(), Err(ConfigError::MissingStationHost));
    }

    #[test]
    fn port_count_bounds() {
        let config = valid().with_sampling(SamplingConfig::default().with_ports(0));
        assert_eq!(config.validate(), Err(ConfigError::InvalidPortCount(0)));

        let config = valid().with_sampling(SamplingConfig::default().with_ports(17));
        assert_eq!(config.validate(), Err(ConfigError::InvalidPortCount(17)));

        let config = valid().with_sampling(SamplingConfig::default().with_ports(8));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn debounce_threshold_must_fit_budget() {
        let config = valid().with_sampling(
            SamplingConfig::default()
                .with_check_max(10)
                .with_min_zeros(11),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::DebounceThreshold {
                min_zeros: 11,
                check_max: 10
            })
        );

        let config = valid().with_sampling(SamplingConfig::default().with_min_zeros(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DebounceThreshold { .. })
        ));
    }

    #[test]
    fn zero_budget_rejected() {
        let config = valid().with_sampling(SamplingConfig::default().with_check_max(0));
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleBudget));
    }

    #[test]
    fn module_number_is_one_based() {
        let config = valid().with_device(DeviceConfig::default().with_module_number(0));
        assert_eq!(config.validate(), Err(ConfigError::InvalidModuleNumber));
    }

    #[test]
    fn response_flag_required_for_track_state() {
        let mut station = StationConfig::default().with_host("cs");
        station.response_expected = false;
        let config = Config::default().with_station(station);
        assert_eq!(config.validate(), Err(ConfigError::ResponseFlagRequired));
    }

    #[test]
    fn contact_base_from_module_number() {
        assert_eq!(DeviceConfig::default().contact_base(), 0);
        assert_eq!(
            DeviceConfig::default().with_module_number(5).contact_base(),
            64
        );
    }

    #[test]
    fn short_string_truncates_at_char_boundary() {
        let long = "x".repeat(100);
        assert_eq!(short_string(&long).len(), MAX_SHORT_STRING);

        let umlauts = "ä".repeat(40); // 80 bytes
        let truncated = short_string(&umlauts);
        assert!(truncated.len() <= MAX_SHORT_STRING);
        assert!(truncated.as_str().chars().all(|c| c == 'ä'));
    }

    #[test]
    fn station_defaults() {
        let station = StationConfig::default();
        assert_eq!(station.port, CS_TCP_PORT);
        assert_eq!(station.command, CMD_TRACK_STATE);
        assert!(station.response_expected);
        assert!(!station.is_configured());
    }
}
