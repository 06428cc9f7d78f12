//! ESP32 track-occupancy sensor module.
//!
//! This is the main entry point for the physical sensor hardware.
//! It runs an endless poll loop that:
//! - Sweeps the 16 mux channels with debounced sampling
//! - Diffs the result against the last reported state vector
//! - Probes the central station and sends one CAN frame per transition
//! - Renders the contact row and link state to the OLED (if enabled)
//!
//! # Build
//!
//! ```bash
//! # Basic (mux sampling + reporting)
//! cargo build --features esp32,wifi
//!
//! # With display
//! cargo build --features esp32,wifi,display
//! ```
//!
//! Configuration comes from compile-time env vars: `WIFI_SSID`,
//! `WIFI_PASSWORD`, `CS_HOST`, `CS_PORT`, `MODULE_NUMBER`.

use esp_idf_hal::peripherals::Peripherals;
use rs_trackstate::hal::esp32::{Esp32Clock, Esp32Mux};
use rs_trackstate::hal::tcp::station_endpoints;
use rs_trackstate::mcan::DeviceHash;
use rs_trackstate::monitor::TrackMonitor;
use rs_trackstate::{Config, DeviceConfig, StationConfig, WifiConfig};

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();

    println!();
    println!("==================================");
    println!("  rs-trackstate occupancy sensor");
    println!("==================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let module_number: u16 = option_env!("MODULE_NUMBER")
        .unwrap_or("1")
        .parse()
        .unwrap_or(1);
    let cs_port: u16 = option_env!("CS_PORT")
        .unwrap_or("15731")
        .parse()
        .unwrap_or(15731);

    let config = Config::default()
        .with_wifi(
            WifiConfig::default()
                .with_ssid(option_env!("WIFI_SSID").unwrap_or(""))
                .with_password(option_env!("WIFI_PASSWORD").unwrap_or("")),
        )
        .with_station(
            StationConfig::default()
                .with_host(option_env!("CS_HOST").unwrap_or(""))
                .with_port(cs_port),
        )
        .with_device(DeviceConfig::default().with_module_number(module_number));

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Initialize Mux (74HC4067 on GPIO2-6)
    // =========================================================================
    let bus = Esp32Mux::new(
        peripherals.pins.gpio2, // S0
        peripherals.pins.gpio3, // S1
        peripherals.pins.gpio4, // S2
        peripherals.pins.gpio5, // S3
        peripherals.pins.gpio6, // SIG
    )?;
    println!("[OK] Mux initialized (GPIO2-6)");

    // =========================================================================
    // Initialize Display (SSD1306 on GPIO8/9) - Optional
    // =========================================================================
    #[cfg(feature = "display")]
    let mut display = {
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::prelude::*;
        use rs_trackstate::hal::esp32::Esp32Display;

        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio8, // SDA
            peripherals.pins.gpio9, // SCL
            &I2cConfig::new().baudrate(400.kHz().into()),
        )?;

        let disp = Esp32Display::new(i2c, config.station.host.as_str())
            .map_err(|e| anyhow::anyhow!("Display init failed: {:?}", e))?;
        println!("[OK] Display initialized (GPIO8/9 I2C)");
        disp
    };

    #[cfg(not(feature = "display"))]
    let display = rs_trackstate::hal::MockDisplay::new();

    #[cfg(feature = "display")]
    {
        use rs_trackstate::traits::StatusDisplay;
        let _ = display.show_message("rs-trackstate", Some("Starting..."));
    }

    // =========================================================================
    // Initialize WiFi and derive the device hash from the MAC
    // =========================================================================
    #[cfg(feature = "wifi")]
    let (wifi, hash, ip) = {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use rs_trackstate::hal::esp32::Esp32Wifi;

        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;

        #[cfg(feature = "display")]
        {
            use rs_trackstate::traits::StatusDisplay;
            let _ = display.show_message("WiFi", Some("Connecting..."));
        }

        let wifi = Esp32Wifi::new(peripherals.modem, sysloop, Some(nvs), &config.wifi)?;
        let hash = DeviceHash::from_mac(wifi.mac()?);
        let ip = wifi
            .ip_addr()
            .map(|ip| ip.to_string())
            .unwrap_or_default();
        println!("[OK] WiFi connected: {}  Hash: {}", ip, hash);

        (wifi, hash, ip)
    };

    #[cfg(not(feature = "wifi"))]
    let (hash, ip) = (DeviceHash::from_uid(0), String::new());

    // =========================================================================
    // Initialize Station Link
    // =========================================================================
    let (probe, link) = station_endpoints(&config.station)?;
    println!(
        "[OK] Station link: {}:{}",
        config.station.host, config.station.port
    );

    // =========================================================================
    // Start the Monitor
    // =========================================================================
    let mut monitor = TrackMonitor::new(
        bus,
        probe,
        link,
        display,
        Esp32Clock::new(),
        hash,
        &config,
    )
    .with_ip(&ip);

    monitor.start();
    println!(
        "[CS] Link {}",
        if monitor.link_up() { "up" } else { "down" }
    );
    println!();
    println!("Starting poll loop...");
    println!();

    #[cfg(feature = "wifi")]
    let _wifi = wifi; // keep the connection alive for the process lifetime

    // =========================================================================
    // Main Poll Loop
    // =========================================================================
    monitor.run()
}
