//! std TCP implementations of the station link traits.
//!
//! The central station listens for CAN frames on a plain TCP port
//! (15731 on a CS2). [`TcpProbe`] checks reachability with a bounded
//! `connect_timeout`, and [`TcpLink`] performs the short-lived
//! connect → send×k → close bursts.
//!
//! A TCP connect stands in for the ICMP echo a privileged target would
//! use: it proves the station process is up and accepting, which is
//! strictly more informative than a bare ping.

use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::StationConfig;
use crate::mcan::TrackFrame;
use crate::traits::{ControllerLink, LinkProbe};

/// Bounded TCP reachability probe.
///
/// Each probe attempts one connection with `connect_timeout` and drops
/// it immediately. Any failure, including timeout, reads as `false`.
#[derive(Debug)]
pub struct TcpProbe {
    addr: SocketAddr,
    timeout: Duration,
}

impl TcpProbe {
    /// Creates a probe for the given address and timeout.
    pub fn new(addr: SocketAddr, timeout_ms: u32) -> Self {
        Self {
            addr,
            timeout: Duration::from_millis(timeout_ms as u64),
        }
    }
}

impl LinkProbe for TcpProbe {
    fn probe(&mut self) -> bool {
        TcpStream::connect_timeout(&self.addr, self.timeout).is_ok()
    }
}

/// Short-lived TCP connection to the central station.
///
/// Connect and write are both bounded by configured timeouts; `close`
/// simply drops the stream. Nagle is disabled so each 13-byte frame
/// leaves immediately.
#[derive(Debug)]
pub struct TcpLink {
    addr: SocketAddr,
    connect_timeout: Duration,
    write_timeout: Duration,
    stream: Option<TcpStream>,
}

impl TcpLink {
    /// Creates a link to the given address.
    pub fn new(addr: SocketAddr, connect_timeout_ms: u32, write_timeout_ms: u32) -> Self {
        Self {
            addr,
            connect_timeout: Duration::from_millis(connect_timeout_ms as u64),
            write_timeout: Duration::from_millis(write_timeout_ms as u64),
            stream: None,
        }
    }
}

impl ControllerLink for TcpLink {
    type Error = std::io::Error;

    fn connect(&mut self) -> std::io::Result<()> {
        let stream = TcpStream::connect_timeout(&self.addr, self.connect_timeout)?;
        stream.set_write_timeout(Some(self.write_timeout))?;
        stream.set_nodelay(true)?;
        self.stream = Some(stream);
        Ok(())
    }

    fn send_frame(&mut self, frame: &TrackFrame) -> std::io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.write_all(frame.as_bytes()),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "station link not connected",
            )),
        }
    }

    fn close(&mut self) {
        // Dropping the stream closes the socket.
        self.stream = None;
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

/// Resolves a station config into a probe + link pair.
///
/// Returns an error when the host does not resolve to any address.
pub fn station_endpoints(config: &StationConfig) -> std::io::Result<(TcpProbe, TcpLink)> {
    let addr = (config.host.as_str(), config.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "station host resolved to no address",
            )
        })?;

    Ok((
        TcpProbe::new(addr, config.probe_timeout_ms),
        TcpLink::new(addr, config.connect_timeout_ms, config.write_timeout_ms),
    ))
}
