//! Poll loop orchestration: sample → diff → probe → encode/send → latch.
//!
//! [`TrackMonitor`] ties the debounced reader, the contact state
//! tracker, the frame encoder, the liveness-gated transport, and the
//! status display together. All collaborators are injected at
//! construction - there are no ambient globals.
//!
//! Each [`run_cycle`](TrackMonitor::run_cycle) iteration:
//!
//! 1. **Sample**: the reader sweeps all channels, the tracker absorbs
//!    the vector.
//! 2. **React** (only on change): the transport re-probes the station,
//!    the status display is refreshed, each transition is encoded in
//!    ascending channel order, the batch is sent iff the link is up,
//!    and the tracker latches.
//!
//! When nothing changed, liveness is still re-probed at the configured
//! idle cadence, and the display is redrawn only when health flips.
//! Transport failures never escape an iteration; they surface only as
//! link-down on the status display.
//!
//! # Example
//!
//! ```rust
//! use rs_trackstate::config::Config;
//! use rs_trackstate::hal::{MockClock, MockDisplay, MockLink, MockMux, MockProbe};
//! use rs_trackstate::mcan::DeviceHash;
//! use rs_trackstate::monitor::TrackMonitor;
//!
//! let config = Config::default();
//! let mut monitor = TrackMonitor::new(
//!     MockMux::new(),
//!     MockProbe::up(),
//!     MockLink::new(),
//!     MockDisplay::new(),
//!     MockClock::new(),
//!     DeviceHash::from_uid(0x1234_5678),
//!     &config,
//! );
//!
//! monitor.start();
//! monitor.bus_mut().set_contact(2, true);
//!
//! let outcome = monitor.run_cycle();
//! assert!(outcome.changed);
//! assert_eq!(outcome.frames_sent, 1);
//! ```

use heapless::Vec as HVec;

use crate::config::Config;
use crate::mcan::{DeviceHash, FrameEncoder, TrackFrame};
use crate::mux::{MuxReader, PORTS_MAX};
use crate::states::ContactStates;
use crate::traits::display::IpString;
use crate::traits::{Clock, ControllerLink, LinkProbe, MuxBus, StatusDisplay, StatusView};
use crate::transport::Transport;

/// Result of one poll cycle, for callers and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Whether any contact changed this cycle.
    pub changed: bool,
    /// Frames actually written to the station.
    pub frames_sent: usize,
    /// Link health after the cycle.
    pub link_up: bool,
}

/// The occupancy monitor: owns the whole acquisition-to-protocol
/// pipeline and runs it one cycle at a time.
///
/// Single logical thread of control; each cycle runs to completion
/// before the next begins. The only suspension points are the bounded
/// sampling delays in the reader and the bounded timeouts in the
/// transport, so no cycle can block indefinitely.
pub struct TrackMonitor<B, P, L, D, C>
where
    B: MuxBus,
    P: LinkProbe,
    L: ControllerLink,
    D: StatusDisplay,
    C: Clock,
{
    reader: MuxReader<B>,
    states: ContactStates,
    encoder: FrameEncoder,
    transport: Transport<P, L>,
    display: D,
    clock: C,
    device_id: u16,
    contact_base: u16,
    liveness_interval_ms: u64,
    idle_delay_ms: u32,
    ip: IpString,
    start_ms: u64,
    last_probe_ms: u64,
}

impl<B, P, L, D, C> TrackMonitor<B, P, L, D, C>
where
    B: MuxBus,
    P: LinkProbe,
    L: ControllerLink,
    D: StatusDisplay,
    C: Clock,
{
    /// Wires the pipeline together from its injected collaborators.
    ///
    /// The caller is expected to have run [`Config::validate`] first;
    /// the monitor applies the sampling parameters, addressing offsets,
    /// and liveness cadence from `config` as given.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bus: B,
        probe: P,
        link: L,
        display: D,
        clock: C,
        hash: DeviceHash,
        config: &Config,
    ) -> Self {
        let reader = MuxReader::new(bus)
            .with_ports(config.sampling.ports)
            .with_debounce(config.sampling.debounce());
        let states = ContactStates::new().with_ports(config.sampling.ports);
        let encoder = FrameEncoder::new(
            hash,
            config.station.command,
            config.station.response_expected,
        );

        Self {
            reader,
            states,
            encoder,
            transport: Transport::new(probe, link),
            display,
            clock,
            device_id: config.device.device_id,
            contact_base: config.device.contact_base(),
            liveness_interval_ms: config.station.liveness_interval_ms as u64,
            idle_delay_ms: config.sampling.idle_delay_ms,
            ip: IpString::new(),
            start_ms: 0,
            last_probe_ms: 0,
        }
    }

    /// Sets the local IP shown on the status display.
    pub fn with_ip(mut self, ip: &str) -> Self {
        self.ip = IpString::new();
        for c in ip.chars() {
            if self.ip.push(c).is_err() {
                break;
            }
        }
        self
    }

    /// Takes the baseline sample and brings up the status surface.
    ///
    /// The state present at startup is latched without being reported -
    /// only subsequent changes produce frames.
    pub fn start(&mut self) {
        let now = self.clock.now_ms();
        self.start_ms = now;

        let vector = self.reader.read_all();
        self.states.set_current(vector);
        self.states.latch();

        self.transport.refresh();
        self.last_probe_ms = now;

        let _ = self.display.init();
        let view = self.view();
        let _ = self.display.render(&view);
    }

    /// Runs one poll cycle. Never panics, never blocks past the
    /// configured sampling and transport bounds.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let now = self.clock.now_ms();

        let vector = self.reader.read_all();
        self.states.set_current(vector);

        let changed = self.states.is_changed();
        let mut frames_sent = 0;

        if changed {
            let link_up = self.transport.refresh();
            self.last_probe_ms = now;

            let view = self.view();
            let _ = self.display.render(&view);

            let time_10ms = (now.wrapping_sub(self.start_ms) / 10) as u16;
            let mut batch: HVec<TrackFrame, { PORTS_MAX as usize }> = HVec::new();
            for t in self.states.changes() {
                let contact_no = self.contact_base + t.channel as u16;
                let frame = self.encoder.encode_track_state(
                    self.device_id,
                    contact_no,
                    t.old,
                    t.new,
                    time_10ms,
                );
                // Cannot overflow: at most one transition per port.
                let _ = batch.push(frame);
            }

            if link_up {
                frames_sent = self.transport.send_batch(&batch);
            }

            self.states.latch();
        } else if now.wrapping_sub(self.last_probe_ms) >= self.liveness_interval_ms {
            let was_up = self.transport.link_up();
            let link_up = self.transport.refresh();
            self.last_probe_ms = now;

            if link_up != was_up {
                let view = self.view();
                let _ = self.display.render(&view);
            }
        }

        CycleOutcome {
            changed,
            frames_sent,
            link_up: self.transport.link_up(),
        }
    }

    /// Runs forever with the configured idle delay between cycles.
    ///
    /// No exit condition; termination is external reset or power-cycle.
    #[cfg(feature = "std")]
    pub fn run(&mut self) -> ! {
        loop {
            self.run_cycle();
            std::thread::sleep(std::time::Duration::from_millis(self.idle_delay_ms as u64));
        }
    }

    /// Idle delay between poll cycles in milliseconds.
    #[inline]
    pub fn idle_delay_ms(&self) -> u32 {
        self.idle_delay_ms
    }

    /// Link health as of the most recent probe.
    #[inline]
    pub fn link_up(&self) -> bool {
        self.transport.link_up()
    }

    /// The tracked contact states.
    pub fn states(&self) -> &ContactStates {
        &self.states
    }

    /// Access to the mux bus (mock inspection in tests).
    pub fn bus_mut(&mut self) -> &mut B {
        self.reader.bus_mut()
    }

    /// Access to the transport.
    pub fn transport_mut(&mut self) -> &mut Transport<P, L> {
        &mut self.transport
    }

    /// Access to the status display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Current status snapshot, as rendered to the display.
    pub fn view(&self) -> StatusView {
        StatusView {
            contacts: self.states.summary(),
            link_up: self.transport.link_up(),
            hash: self.encoder.hash(),
            ip: self.ip.clone(),
        }
    }
}
