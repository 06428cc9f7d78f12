//! Märklin CAN frame construction: device hash and track-state commands.
//!
//! The central station speaks the Märklin CS2 CAN protocol tunneled over
//! TCP: every message is a fixed 13-byte record holding an expanded
//! 32-bit CAN identifier, a length byte, and an 8-byte payload.
//!
//! ```text
//! byte  0..4   CAN ID:  prio(4) | command(8) | response(1) | hash(16), big-endian
//! byte  4      DLC, always 8 for track-state events
//! byte  5..13  payload: device_id:2 | contact_no:2 | old:1 | new:1 | time:2
//! ```
//!
//! Every sender on the shared bus tags its frames with a 16-bit hash
//! derived from its hardware address, so the station can tell units
//! apart. Track-state events use command [`CMD_TRACK_STATE`] and must be
//! sent with the response bit set.
//!
//! # Example
//!
//! ```rust
//! use rs_trackstate::mcan::{DeviceHash, FrameEncoder};
//!
//! let hash = DeviceHash::from_mac([0x24, 0x6F, 0x28, 0xAE, 0x52, 0x7C]);
//! let encoder = FrameEncoder::track_state(hash);
//!
//! let frame = encoder.encode_track_state(0, 66, false, true, 120);
//! assert_eq!(frame.as_bytes().len(), 13);
//! assert_eq!(frame.contact_no(), 66);
//! assert!(frame.is_response_expected());
//! ```

use core::fmt;

/// Command code for track-state (occupancy) events.
pub const CMD_TRACK_STATE: u8 = 0x22;

/// Wire size of one frame.
pub const FRAME_LEN: usize = 13;

/// TCP port the central station listens on for CAN frames.
pub const CS_TCP_PORT: u16 = 15731;

/// Payload length for track-state events.
const PAYLOAD_LEN: u8 = 8;

/// Hash marker: bits 7..9 are forced to `0b110` so the value can never
/// be all-zero or all-one and never lands in the station's reserved
/// identifier ranges.
const HASH_MARKER_CLEAR: u16 = 0xFF7F;
const HASH_MARKER_SET: u16 = 0x0300;

/// Per-device 16-bit frame identity, derived once from the hardware
/// address and constant for the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceHash(u16);

impl DeviceHash {
    /// Derives the hash from a 6-byte MAC address.
    ///
    /// The MAC is folded into a 32-bit UID (the low four bytes XORed
    /// with the OUI half shifted up), then the two UID halves are XORed
    /// and the marker bits applied. Deterministic: the same MAC always
    /// produces the same hash, across calls and across restarts.
    pub fn from_mac(mac: [u8; 6]) -> Self {
        let high = u16::from_be_bytes([mac[0], mac[1]]) as u32;
        let low = u32::from_be_bytes([mac[2], mac[3], mac[4], mac[5]]);
        Self::from_uid(low ^ (high << 16) ^ high)
    }

    /// Derives the hash from a 32-bit UID: XOR the halves, then force
    /// the marker bits.
    pub fn from_uid(uid: u32) -> Self {
        let folded = ((uid >> 16) ^ (uid & 0xFFFF)) as u16;
        DeviceHash((folded & HASH_MARKER_CLEAR) | HASH_MARKER_SET)
    }

    /// The raw 16-bit value.
    #[inline]
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DeviceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// One immutable 13-byte command frame.
///
/// Constructed fresh per transition by [`FrameEncoder`], serialized and
/// transmitted exactly once. The decoding accessors exist so receivers
/// and tests can recover the payload fields.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TrackFrame {
    bytes: [u8; FRAME_LEN],
}

impl TrackFrame {
    /// Wraps raw wire bytes (e.g. a received frame) without validation.
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self { bytes }
    }

    /// The wire representation.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// The expanded 32-bit CAN identifier.
    pub fn can_id(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// Priority field (bits 25..29 of the identifier).
    pub fn priority(&self) -> u8 {
        ((self.can_id() >> 25) & 0x0F) as u8
    }

    /// Command code.
    pub fn command(&self) -> u8 {
        ((self.can_id() >> 17) & 0xFF) as u8
    }

    /// Whether the response bit is set.
    pub fn is_response_expected(&self) -> bool {
        self.can_id() & (1 << 16) != 0
    }

    /// Sender hash (low 16 bits of the identifier).
    pub fn hash(&self) -> u16 {
        (self.can_id() & 0xFFFF) as u16
    }

    /// Declared payload length.
    pub fn dlc(&self) -> u8 {
        self.bytes[4]
    }

    /// Device group id from the payload.
    pub fn device_id(&self) -> u16 {
        u16::from_be_bytes([self.bytes[5], self.bytes[6]])
    }

    /// Absolute contact number from the payload.
    pub fn contact_no(&self) -> u16 {
        u16::from_be_bytes([self.bytes[7], self.bytes[8]])
    }

    /// Previous contact state.
    pub fn old_state(&self) -> bool {
        self.bytes[9] != 0
    }

    /// New contact state.
    pub fn new_state(&self) -> bool {
        self.bytes[10] != 0
    }

    /// Evaluation-time counter, 10 ms resolution.
    pub fn time_10ms(&self) -> u16 {
        u16::from_be_bytes([self.bytes[11], self.bytes[12]])
    }
}

impl fmt::Debug for TrackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrackFrame {{ cmd: {:#04X}, hash: {:04X}, contact: {}, {} -> {} }}",
            self.command(),
            self.hash(),
            self.contact_no(),
            self.old_state() as u8,
            self.new_state() as u8,
        )
    }
}

/// Builds command frames for one device.
///
/// Configured once at startup with the device hash, command code, and
/// response flag; pure transform from then on - no I/O, cannot fail for
/// valid inputs.
#[derive(Clone, Copy, Debug)]
pub struct FrameEncoder {
    hash: DeviceHash,
    command: u8,
    response_expected: bool,
}

impl FrameEncoder {
    /// Creates an encoder with an explicit command code and response
    /// flag.
    pub fn new(hash: DeviceHash, command: u8, response_expected: bool) -> Self {
        Self {
            hash,
            command,
            response_expected,
        }
    }

    /// Creates an encoder for track-state events: command
    /// [`CMD_TRACK_STATE`] with the response bit set, as the protocol
    /// requires for this command.
    pub fn track_state(hash: DeviceHash) -> Self {
        Self::new(hash, CMD_TRACK_STATE, true)
    }

    /// The configured device hash.
    #[inline]
    pub fn hash(&self) -> DeviceHash {
        self.hash
    }

    /// The configured command code.
    #[inline]
    pub fn command(&self) -> u8 {
        self.command
    }

    /// Whether frames are built with the response bit set.
    #[inline]
    pub fn response_expected(&self) -> bool {
        self.response_expected
    }

    /// Builds one track-state frame.
    ///
    /// # Arguments
    ///
    /// * `device_id` - device group id carried in the payload
    /// * `contact_no` - absolute contact number (base offset + channel)
    /// * `old` / `new` - the transition, encoded 0/1 on the wire
    /// * `time_10ms` - evaluation-time counter in 10 ms units
    pub fn encode_track_state(
        &self,
        device_id: u16,
        contact_no: u16,
        old: bool,
        new: bool,
        time_10ms: u16,
    ) -> TrackFrame {
        // Priority 0 for track-state events.
        let id = ((self.command as u32) << 17)
            | ((self.response_expected as u32) << 16)
            | self.hash.value() as u32;

        let mut bytes = [0u8; FRAME_LEN];
        bytes[0..4].copy_from_slice(&id.to_be_bytes());
        bytes[4] = PAYLOAD_LEN;
        bytes[5..7].copy_from_slice(&device_id.to_be_bytes());
        bytes[7..9].copy_from_slice(&contact_no.to_be_bytes());
        bytes[9] = old as u8;
        bytes[10] = new as u8;
        bytes[11..13].copy_from_slice(&time_10ms.to_be_bytes());

        TrackFrame { bytes }
    }
}
