//! SNTP client packet codec
//!
//! Only the fields a client needs are touched: the request carries the
//! version and mode, the reply's transmit timestamp is the server's view of
//! "now". Timestamps count seconds from 1900 in 32 bits and wrap in 2036;
//! replies with the top bit clear are taken to be in the following era.

use kairos_hal::TimeSourceError;

/// UDP port of NTP servers
pub const NTP_PORT: u16 = 123;

/// Size of an NTP packet without extensions
pub const NTP_PACKET_SIZE: usize = 48;

/// Seconds between 1900-01-01 and 1970-01-01
pub const NTP_EPOCH_OFFSET: u64 = 2_208_988_800;

/// LI = 0, VN = 3, Mode = 3 (client)
const REQUEST_HEADER: u8 = 0x1B;

const MODE_SERVER: u8 = 4;
const MODE_BROADCAST: u8 = 5;

/// Offset of the transmit timestamp's seconds field
const TRANSMIT_OFFSET: usize = 40;

/// Errors decoding a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NtpError {
    /// Fewer than 48 bytes
    Truncated,
    /// Mode field is not server or broadcast
    UnexpectedMode(u8),
    /// Stratum 0: the server refuses to serve time
    KissOfDeath,
    /// Transmit timestamp not set
    Unsynchronized,
    /// Transmit timestamp earlier than 1970
    BeforeUnixEpoch,
}

impl From<NtpError> for TimeSourceError {
    fn from(_: NtpError) -> Self {
        TimeSourceError::InvalidResponse
    }
}

/// Build a client request
pub fn request_packet() -> [u8; NTP_PACKET_SIZE] {
    let mut packet = [0u8; NTP_PACKET_SIZE];
    packet[0] = REQUEST_HEADER;
    packet
}

/// Unix seconds from a server reply
pub fn parse_reply(packet: &[u8]) -> Result<u64, NtpError> {
    if packet.len() < NTP_PACKET_SIZE {
        return Err(NtpError::Truncated);
    }

    let mode = packet[0] & 0x07;
    if mode != MODE_SERVER && mode != MODE_BROADCAST {
        return Err(NtpError::UnexpectedMode(mode));
    }
    if packet[1] == 0 {
        return Err(NtpError::KissOfDeath);
    }

    let seconds = u32::from_be_bytes([
        packet[TRANSMIT_OFFSET],
        packet[TRANSMIT_OFFSET + 1],
        packet[TRANSMIT_OFFSET + 2],
        packet[TRANSMIT_OFFSET + 3],
    ]);
    if seconds == 0 {
        return Err(NtpError::Unsynchronized);
    }

    let ntp_seconds = if seconds & 0x8000_0000 == 0 {
        u64::from(seconds) + (1 << 32)
    } else {
        u64::from(seconds)
    };

    ntp_seconds
        .checked_sub(NTP_EPOCH_OFFSET)
        .ok_or(NtpError::BeforeUnixEpoch)
}
