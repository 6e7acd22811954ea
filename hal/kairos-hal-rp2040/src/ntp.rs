//! NTP time source over embassy-net
//!
//! Each fetch resolves the server name, sends one SNTP request from an
//! ephemeral UDP port and waits a bounded time for the reply. Socket
//! buffers live on the stack for the duration of the fetch.

use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Stack};
use embassy_time::{with_timeout, Duration};
use kairos_drivers::ntp::{self, NTP_PACKET_SIZE, NTP_PORT};
use kairos_hal::{TimeSource, TimeSourceError};

/// UDP payload buffer, one packet with headroom
const UDP_BUFFER_SIZE: usize = 64;

pub struct NtpTimeSource {
    stack: Stack<'static>,
    host: &'static str,
    timeout: Duration,
}

impl NtpTimeSource {
    /// Query `host` with replies awaited for at most `timeout_ms`
    pub fn new(stack: Stack<'static>, host: &'static str, timeout_ms: u32) -> Self {
        Self {
            stack,
            host,
            timeout: Duration::from_millis(u64::from(timeout_ms)),
        }
    }
}

impl TimeSource for NtpTimeSource {
    async fn fetch_utc(&mut self) -> Result<u64, TimeSourceError> {
        if !self.stack.is_config_up() {
            return Err(TimeSourceError::NotConnected);
        }

        let addresses = self
            .stack
            .dns_query(self.host, DnsQueryType::A)
            .await
            .map_err(|_| TimeSourceError::Dns)?;
        let server = *addresses.first().ok_or(TimeSourceError::Dns)?;

        let mut rx_meta = [PacketMetadata::EMPTY; 1];
        let mut rx_buffer = [0u8; UDP_BUFFER_SIZE];
        let mut tx_meta = [PacketMetadata::EMPTY; 1];
        let mut tx_buffer = [0u8; UDP_BUFFER_SIZE];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| TimeSourceError::Socket)?;

        socket
            .send_to(&ntp::request_packet(), IpEndpoint::new(server, NTP_PORT))
            .await
            .map_err(|_| TimeSourceError::Socket)?;

        let mut reply = [0u8; NTP_PACKET_SIZE];
        let (len, _) = with_timeout(self.timeout, socket.recv_from(&mut reply))
            .await
            .map_err(|_| TimeSourceError::Timeout)?
            .map_err(|_| TimeSourceError::Socket)?;

        Ok(ntp::parse_reply(&reply[..len])?)
    }
}
