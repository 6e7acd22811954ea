//! Network server abstraction
//!
//! The clock serves exactly one connection at a time from a single
//! listening socket, so the trait models the socket itself rather than a
//! listener handing out connection objects.

/// Errors from the TCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetError {
    /// No connection or data within the allotted time
    Timeout,
    /// Peer reset or closed the connection
    ConnectionReset,
    /// Socket is not in a state that allows the operation
    InvalidState,
}

/// Phase of the listening socket, as far as `accept` cares
///
/// The socket keeps listening between accept calls, so the network stack
/// may complete a handshake while the caller is busy elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketPhase {
    /// Closed, not listening
    Idle,
    /// Listening, no peer yet
    Listening,
    /// SYN received, handshake in progress
    Handshaking,
    /// Peer connected
    Connected,
    /// Peer connected and already sent its FIN; buffered data is readable
    PeerClosed,
    /// Tearing down a previous connection
    Closing,
}

/// What `accept` does next for a given [`SocketPhase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcceptStep {
    /// Start or keep listening and wait for a peer
    Listen,
    /// Poll again once the handshake settles
    Wait,
    /// A connection is ready to be served
    Accepted,
    /// Leftover connection; drop it before listening again
    Reset,
}

impl SocketPhase {
    pub fn accept_step(self) -> AcceptStep {
        match self {
            SocketPhase::Idle | SocketPhase::Listening => AcceptStep::Listen,
            SocketPhase::Handshaking => AcceptStep::Wait,
            SocketPhase::Connected | SocketPhase::PeerClosed => AcceptStep::Accepted,
            SocketPhase::Closing => AcceptStep::Reset,
        }
    }
}

/// Single-socket TCP server
///
/// Every operation that can wait on a peer takes an explicit timeout.
/// `accept` returns [`NetError::Timeout`] when nobody connected in time,
/// which is the common case and not a failure.
pub trait TcpServer {
    /// Wait up to `timeout_ms` for an incoming connection
    fn accept(&mut self, timeout_ms: u32)
        -> impl core::future::Future<Output = Result<(), NetError>>;

    /// Read once from the accepted connection
    ///
    /// Returns the number of bytes read; `0` means the peer sent nothing
    /// before closing.
    fn read(
        &mut self,
        buffer: &mut [u8],
        timeout_ms: u32,
    ) -> impl core::future::Future<Output = Result<usize, NetError>>;

    /// Write the whole buffer to the accepted connection
    fn write_all(&mut self, data: &[u8]) -> impl core::future::Future<Output = Result<(), NetError>>;

    /// Close the connection and make the socket ready for the next accept
    ///
    /// Must leave the socket reusable even when the peer misbehaves.
    fn close(&mut self) -> impl core::future::Future<Output = ()>;
}
