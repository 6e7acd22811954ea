//! Single-socket HTTP listener over embassy-net
//!
//! One `TcpSocket` is reused for every connection. A timed-out accept
//! leaves it listening, and the stack keeps completing handshakes while
//! the loop renders or sleeps, so `accept` first looks at where the socket
//! already is. A served connection is closed, flushed briefly and aborted
//! so the socket is back in `Closed` before the next accept.

use embassy_net::tcp::{AcceptError, State, TcpSocket};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};
use kairos_hal::{AcceptStep, NetError, SocketPhase, TcpServer};

/// Upper bound for pushing a response out
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound for draining the send buffer on close
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_millis(500);

/// Poll period while a handshake is in flight
const HANDSHAKE_POLL: Duration = Duration::from_millis(5);

/// Idle timeout applied to accepted connections
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpSocket {
    socket: TcpSocket<'static>,
    port: u16,
}

impl HttpSocket {
    pub fn new(
        stack: Stack<'static>,
        rx_buffer: &'static mut [u8],
        tx_buffer: &'static mut [u8],
        port: u16,
    ) -> Self {
        Self {
            socket: TcpSocket::new(stack, rx_buffer, tx_buffer),
            port,
        }
    }
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}

fn phase(state: State) -> SocketPhase {
    match state {
        State::Closed => SocketPhase::Idle,
        State::Listen => SocketPhase::Listening,
        State::SynSent | State::SynReceived => SocketPhase::Handshaking,
        State::Established => SocketPhase::Connected,
        State::CloseWait => SocketPhase::PeerClosed,
        State::FinWait1
        | State::FinWait2
        | State::Closing
        | State::LastAck
        | State::TimeWait => SocketPhase::Closing,
    }
}

impl HttpSocket {
    /// Resolve once a peer is connected, listening if nobody is yet
    async fn next_connection(&mut self) -> Result<(), NetError> {
        loop {
            match phase(self.socket.state()).accept_step() {
                AcceptStep::Accepted => return Ok(()),
                AcceptStep::Wait => Timer::after(HANDSHAKE_POLL).await,
                AcceptStep::Reset => {
                    self.socket.abort();
                    Timer::after(HANDSHAKE_POLL).await;
                }
                AcceptStep::Listen => {
                    return match self.socket.accept(self.port).await {
                        Ok(()) => Ok(()),
                        Err(AcceptError::ConnectionReset) => Err(NetError::ConnectionReset),
                        Err(_) => {
                            self.socket.abort();
                            Err(NetError::InvalidState)
                        }
                    };
                }
            }
        }
    }
}

impl TcpServer for HttpSocket {
    async fn accept(&mut self, timeout_ms: u32) -> Result<(), NetError> {
        match with_timeout(millis(timeout_ms), self.next_connection()).await {
            Ok(Ok(())) => {
                self.socket.set_timeout(Some(CONNECTION_TIMEOUT));
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(NetError::Timeout),
        }
    }

    async fn read(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<usize, NetError> {
        match with_timeout(millis(timeout_ms), self.socket.read(buffer)).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(_)) => Err(NetError::ConnectionReset),
            Err(_) => Err(NetError::Timeout),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), NetError> {
        let mut rest = data;
        while !rest.is_empty() {
            match with_timeout(WRITE_TIMEOUT, self.socket.write(rest)).await {
                Ok(Ok(0)) | Ok(Err(_)) => return Err(NetError::ConnectionReset),
                Ok(Ok(n)) => rest = &rest[n..],
                Err(_) => return Err(NetError::Timeout),
            }
        }
        Ok(())
    }

    async fn close(&mut self) {
        self.socket.close();
        let _ = with_timeout(CLOSE_FLUSH_TIMEOUT, self.socket.flush()).await;
        self.socket.abort();
        self.socket.set_timeout(None);
    }
}
