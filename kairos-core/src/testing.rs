//! In-memory fakes of the HAL traits for host tests

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use kairos_hal::{
    MatrixError, MatrixSink, MonotonicClock, NetError, TcpServer, TimeSource, TimeSourceError,
    MATRIX_HEIGHT,
};

/// Monotonic clock whose delays advance time instantly
pub struct FakeClock {
    now: u64,
    pub delays: Vec<u32>,
}

impl FakeClock {
    pub fn new(now: u64) -> Self {
        Self {
            now,
            delays: Vec::new(),
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl MonotonicClock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.now += u64::from(ms);
    }
}

/// Time source replaying a fixed script; times out once exhausted
pub struct ScriptedTimeSource {
    script: VecDeque<Result<u64, TimeSourceError>>,
    calls: usize,
}

impl ScriptedTimeSource {
    pub fn new(script: &[Result<u64, TimeSourceError>]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            calls: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl TimeSource for ScriptedTimeSource {
    async fn fetch_utc(&mut self) -> Result<u64, TimeSourceError> {
        self.calls += 1;
        self.script
            .pop_front()
            .unwrap_or(Err(TimeSourceError::Timeout))
    }
}

/// Matrix sink recording every call
#[derive(Default)]
pub struct RecordingSink {
    pub intensities: Vec<u8>,
    pub frames: Vec<[u32; MATRIX_HEIGHT]>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn last_frame(&self) -> Option<&[u32; MATRIX_HEIGHT]> {
        self.frames.last()
    }
}

impl MatrixSink for RecordingSink {
    fn set_intensity(&mut self, level: u8) -> Result<(), MatrixError> {
        if self.fail {
            return Err(MatrixError::Bus);
        }
        self.intensities.push(level);
        Ok(())
    }

    fn present(&mut self, rows: &[u32; MATRIX_HEIGHT]) -> Result<(), MatrixError> {
        if self.fail {
            return Err(MatrixError::Bus);
        }
        self.frames.push(*rows);
        Ok(())
    }
}

/// One scripted peer
enum Peer {
    Request(Vec<u8>),
    ReadError(NetError),
}

/// TCP server replaying scripted connections
///
/// Accepts time out once the script is exhausted.
#[derive(Default)]
pub struct ScriptedServer {
    peers: VecDeque<Result<Peer, NetError>>,
    current: Option<Peer>,
    pending: Vec<u8>,
    pub responses: Vec<String>,
    pub accept_timeouts: Vec<u32>,
    pub read_timeouts: Vec<u32>,
    pub closes: usize,
    pub fail_writes: bool,
}

impl ScriptedServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(mut self, raw: &str) -> Self {
        self.peers.push_back(Ok(Peer::Request(raw.as_bytes().to_vec())));
        self
    }

    pub fn with_raw_request(mut self, raw: &[u8]) -> Self {
        self.peers.push_back(Ok(Peer::Request(raw.to_vec())));
        self
    }

    pub fn with_read_error(mut self, error: NetError) -> Self {
        self.peers.push_back(Ok(Peer::ReadError(error)));
        self
    }

    pub fn with_accept_error(mut self, error: NetError) -> Self {
        self.peers.push_back(Err(error));
        self
    }

    pub fn accept_calls(&self) -> usize {
        self.accept_timeouts.len()
    }

    pub fn last_response(&self) -> Option<&str> {
        self.responses.last().map(String::as_str)
    }
}

impl TcpServer for ScriptedServer {
    async fn accept(&mut self, timeout_ms: u32) -> Result<(), NetError> {
        self.accept_timeouts.push(timeout_ms);
        match self.peers.pop_front() {
            Some(Ok(peer)) => {
                self.current = Some(peer);
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Err(NetError::Timeout),
        }
    }

    async fn read(&mut self, buffer: &mut [u8], timeout_ms: u32) -> Result<usize, NetError> {
        self.read_timeouts.push(timeout_ms);
        match self.current.take() {
            Some(Peer::Request(data)) => {
                let n = data.len().min(buffer.len());
                buffer[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            Some(Peer::ReadError(e)) => Err(e),
            None => Err(NetError::InvalidState),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<(), NetError> {
        if self.fail_writes {
            return Err(NetError::ConnectionReset);
        }
        self.pending.extend_from_slice(data);
        Ok(())
    }

    async fn close(&mut self) {
        self.closes += 1;
        self.current = None;
        let body = core::mem::take(&mut self.pending);
        if !body.is_empty() {
            self.responses.push(String::from_utf8_lossy(&body).into_owned());
        }
    }
}
