//! Compile-time constants
//!
//! Every interval the main loop waits on is listed here so the budget of
//! one tick can be read off a single file.

/// Seconds between scheduled NTP resynchronizations (12 h)
pub const SYNC_INTERVAL_SECS: u64 = 43_200;

/// Seconds to wait before retrying after a failed scheduled resync
pub const RESYNC_BACKOFF_SECS: u64 = 300;

/// NTP attempts per synchronization
pub const SYNC_RETRIES: u8 = 3;

/// Delay after each failed NTP attempt
pub const SYNC_RETRY_DELAY_MS: u32 = 2_000;

/// NTP reply timeout
pub const NTP_TIMEOUT_MS: u32 = 5_000;

/// NTP server pool
pub const NTP_HOST: &str = "gr.pool.ntp.org";

/// Separator blink half-period; toggles once this much time has passed
pub const BLINK_INTERVAL_MS: u64 = 500;

/// Accept timeout while idle
pub const ACCEPT_TIMEOUT_MS: u32 = 50;

/// End-of-tick sleep while idle
pub const TICK_SLEEP_MS: u32 = 50;

/// Read timeout for an accepted connection
pub const READ_TIMEOUT_MS: u32 = 1_000;

/// Delay between scroll frames
pub const SCROLL_SPEED_MS: u32 = 40;

/// Panel intensity before the first brightness tier is applied
pub const BOOT_BRIGHTNESS: u8 = 5;

/// Text scrolled once at boot
pub const BOOT_MESSAGE: &str = "HELLO";

/// UTC assumed until the first successful sync (2024-01-01T00:00:00Z)
pub const BOOT_EPOCH: u64 = 1_704_067_200;

/// TCP port of the control page
pub const HTTP_PORT: u16 = 80;

/// Bytes read from a request
pub const REQUEST_BUFFER_SIZE: usize = 1024;

/// Longest scrolled message, in bytes
pub const MAX_MESSAGE_LEN: usize = 128;
