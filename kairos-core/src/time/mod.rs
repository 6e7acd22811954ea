//! Time keeping
//!
//! UTC is anchored to the monotonic clock at the moment of the last NTP
//! reply; local time is derived from it on demand and never stored.

pub mod calendar;
pub mod local;
pub mod service;

pub use calendar::Weekday;
pub use local::{is_summer_time, last_sunday, local_time, utc_offset_hours, LocalTime};
pub use service::{SyncOutcome, TimeService};
