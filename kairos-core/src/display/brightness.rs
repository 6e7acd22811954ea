//! Time-of-day brightness tiers

/// First hour of full daytime brightness
pub const DAY_START_HOUR: u8 = 7;

/// First hour of the dimmed evening tier
pub const EVENING_START_HOUR: u8 = 19;

/// First hour of the night tier
pub const NIGHT_START_HOUR: u8 = 22;

/// Panel brightness tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Brightness {
    Low,
    Medium,
    High,
}

impl Brightness {
    /// Tier for a local hour (0-23)
    pub fn for_hour(hour: u8) -> Self {
        match hour {
            h if (DAY_START_HOUR..EVENING_START_HOUR).contains(&h) => Brightness::High,
            h if (EVENING_START_HOUR..NIGHT_START_HOUR).contains(&h) => Brightness::Medium,
            _ => Brightness::Low,
        }
    }

    /// MAX7219 intensity register value
    pub fn intensity(self) -> u8 {
        match self {
            Brightness::High => 7,
            Brightness::Medium => 4,
            Brightness::Low => 2,
        }
    }
}
