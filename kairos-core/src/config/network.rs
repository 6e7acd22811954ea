//! Persisted network settings

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Largest postcard encoding of a [`NetworkConfig`]
///
/// Two varint length prefixes plus the string bodies.
pub const NETWORK_CONFIG_MAX_SIZE: usize = MAX_SSID_LEN + MAX_PASSWORD_LEN + 2;

/// Whether the device reached the network at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkMode {
    /// Associated and addressed; sync and HTTP are active
    Online,
    /// No credentials or association failed; local clock only
    Offline,
}

/// Wi-Fi credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkConfig {
    /// Network name
    pub ssid: String<MAX_SSID_LEN>,
    /// WPA2 passphrase; empty for open networks
    pub password: String<MAX_PASSWORD_LEN>,
}

impl NetworkConfig {
    /// Build from borrowed strings, `None` if either is too long
    pub fn new(ssid: &str, password: &str) -> Option<Self> {
        Some(Self {
            ssid: String::try_from(ssid).ok()?,
            password: String::try_from(password).ok()?,
        })
    }

    /// A config is usable once it names a network
    pub fn is_usable(&self) -> bool {
        !self.ssid.is_empty()
    }
}

#[cfg(feature = "serde")]
impl NetworkConfig {
    /// Encode as postcard into `buffer`, returning the used prefix
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], postcard::Error> {
        postcard::to_slice(self, buffer)
    }

    /// Decode a postcard record
    pub fn decode(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_oversized_fields() {
        let long = "x".repeat(MAX_SSID_LEN + 1);
        assert!(NetworkConfig::new(&long, "secret").is_none());
        assert!(NetworkConfig::new("home", &"p".repeat(MAX_PASSWORD_LEN + 1)).is_none());
    }

    #[test]
    fn test_usable_requires_ssid() {
        assert!(!NetworkConfig::default().is_usable());
        assert!(NetworkConfig::new("home", "").unwrap().is_usable());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_fits_max_size() {
        let config = NetworkConfig::new(
            &"s".repeat(MAX_SSID_LEN),
            &"p".repeat(MAX_PASSWORD_LEN),
        )
        .unwrap();
        let mut buf = [0u8; NETWORK_CONFIG_MAX_SIZE];
        let used = config.encode(&mut buf).unwrap();
        assert_eq!(NetworkConfig::decode(used).unwrap(), config);

        let mut small = [0u8; 8];
        assert!(config.encode(&mut small).is_err());
        assert!(NetworkConfig::decode(&[0xFF]).is_err());
    }
}
