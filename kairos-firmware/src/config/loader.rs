//! Configuration persistence
//!
//! Loads Wi-Fi credentials from flash storage. When nothing is stored,
//! credentials baked in at build time (`KAIROS_WIFI_SSID`,
//! `KAIROS_WIFI_PASSWORD`) are used and written back to flash.

use defmt::*;

use kairos_core::config::{NetworkConfig, NETWORK_CONFIG_MAX_SIZE};
use kairos_hal_rp2040::flash::{FlashError, Rp2040FlashStorage, StorageKey};
// Import the FlashStorage trait to bring methods into scope
use kairos_hal_rp2040::FlashStorageTrait;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Stored bytes are not a valid record
    Deserialize,
    /// Record does not fit the encode buffer
    Serialize,
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Network settings persistence manager
pub struct ConfigPersistence<'d> {
    storage: Rp2040FlashStorage<'d>,
}

impl<'d> ConfigPersistence<'d> {
    pub fn new(storage: Rp2040FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Load the stored network settings
    pub async fn load(&mut self) -> Result<NetworkConfig, ConfigError> {
        let mut buffer = [0u8; NETWORK_CONFIG_MAX_SIZE];
        let len = self
            .storage
            .read(StorageKey::NetworkConfig, &mut buffer)
            .await?;

        debug!("Read {} bytes of network config from flash", len);

        NetworkConfig::decode(&buffer[..len]).map_err(|_| ConfigError::Deserialize)
    }

    /// Store network settings, replacing any previous record
    pub async fn save(&mut self, config: &NetworkConfig) -> Result<(), ConfigError> {
        let mut buffer = [0u8; NETWORK_CONFIG_MAX_SIZE];
        let encoded = config.encode(&mut buffer).map_err(|_| ConfigError::Serialize)?;
        self.storage
            .write(StorageKey::NetworkConfig, encoded)
            .await?;
        Ok(())
    }

    /// Stored settings, else build-time settings, else `None` (offline)
    pub async fn load_or_provision(&mut self) -> Option<NetworkConfig> {
        match self.load().await {
            Ok(config) if config.is_usable() => {
                info!("Loaded Wi-Fi settings for {}", config.ssid.as_str());
                return Some(config);
            }
            Ok(_) => warn!("Stored Wi-Fi settings have no SSID"),
            Err(ConfigError::Flash(FlashError::NotFound)) => debug!("No Wi-Fi settings in flash"),
            Err(e) => warn!("Failed to load Wi-Fi settings: {:?}", e),
        }

        let config = build_time_config()?;
        info!("Using build-time Wi-Fi settings for {}", config.ssid.as_str());
        if let Err(e) = self.save(&config).await {
            warn!("Failed to persist Wi-Fi settings: {:?}", e);
        }
        Some(config)
    }
}

fn build_time_config() -> Option<NetworkConfig> {
    let ssid = option_env!("KAIROS_WIFI_SSID")?;
    let password = option_env!("KAIROS_WIFI_PASSWORD").unwrap_or("");
    NetworkConfig::new(ssid, password).filter(NetworkConfig::is_usable)
}
