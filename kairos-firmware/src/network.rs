//! Wi-Fi association and addressing
//!
//! A failed join or a DHCP lease that never arrives puts the clock in
//! offline mode for the rest of the boot session.

use cyw43::{Control, JoinOptions};
use defmt::*;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};

use kairos_core::config::{NetworkConfig, NetworkMode};

/// Join attempts before giving up
pub const JOIN_ATTEMPTS: u8 = 20;

/// Pause between join attempts
pub const JOIN_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Upper bound for obtaining a DHCP lease
pub const DHCP_TIMEOUT: Duration = Duration::from_secs(20);

/// Join the configured network and wait for an address
pub async fn connect(
    control: &mut Control<'static>,
    stack: Stack<'static>,
    config: &NetworkConfig,
) -> NetworkMode {
    info!("Connecting to {}", config.ssid.as_str());

    for attempt in 1..=JOIN_ATTEMPTS {
        let options = if config.password.is_empty() {
            JoinOptions::new_open()
        } else {
            JoinOptions::new(config.password.as_bytes())
        };

        match control.join(config.ssid.as_str(), options).await {
            Ok(()) => {
                info!("Joined on attempt {}", attempt);
                return wait_for_address(stack).await;
            }
            Err(_) => {
                debug!("Join attempt {}/{} failed", attempt, JOIN_ATTEMPTS);
                Timer::after(JOIN_RETRY_DELAY).await;
            }
        }
    }

    warn!("Wi-Fi unavailable after {} attempts, running offline", JOIN_ATTEMPTS);
    NetworkMode::Offline
}

async fn wait_for_address(stack: Stack<'static>) -> NetworkMode {
    if with_timeout(DHCP_TIMEOUT, stack.wait_config_up()).await.is_err() {
        warn!("No DHCP lease, running offline");
        return NetworkMode::Offline;
    }
    if let Some(config) = stack.config_v4() {
        info!("Web UI at http://{}/", config.address.address());
    }
    NetworkMode::Online
}
