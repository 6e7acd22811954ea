//! Kairos - Wi-Fi LED Matrix Clock Firmware
//!
//! Main firmware binary for the Raspberry Pi Pico W driving a 32×8
//! MAX7219 matrix. Brings up the panel, the radio and the IP stack, then
//! hands every peripheral to the cooperative main loop in `kairos-core`.
//!
//! # Wiring
//!
//! | Signal       | Pin    |
//! |--------------|--------|
//! | MAX7219 CLK  | GPIO10 |
//! | MAX7219 DIN  | GPIO11 |
//! | MAX7219 CS   | GPIO13 |
//!
//! The CYW43 firmware and CLM blobs are not linked into the image; flash
//! them once to 0x10100000 and 0x10140000.

#![no_std]
#![no_main]

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, DhcpConfig, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::spi::{self, Spi};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kairos_core::config::{
    NetworkMode, BOOT_BRIGHTNESS, BOOT_EPOCH, HTTP_PORT, NTP_HOST, NTP_TIMEOUT_MS,
};
use kairos_core::display::DisplayController;
use kairos_core::scheduler::MainLoop;
use kairos_core::time::{SyncOutcome, TimeService};
use kairos_drivers::max7219::Max7219;
use kairos_hal::MonotonicClock;
use kairos_hal_rp2040::clock::EmbassyClock;
use kairos_hal_rp2040::flash::Rp2040FlashStorage;
use kairos_hal_rp2040::ntp::NtpTimeSource;
use kairos_hal_rp2040::tcp::HttpSocket;

use crate::config::ConfigPersistence;

mod config;
mod network;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// CYW43439 firmware image in XIP flash
const CYW43_FIRMWARE_ADDR: usize = 0x1010_0000;
const CYW43_FIRMWARE_LEN: usize = 230_321;

/// CYW43439 country locale matrix in XIP flash
const CYW43_CLM_ADDR: usize = 0x1014_0000;
const CYW43_CLM_LEN: usize = 4_752;

/// MAX7219 bus clock
const MATRIX_SPI_HZ: u32 = 10_000_000;

/// TCP buffers for the HTTP socket
const HTTP_BUFFER_SIZE: usize = 1536;

/// DHCP hostname
const HOSTNAME: &str = "kairos";

// Static cells for driver state (must live forever)
static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
static HTTP_RX: StaticCell<[u8; HTTP_BUFFER_SIZE]> = StaticCell::new();
static HTTP_TX: StaticCell<[u8; HTTP_BUFFER_SIZE]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Kairos clock starting...");

    let p = embassy_rp::init(Default::default());

    // Wi-Fi credentials
    let mut persistence = ConfigPersistence::new(Rp2040FlashStorage::new(p.FLASH, p.DMA_CH1));
    let network_config = persistence.load_or_provision().await;

    // Matrix panel
    let mut spi_config = spi::Config::default();
    spi_config.frequency = MATRIX_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let cs = Output::new(p.PIN_13, Level::High);
    let mut matrix = Max7219::new(ExclusiveDevice::new_no_delay(spi, cs).unwrap());
    if let Err(e) = matrix.init(BOOT_BRIGHTNESS) {
        warn!("Matrix init failed: {:?}", e);
    }

    // Radio
    let fw = flashed_blob(CYW43_FIRMWARE_ADDR, CYW43_FIRMWARE_LEN);
    let clm = flashed_blob(CYW43_CLM_ADDR, CYW43_CLM_LEN);

    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let radio_spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, radio_spi, fw).await;
    spawner.spawn(tasks::cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    // IP stack
    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname = heapless::String::try_from(HOSTNAME).ok();
    let mut rng = RoscRng;
    let seed = rng.next_u64();
    let (stack, runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(dhcp_config),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(tasks::net_task(runner)).unwrap();

    let mode = match &network_config {
        Some(config) => network::connect(&mut control, stack, config).await,
        None => {
            warn!("No Wi-Fi settings, running offline");
            NetworkMode::Offline
        }
    };

    let server = match mode {
        NetworkMode::Online => Some(HttpSocket::new(
            stack,
            HTTP_RX.init([0; HTTP_BUFFER_SIZE]),
            HTTP_TX.init([0; HTTP_BUFFER_SIZE]),
            HTTP_PORT,
        )),
        NetworkMode::Offline => None,
    };

    // Hand over to the main loop
    let clock = EmbassyClock;
    let time = TimeService::new(
        NtpTimeSource::new(stack, NTP_HOST, NTP_TIMEOUT_MS),
        BOOT_EPOCH,
        clock.now_ms(),
    );
    let mut main_loop = MainLoop::new(time, DisplayController::new(matrix), server, clock);

    match main_loop.boot().await {
        Some(SyncOutcome::Synced { epoch, .. }) => info!("Clock set to {}", epoch),
        Some(SyncOutcome::Failed { .. }) => warn!("Starting with unsynchronized clock"),
        None => info!("Offline mode"),
    }

    main_loop.run().await
}

/// Blob written to XIP flash outside this image
fn flashed_blob(addr: usize, len: usize) -> &'static [u8] {
    // SAFETY: XIP flash is mapped read-only for the whole program run and
    // nothing in this firmware writes below the settings partition.
    unsafe { core::slice::from_raw_parts(addr as *const u8, len) }
}
