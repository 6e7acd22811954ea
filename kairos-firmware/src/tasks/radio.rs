//! CYW43 radio runner

use cyw43_pio::PioSpi;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::{DMA_CH0, PIO0};

/// Radio SPI bus as wired on the Pico W
pub type RadioSpi = PioSpi<'static, PIO0, 0, DMA_CH0>;

#[embassy_executor::task]
pub async fn cyw43_task(runner: cyw43::Runner<'static, Output<'static>, RadioSpi>) -> ! {
    runner.run().await
}
