//! Inkstat - E-paper Feed Monitor Firmware
//!
//! Main firmware binary for an RP2040 (Raspberry Pi Pico) driving a 2.9"
//! SSD1680 e-paper panel. Temperature and humidity come from a remote
//! feed service through a Wi-Fi bridge co-processor on UART0.
//!
//! Everything runs in one cooperative loop: connect, subscribe, then tick
//! the scheduler as fast as the executor allows.
//!
//! Wiring:
//! - UART0 (GP0 TX, GP1 RX, 115200 baud) to the bridge
//! - SPI0 (GP18 SCK, GP19 MOSI, GP17 CS), DC GP20, RST GP21, BUSY GP22 to the panel

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Instant};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use inkstat_core::clock::{Clock, Timestamp};
use inkstat_core::scheduler::{Activity, RenderOutcome, Scheduler, TickOutcome};
use inkstat_core::session::{subscribe_with_retry, wait_for_connection, BridgeSession};
use inkstat_core::state::ObservationState;
use inkstat_core::traits::RemoteSession;
use inkstat_display::{GraphicsSurface, Renderer};

mod config;
mod epd;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Panel SPI clock
const SPI_FREQUENCY_HZ: u32 = 4_000_000;

/// Free-running millisecond clock from the embassy time driver
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> Timestamp {
        // Truncation wraps like any millisecond counter
        Instant::now().as_millis() as Timestamp
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Inkstat firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = match config::monitor_config(epd::WIDTH, epd::HEIGHT) {
        Ok(config) => config,
        Err(e) => defmt::panic!("Invalid monitor configuration: {:?}", e),
    };
    info!(
        "Intervals: pump={}ms poll={}ms render={}ms",
        config.pump_interval_ms, config.poll_interval_ms, config.render_interval_ms
    );

    // E-paper panel on SPI0
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let spi = ExclusiveDevice::new(spi, cs, Delay).unwrap();
    let dc = Output::new(p.PIN_20, Level::Low);
    let rst = Output::new(p.PIN_21, Level::High);
    let busy = Input::new(p.PIN_22, Pull::None);

    let mut panel = epd::Ssd1680::new(spi, dc, rst, busy, Delay);
    match panel.init() {
        Ok(()) => info!("Panel initialized"),
        Err(e) => error!("Panel init failed: {:?}", e),
    }
    let mut display = Renderer::new(GraphicsSurface::new(panel), &config);

    // Bridge on UART0 (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let mut session = BridgeSession::new(uart);

    let mut delay = Delay;
    let attempts = wait_for_connection(
        &mut session,
        &mut delay,
        config.connect_retry_delay_ms,
        |attempt| {
            warn!("Not connected, attempt: {}", attempt.attempt);
            info!(
                "status: {} network: {} service: {}",
                attempt.status.as_str(),
                attempt.network.as_str(),
                attempt.service.as_str()
            );
            if let Some(e) = attempt.connect_error {
                warn!("Connect request failed: {:?}", e);
            }
        },
    );
    info!(
        "Connected: {} (after {} attempts)",
        session.status().as_str(),
        attempts
    );

    let failures = subscribe_with_retry(
        &mut session,
        &config,
        &mut delay,
        config.connect_retry_delay_ms,
        |attempt, e| warn!("Feed subscription failed (attempt {}): {:?}", attempt, e),
    );
    info!(
        "Subscribed to '{}' and '{}' (after {} failures)",
        config.temperature_feed.as_str(),
        config.humidity_feed.as_str(),
        failures
    );

    let clock = EmbassyClock;
    let mut observations = ObservationState::new(config.sentinel);
    let mut scheduler = Scheduler::new(&config);
    info!("Entering control loop");

    loop {
        let now = clock.now_ms();
        let outcome = scheduler.tick(now, &mut session, &mut observations, &mut display);
        if !outcome.is_idle() {
            log_outcome(&outcome, &observations, session.rx_errors());
        }
        yield_now().await;
    }
}

/// Log what a non-idle tick did
fn log_outcome(outcome: &TickOutcome, observations: &ObservationState, rx_errors: u32) {
    match outcome.pump {
        Activity::Idle => {}
        Activity::Fired => trace!("Pumped bridge (rx errors: {})", rx_errors),
        Activity::Failed(e) => warn!("Bridge pump failed: {:?}", e),
    }
    match outcome.poll {
        Activity::Idle => {}
        Activity::Fired => debug!("Requested feed values"),
        Activity::Failed(e) => warn!("Feed request failed: {:?}", e),
    }
    match outcome.render {
        RenderOutcome::NotDue => {}
        RenderOutcome::Suppressed => debug!("First tick, render deferred"),
        RenderOutcome::Skipped => debug!("Render due, nothing new"),
        RenderOutcome::Rendered => info!(
            "Rendered {} C / {} %",
            observations.last_temperature(),
            observations.last_humidity()
        ),
        RenderOutcome::NothingToShow => warn!("Render due, readings not formattable"),
        RenderOutcome::Failed(e) => warn!("Render failed: {:?}", e),
    }
}
