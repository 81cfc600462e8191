//! SingleWire Firmware — Main Entry Point
//!
//! Wires the debug transport to UART0 and brings the WiFi station up:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  UART ISR thread ──▶ Receiver ──▶ WireSlots (shared pool)  │
//! │                                       │                    │
//! │  tick loop:  Transfer.step() ── DebugService.step()        │
//! │              WifiStation.step()                            │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use singlewire::adapters::uart::UartLink;
use singlewire::adapters::wifi::EspStationPort;
use singlewire::config::{DebugConfig, WifiConfig};
use singlewire::debug::{DebugService, ReplyWriter};
use singlewire::net::WifiStation;
use singlewire::tree::ProcessTree;
use singlewire::wire::{Receiver, Transfer, WireSlots};

/// Shared buffer pool; one per firmware image.
static SLOTS: WireSlots = WireSlots::new();

/// Placeholder supervision tree until the scheduler hooks in.
struct BootTree;

impl ProcessTree for BootTree {
    fn render(&self, out: &mut ReplyWriter<'_>, _detailed: bool, _colored: bool) {
        let _ = core::fmt::Write::write_str(out, "App\n  SingleWireTransfer\n  WifiStation\n");
    }
}

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("singlewire v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;

    // ── UART0 to the host scheduler ───────────────────────────
    let uart_cfg = UartConfig::default().baudrate(Hertz(115_200));
    let uart = UartDriver::new(
        peripherals.uart0,
        peripherals.pins.gpio1,
        peripherals.pins.gpio3,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        &uart_cfg,
    )?;

    let (uart_tx, uart_rx) = uart.split();
    let link: &'static UartLink = Box::leak(Box::new(UartLink::new(uart_tx, &SLOTS)));

    // RX pump thread stands in for the receive interrupt.
    std::thread::spawn(move || {
        let mut rx = Receiver::new(&SLOTS);
        singlewire::adapters::uart::pump_rx(&uart_rx, &mut rx);
    });

    // ── Protocol state machines ───────────────────────────────
    let debug_cfg = DebugConfig::default();
    let tree = BootTree;

    let mut transfer = Transfer::new(&SLOTS, link, debug_cfg.synced_transfer);
    let mut service = DebugService::new(&SLOTS, link, &tree, &debug_cfg);

    // ── WiFi station ──────────────────────────────────────────
    let wifi_cfg = WifiConfig::default();
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), None)?;
    let wifi = BlockingWifi::wrap(esp_wifi, sysloop.clone())?;
    let mut station = WifiStation::new(EspStationPort::new(wifi, sysloop), wifi_cfg);

    info!("System ready. Entering tick loop.");

    loop {
        let now_ms = (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1000) as u32;

        transfer.step()?;
        service.step()?;
        station.step(now_ms)?;

        std::thread::sleep(std::time::Duration::from_millis(1));
    }
}
