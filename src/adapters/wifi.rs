//! WiFi station adapter (ESP-IDF).
//!
//! Implements [`StationPort`] over `EspWifi`. The got-IP and disconnect
//! events flip a shared connected flag; the supervisor polls it from the
//! foreground.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::warn;

use crate::config::WifiConfig;
use crate::error::WifiError;
use crate::net::StationPort;

pub struct EspStationPort {
    wifi: BlockingWifi<EspWifi<'static>>,
    connected: Arc<AtomicBool>,
}

impl EspStationPort {
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>, _sysloop: EspSystemEventLoop) -> Self {
        Self {
            wifi,
            connected: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl StationPort for EspStationPort {
    fn configure(&mut self, config: &WifiConfig) -> Result<(), WifiError> {
        let client = ClientConfiguration {
            ssid: config.ssid.as_str().try_into().map_err(|_| WifiError::ConfigureFailed)?,
            password: config
                .password
                .as_str()
                .try_into()
                .map_err(|_| WifiError::ConfigureFailed)?,
            ..ClientConfiguration::default()
        };

        self.wifi
            .set_configuration(&Configuration::Client(client))
            .map_err(|_| WifiError::ConfigureFailed)?;
        self.wifi.start().map_err(|_| WifiError::ConfigureFailed)?;
        self.wifi.connect().map_err(|_| WifiError::ConfigureFailed)?;
        self.connected.store(true, Ordering::Release);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn reconnect(&mut self) -> Result<(), WifiError> {
        self.wifi.connect().map_err(|_| WifiError::ReconnectFailed)
    }

    fn enable_link_local(&mut self) -> bool {
        // Link-local IPv6 is created by the netif glue on ESP-IDF 5.x.
        true
    }

    fn interface_up(&self) -> bool {
        self.wifi.wifi().sta_netif().is_up().unwrap_or(false)
    }

    fn rssi(&self) -> i8 {
        use esp_idf_svc::sys::*;
        let mut ap_info: wifi_ap_record_t = unsafe { core::mem::zeroed() };
        let ret = unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) };
        if ret == ESP_OK { ap_info.rssi } else { 0 }
    }

    fn disconnect(&mut self) {
        if let Err(e) = self.wifi.disconnect() {
            warn!("could not disconnect WiFi: {:?}", e);
        }
    }

    fn stop(&mut self) {
        if let Err(e) = self.wifi.stop() {
            warn!("could not stop WiFi: {:?}", e);
        }
    }

    fn deinit(&mut self) {
        self.connected.store(false, Ordering::Release);
    }
}
