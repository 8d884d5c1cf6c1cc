//! Swell firmware — main entry point.
//!
//! Hexagonal architecture, tick-driven execution:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  LedcLight      SprayRelay     DfPlayerAudio   RtcClock      │
//! │  (LightPort)    (SprayPort)    (AudioPort)     (ClockPort)   │
//! │  NvsSettings    LogEventSink   WsBroadcaster                 │
//! │  (SettingsPort) (EventSink)    (EventSink)                   │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │             AppService (pure logic)                    │  │
//! │  │  phase · aroma cycle · music · alarm                   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! One logical thread of control: the WebSocket handler only enqueues raw
//! message text; the main loop drains the queue (each command runs to
//! completion, persisting and reconciling) before every 1 Hz tick.

#![deny(unused_must_use)]

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::http::server::{ws::EspHttpWsDetachedSender, Configuration, EspHttpServer};
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, EspWifi};
use esp_idf_svc::ws::FrameType;

use swell::adapters::audio::DfPlayerAudio;
use swell::adapters::hardware::Hardware;
use swell::adapters::light::LedcLight;
use swell::adapters::log_sink::LogEventSink;
use swell::adapters::nvs::NvsSettings;
use swell::adapters::spray::SprayRelay;
use swell::adapters::time::RtcClock;
use swell::app::commands::Command;
use swell::app::events::AppEvent;
use swell::app::ports::{ClockPort, EventSink, SettingsPort};
use swell::app::service::AppService;
use swell::config::UserSettings;

const WIFI_SSID: &str = "hosssposs";
const WIFI_PASSWORD: &str = "semogalancarTA";

/// Status push cadence when nothing changes.
const BROADCAST_INTERVAL_MS: u64 = 60_000;
/// Longest inbound WebSocket message we accept.
const MAX_WS_MESSAGE: usize = 256;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("=== SWELL SMART LAMP v{} ===", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── Settings (NVS, defaults on first boot) ────────────────
    let store = NvsSettings::new(nvs_partition.clone())
        .map_err(|e| anyhow::anyhow!("NVS init failed: {e}"))?;
    let settings = match store.load() {
        Ok(s) => {
            info!("settings loaded from NVS");
            s
        }
        Err(e) => {
            info!("no stored settings ({e}), using defaults");
            UserSettings::default()
        }
    };

    // ── Actuators ─────────────────────────────────────────────
    let ledc_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(swell::pins::LED_PWM_FREQ_HZ.Hz())
            .resolution(Resolution::Bits8),
    )?;
    let white = LedcDriver::new(peripherals.ledc.channel0, &ledc_timer, peripherals.pins.gpio12)?;
    let yellow = LedcDriver::new(peripherals.ledc.channel1, &ledc_timer, peripherals.pins.gpio14)?;

    let relay_pin = PinDriver::output(peripherals.pins.gpio4)?;

    let uart = UartDriver::new(
        peripherals.uart2,
        peripherals.pins.gpio17, // lamp TX -> player RX
        peripherals.pins.gpio16, // lamp RX <- player TX
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        &UartConfig::new().baudrate(9_600.Hz()),
    )?;

    let mut hw = Hardware {
        light: LedcLight::new(white, yellow),
        spray: SprayRelay::new(relay_pin),
        audio: DfPlayerAudio::new(uart, settings.music.volume),
    };

    // ── Clock (DS3231) ────────────────────────────────────────
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(100_u32.kHz().into()),
    )?;
    let mut clock = RtcClock::new(i2c);
    match clock.wall_time() {
        Ok(t) => info!("RTC reads {t}"),
        Err(e) => warn!("RTC unreadable at boot ({e}); scheduling idles until it recovers"),
    }

    // ── WiFi ──────────────────────────────────────────────────
    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?,
        sysloop,
    )?;
    wifi.set_configuration(&esp_idf_svc::wifi::Configuration::Client(
        ClientConfiguration {
            ssid: WIFI_SSID.try_into().unwrap_or_default(),
            password: WIFI_PASSWORD.try_into().unwrap_or_default(),
            auth_method: AuthMethod::WPA2Personal,
            ..Default::default()
        },
    ))?;
    wifi.start()?;
    wifi.connect()?;
    wifi.wait_netif_up()?;
    info!("WiFi up: {:?}", wifi.wifi().sta_netif().get_ip_info()?);

    // ── WebSocket command path ────────────────────────────────
    //
    // The handler is a thin funnel: raw frames go into the channel, the
    // main loop does all parsing and state changes.  Replies fan out
    // through detached senders held by the broadcaster.
    let (cmd_tx, cmd_rx) = mpsc::channel::<String>();
    let senders: Arc<Mutex<Vec<EspHttpWsDetachedSender>>> = Arc::new(Mutex::new(Vec::new()));

    let mut server = EspHttpServer::new(&Configuration::default())?;
    {
        let senders = senders.clone();
        server.ws_handler("/ws", move |ws| -> Result<(), esp_idf_svc::sys::EspError> {
            if ws.is_new() {
                info!("ws client connected");
                if let Ok(detached) = ws.create_detached_sender() {
                    if let Ok(mut list) = senders.lock() {
                        list.push(detached);
                    }
                }
                return Ok(());
            }
            if ws.is_closed() {
                info!("ws client disconnected");
                return Ok(());
            }

            let mut buf = [0u8; MAX_WS_MESSAGE];
            let (_frame, len) = ws.recv(&mut buf)?;
            if let Ok(text) = core::str::from_utf8(&buf[..len.min(MAX_WS_MESSAGE)]) {
                let _ = cmd_tx.send(text.trim_end_matches('\0').to_owned());
            }
            Ok(())
        })?;
    }
    info!("web server started, ws endpoint /ws");

    // ── Service + sinks ───────────────────────────────────────
    let mut sink = FanoutSink {
        log: LogEventSink::new(),
        ws: WsBroadcaster { senders },
    };
    let mut service = AppService::new(settings);
    service.start(&mut sink);

    // ── Main loop: drain commands, reconcile, broadcast ───────
    let mut last_broadcast_ms = clock.uptime_ms();
    loop {
        while let Ok(raw) = cmd_rx.try_recv() {
            match Command::parse(&raw) {
                Some(cmd) => service.handle_command(cmd, &mut clock, &mut hw, &store, &mut sink),
                None => log::debug!("dropped malformed message"),
            }
        }

        service.tick(&mut clock, &mut hw, &mut sink);

        let now_ms = clock.uptime_ms();
        if now_ms.saturating_sub(last_broadcast_ms) >= BROADCAST_INTERVAL_MS {
            service.broadcast(&mut sink);
            last_broadcast_ms = now_ms;
        }

        esp_idf_hal::delay::FreeRtos::delay_ms(1_000);
    }
}

// ── Event fan-out ─────────────────────────────────────────────

/// Forwards every event to the serial log and the WebSocket clients.
struct FanoutSink {
    log: LogEventSink,
    ws: WsBroadcaster,
}

impl EventSink for FanoutSink {
    fn emit(&mut self, event: &AppEvent) {
        self.log.emit(event);
        self.ws.emit(event);
    }
}

/// Serializes events to the frontend wire format and pushes them to every
/// connected client, pruning the ones that went away.
struct WsBroadcaster {
    senders: Arc<Mutex<Vec<EspHttpWsDetachedSender>>>,
}

impl WsBroadcaster {
    fn send_all(&mut self, text: &str) {
        let Ok(mut list) = self.senders.lock() else {
            return;
        };
        list.retain_mut(|sender| {
            if sender.is_closed() {
                return false;
            }
            sender.send(FrameType::Text(false), text.as_bytes()).is_ok()
        });
    }
}

impl EventSink for WsBroadcaster {
    fn emit(&mut self, event: &AppEvent) {
        let payload = match event {
            AppEvent::Status(snapshot) => serde_json::json!({
                "type": "statusUpdate",
                "state": snapshot,
            }),
            AppEvent::Playlist(tracks) => serde_json::json!({
                "type": "playlist",
                "playlist": tracks
                    .iter()
                    .map(|t| serde_json::json!({
                        "trackNumber": t.number,
                        "title": t.title,
                        "filename": t.filename,
                    }))
                    .collect::<Vec<_>>(),
            }),
            // Phase edges and startup are log-only events.
            AppEvent::PhaseChanged { .. } | AppEvent::Started(_) => return,
        };
        match serde_json::to_string(&payload) {
            Ok(text) => self.send_all(&text),
            Err(e) => warn!("status serialization failed: {e}"),
        }
    }
}
