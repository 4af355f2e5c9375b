use log;
use std;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::auto::{self, Alert};
use crate::board::{Board, BoardKind};
use crate::config::Config;
use crate::device::{self, Action, Command, PinState, Topics};
use crate::errors::{MausError, Result};
use crate::mqtt::{Broker, Message, QoS};

const POLL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(1);

/// The agent owns the broker connection, the board and the reporting state
pub struct Agent<B: Broker, D: Board> {
    broker: B,
    board: D,
    topics: Topics,
    alert_topic: String,
    alert: Alert,
    last_temperature: f64,
    last_pin: bool,
}

impl<B: Broker, D: Board> Agent<B, D> {
    pub fn new(broker: B, board: D, client_id: &str, alert_topic: &str) -> Self {
        Self {
            broker,
            board,
            topics: Topics::new(client_id),
            alert_topic: alert_topic.to_string(),
            alert: Alert::default(),
            last_temperature: 0.0,
            last_pin: false,
        }
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    pub fn board(&self) -> &D {
        &self.board
    }

    pub fn alert_active(&self) -> bool {
        self.alert.is_active()
    }

    /// Configure the pin, connect, announce the current state and subscribe to commands
    pub fn start(&mut self) -> Result<()> {
        self.board.configure_output()?;

        self.broker.connect()?;

        let temperature = self.board.cpu_temperature()?;
        self.publish_temperature(temperature)?;
        self.publish_pin()?;

        self.broker.subscribe(&self.topics.command_filter, QoS::AtLeastOnce)?;
        Ok(())
    }

    /// One iteration of the main loop
    pub fn poll(&mut self) -> Result<()> {
        if !self.broker.is_connected() {
            self.broker.reconnect()?;
            // Clean sessions lose their subscriptions
            self.broker.subscribe(&self.topics.command_filter, QoS::AtLeastOnce)?;
        }

        for message in self.broker.poll(POLL_TIMEOUT)? {
            // One failing command must not cost the rest of the batch
            if let Err(e) = self.handle_message(&message) {
                log::error!(
                    "Handling {} {} failed: {}",
                    message.topic,
                    message.payload,
                    e
                );
            }
        }

        self.check_and_report_status()
    }

    /// Dispatch an incoming command to its handler
    pub fn handle_message(&mut self, message: &Message) -> Result<()> {
        log::info!("Command received: {} {}", message.topic, message.payload);
        match self.topics.command_from_topic(&message.topic) {
            Command::CpuTemperature => match Action::parse(&message.payload) {
                Some(Action::Get) => {
                    let temperature = self.board.cpu_temperature()?;
                    self.publish_temperature(temperature)
                }
                _ => {
                    log::warn!("Unknown command: {} {}", message.topic, message.payload);
                    Ok(())
                }
            },
            Command::Pin => match Action::parse(&message.payload) {
                Some(Action::Get) => self.publish_pin(),
                Some(Action::Set(state)) => {
                    self.board.set_pin(state.into())?;
                    log::info!("{} GPIO pin set {}", device::PIN_NAME, state);
                    self.publish_pin()
                }
                None => {
                    log::warn!("Unknown command: {} {}", message.topic, message.payload);
                    Ok(())
                }
            },
            Command::Unknown(_) => {
                log::warn!("Unknown command: {} {}", message.topic, message.payload);
                Ok(())
            }
        }
    }

    /// Report significant changes and drive the high temperature alert
    pub fn check_and_report_status(&mut self) -> Result<()> {
        let temperature = self.board.cpu_temperature()?;
        if auto::temperature_changed(self.last_temperature, temperature) {
            self.publish_temperature(temperature)?;
        }

        let pin = self.board.pin()?;
        if pin != self.last_pin {
            self.publish_pin()?;
        }

        if let Some(change) = self.alert.update(temperature) {
            match change {
                auto::AlertChange::On => log::info!("High temperature alert enabled."),
                auto::AlertChange::Off => log::info!("High temperature alert disabled."),
            }
            self.broker
                .publish(&self.alert_topic, change.payload(), QoS::AtLeastOnce, false)?;
            log::info!("Command published: {} {}", self.alert_topic, change.payload());
        }
        Ok(())
    }

    fn publish_temperature(&mut self, temperature: f64) -> Result<()> {
        let payload = device::format_temperature(temperature);
        self.broker.publish(
            &self.topics.status_cpu_temperature,
            &payload,
            QoS::AtMostOnce,
            true,
        )?;
        log::info!(
            "Status published: {} {}",
            self.topics.status_cpu_temperature,
            payload
        );
        self.last_temperature = temperature;
        Ok(())
    }

    fn publish_pin(&mut self) -> Result<()> {
        let pin = self.board.pin()?;
        let state = PinState::from(pin);
        self.broker.publish(
            &self.topics.status_pin,
            state.as_str(),
            QoS::AtMostOnce,
            true,
        )?;
        log::info!("Status published: {} {}", self.topics.status_pin, state);
        self.last_pin = pin;
        Ok(())
    }

    /// Best-effort cleanup: every step runs, the first failure is returned
    pub fn shutdown(&mut self) -> Result<()> {
        let mut first_error: Option<MausError> = None;
        let mut record = |step: &str, result: Result<()>| {
            if let Err(e) = result {
                log::warn!("Shutdown step '{}' failed: {}", step, e);
                first_error.get_or_insert(e);
            }
        };

        record(
            "unsubscribe",
            self.broker.unsubscribe(&self.topics.command_filter),
        );
        record("pin low", self.board.set_pin(false));
        let temperature = self.board.cpu_temperature();
        record(
            "publish temperature",
            temperature.and_then(|t| self.publish_temperature(t)),
        );
        record("publish pin", self.publish_pin());
        record("disconnect", self.broker.disconnect());
        record("release board", self.board.release());

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Start, then poll until `stop` is raised, then shut down
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        self.start()?;

        while !stop.load(Ordering::Relaxed) {
            match self.poll() {
                Ok(()) => {}
                // The event loop itself is gone; nothing left to poll
                Err(e @ MausError::Connection(_)) => {
                    log::error!("{}", e);
                    break;
                }
                Err(e) => log::error!("Poll failed: {}", e),
            }
        }

        self.shutdown()
    }
}

/// run is the main entry point to start the maus
///
/// It builds the board and broker connection from the config, then blocks in the poll loop
/// until SIGINT or SIGTERM.
pub fn run(config: &Config) -> Result<()> {
    let stop = std::sync::Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        // A second signal kills the process, e.g. while still waiting for the broker
        signal_hook::flag::register_conditional_shutdown(signal, 1, std::sync::Arc::clone(&stop))?;
        signal_hook::flag::register(signal, std::sync::Arc::clone(&stop))?;
    }

    log::info!("Press CTRL-C to exit.");
    log::debug!("Client id {:?}, board {:?}", config.client_id, config.board);
    let broker = crate::mqtt::client::RumqttBroker::new(config);

    match config.board {
        BoardKind::Sysfs => {
            let board = crate::sysfs::SysfsBoard::new(&config.sysfs_path, config.gpio)?;
            log::info!("Running on {}", board.name());
            Agent::new(broker, board, &config.client_id, &config.alert_topic).run(&stop)
        }
        BoardKind::Dummy => {
            let board = crate::dummy::DummyBoard::new(config.dummy_temperature);
            log::info!("Running on {}", board.name());
            Agent::new(broker, board, &config.client_id, &config.alert_topic).run(&stop)
        }
    }
}
