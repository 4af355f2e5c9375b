/// client drives the rumqttc synchronous client from the agent's single thread
use log;
use rumqttc::{Event, MqttOptions, Outgoing, Packet, QoS, RecvTimeoutError};
use std;

use crate::config::Config;
use crate::errors::{MausError, Result};
use crate::mqtt::{Broker, Message};

const CHANNEL_CAPACITY: usize = 64;
const RETRY_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);
const DISCONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

pub struct RumqttBroker {
    client: rumqttc::Client,
    connection: rumqttc::Connection,
    broker: String,
    connected: bool,
}

impl RumqttBroker {
    pub fn new(config: &Config) -> Self {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.mqtt_host.clone(),
            config.mqtt_port,
        );
        options
            .set_keep_alive(std::time::Duration::from_secs(config.keep_alive))
            .set_clean_session(true);
        if let Some(username) = &config.mqtt_username {
            options.set_credentials(
                username.clone(),
                config.mqtt_password.clone().unwrap_or_default(),
            );
        }

        let (client, connection) = rumqttc::Client::new(options, CHANNEL_CAPACITY);
        Self {
            client,
            connection,
            broker: format!("{}:{}", config.mqtt_host, config.mqtt_port),
            connected: false,
        }
    }
}

impl Broker for RumqttBroker {
    fn connect(&mut self) -> Result<()> {
        log::info!("Connecting to MQTT broker {} ...", self.broker);
        loop {
            // rumqttc reconnects by itself on the next poll after an error
            match self.connection.recv() {
                Ok(Ok(Event::Incoming(Packet::ConnAck(connack)))) => {
                    log::info!(
                        "Broker connected: {} (session present: {})",
                        self.broker,
                        connack.session_present
                    );
                    self.connected = true;
                    return Ok(());
                }
                Ok(Ok(event)) => log::trace!("Event while connecting {:?}", event),
                Ok(Err(e)) => {
                    log::debug!("Connecting to {} failed: {}", self.broker, e);
                    std::thread::sleep(RETRY_INTERVAL);
                }
                Err(_) => {
                    return Err(MausError::Connection("event loop is gone".to_string()));
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &str, qos: QoS, retain: bool) -> Result<()> {
        self.client
            .try_publish(topic, qos, retain, payload.as_bytes().to_vec())?;
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<()> {
        self.client.try_subscribe(topic, qos)?;
        log::info!("Subscribed to topic: {}", topic);
        Ok(())
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<()> {
        self.client.try_unsubscribe(topic)?;
        log::info!("Unsubscribed from topic: {}", topic);
        Ok(())
    }

    fn poll(&mut self, timeout: std::time::Duration) -> Result<Vec<Message>> {
        let deadline = std::time::Instant::now() + timeout;
        let mut messages = std::vec::Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.connection.recv_timeout(remaining) {
                Ok(Ok(Event::Incoming(Packet::Publish(publish)))) => {
                    let payload = String::from_utf8_lossy(&publish.payload).into_owned();
                    messages.push(Message {
                        topic: publish.topic,
                        payload,
                    });
                }
                Ok(Ok(Event::Incoming(Packet::Disconnect))) => {
                    log::warn!("Broker disconnected: {}", self.broker);
                    self.connected = false;
                    break;
                }
                Ok(Ok(event)) => log::trace!("Event {:?}", event),
                Ok(Err(e)) => {
                    log::warn!("Broker disconnected: {} ({})", self.broker, e);
                    self.connected = false;
                    break;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(MausError::Connection("event loop is gone".to_string()));
                }
            }
        }

        Ok(messages)
    }

    fn disconnect(&mut self) -> Result<()> {
        self.client.disconnect()?;

        // Drive the event loop until the queued requests and the disconnect went out
        let deadline = std::time::Instant::now() + DISCONNECT_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                log::warn!("Timed out flushing requests to {}", self.broker);
                break;
            }
            match self.connection.recv_timeout(remaining) {
                Ok(Ok(Event::Outgoing(Outgoing::Disconnect))) => break,
                Ok(Ok(event)) => log::trace!("Event while disconnecting {:?}", event),
                Ok(Err(_)) | Err(_) => break,
            }
        }

        self.connected = false;
        log::info!("Broker disconnected: {}", self.broker);
        Ok(())
    }
}
