pub mod client;
#[cfg(test)]
pub mod fake;

pub use rumqttc::QoS;

use crate::errors::Result;

/// Incoming message, payload decoded as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: String,
}

impl Message {
    pub fn new(topic: &str, payload: &str) -> Self {
        Self {
            topic: topic.to_string(),
            payload: payload.to_string(),
        }
    }
}

/// The MQTT capability the agent needs from a client library
pub trait Broker {
    /// Block until the broker accepted the connection, retrying at a fixed interval
    fn connect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Same as `connect`, after the connection got lost
    fn reconnect(&mut self) -> Result<()> {
        self.connect()
    }

    fn publish(&mut self, topic: &str, payload: &str, qos: QoS, retain: bool) -> Result<()>;

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<()>;

    fn unsubscribe(&mut self, topic: &str) -> Result<()>;

    /// Collect the messages that arrive within `timeout`
    fn poll(&mut self, timeout: std::time::Duration) -> Result<Vec<Message>>;

    fn disconnect(&mut self) -> Result<()>;
}
