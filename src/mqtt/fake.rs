/// fake is an in-memory broker recording what the agent sends, for tests
use crate::errors::{MausError, Result};
use crate::mqtt::{Broker, Message, QoS};

#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
    pub qos: QoS,
    pub retain: bool,
}

#[derive(Debug, Default)]
pub struct RecordingBroker {
    pub connected: bool,
    pub connects: usize,
    pub published: Vec<Published>,
    pub subscriptions: Vec<(String, QoS)>,
    pub unsubscriptions: Vec<String>,
    pub disconnects: usize,
    /// Each poll hands out the next batch
    pub inbox: std::collections::VecDeque<Vec<Message>>,
    pub fail_unsubscribe: bool,
}

impl RecordingBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliver(&mut self, messages: Vec<Message>) {
        self.inbox.push_back(messages);
    }

    /// Publishes on a topic, in order
    pub fn payloads(&self, topic: &str) -> Vec<String> {
        self.published
            .iter()
            .filter(|p| p.topic == topic)
            .map(|p| p.payload.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.published.clear();
        self.subscriptions.clear();
        self.unsubscriptions.clear();
    }
}

impl Broker for RecordingBroker {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        self.connects += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &str, qos: QoS, retain: bool) -> Result<()> {
        self.published.push(Published {
            topic: topic.to_string(),
            payload: payload.to_string(),
            qos,
            retain,
        });
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<()> {
        self.subscriptions.push((topic.to_string(), qos));
        Ok(())
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<()> {
        if self.fail_unsubscribe {
            return Err(MausError::Connection("unsubscribe refused".to_string()));
        }
        self.unsubscriptions.push(topic.to_string());
        Ok(())
    }

    fn poll(&mut self, _timeout: std::time::Duration) -> Result<Vec<Message>> {
        Ok(self.inbox.pop_front().unwrap_or_default())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        self.disconnects += 1;
        Ok(())
    }
}
