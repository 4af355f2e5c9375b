/// device holds the topic layout of the board and maps incoming topics to commands
use regex;

pub const PIN_NAME: &str = "D5";
pub const CPU_TEMPERATURE_NAME: &str = "cpu_temperature";

const TOPIC_PATTERN: &str = r"^(?P<client_id>[^/]+)/command/(?P<name>.+)$";

/// Logical pin value, as exchanged over MQTT
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinState {
    High,
    Low,
}

impl PinState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinState::High => "high",
            PinState::Low => "low",
        }
    }
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        match value {
            true => PinState::High,
            false => PinState::Low,
        }
    }
}

impl From<PinState> for bool {
    fn from(state: PinState) -> Self {
        state == PinState::High
    }
}

impl std::fmt::Display for PinState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action requested in a command payload
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Get,
    Set(PinState),
}

impl Action {
    /// Parse a raw payload; `None` for anything unknown
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "get" => Some(Action::Get),
            "high" => Some(Action::Set(PinState::High)),
            "low" => Some(Action::Set(PinState::Low)),
            _ => None,
        }
    }
}

/// Command topic an incoming message was addressed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CpuTemperature,
    Pin,
    Unknown(String),
}

/// All topics for one client id
#[derive(Debug, Clone)]
pub struct Topics {
    client_id: String,
    pattern: regex::Regex,
    pub command_filter: String,
    pub status_cpu_temperature: String,
    pub status_pin: String,
}

impl Topics {
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            // Fixed pattern, always compiles
            pattern: regex::Regex::new(TOPIC_PATTERN).unwrap(),
            command_filter: format!("{}/command/#", client_id),
            status_cpu_temperature: format!("{}/status/{}", client_id, CPU_TEMPERATURE_NAME),
            status_pin: format!("{}/status/{}", client_id, PIN_NAME),
        }
    }

    /// Determine the command from an incoming topic
    pub fn command_from_topic(&self, topic: &str) -> Command {
        if let Some(captures) = self.pattern.captures(topic) {
            if let (Some(client_id), Some(name)) = (captures.name("client_id"), captures.name("name"))
            {
                if client_id.as_str() == self.client_id {
                    return match name.as_str() {
                        CPU_TEMPERATURE_NAME => Command::CpuTemperature,
                        PIN_NAME => Command::Pin,
                        other => Command::Unknown(other.to_string()),
                    };
                }
            }
        }
        Command::Unknown(topic.to_string())
    }
}

/// Status payload for a temperature reading
pub fn format_temperature(temperature: f64) -> String {
    format!("{:.1}", temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_for_client() {
        let topics = Topics::new("RaspberryPi");
        assert_eq!(topics.command_filter, "RaspberryPi/command/#");
        assert_eq!(topics.status_cpu_temperature, "RaspberryPi/status/cpu_temperature");
        assert_eq!(topics.status_pin, "RaspberryPi/status/D5");
    }

    #[test]
    fn test_command_from_topic() {
        let topics = Topics::new("pi");
        assert_eq!(
            topics.command_from_topic("pi/command/cpu_temperature"),
            Command::CpuTemperature
        );
        assert_eq!(topics.command_from_topic("pi/command/D5"), Command::Pin);
        assert_eq!(
            topics.command_from_topic("pi/command/D6"),
            Command::Unknown("D6".to_string())
        );
        assert_eq!(
            topics.command_from_topic("other/command/D5"),
            Command::Unknown("other/command/D5".to_string())
        );
        assert_eq!(
            topics.command_from_topic("pi/status/D5"),
            Command::Unknown("pi/status/D5".to_string())
        );
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(Action::parse("get"), Some(Action::Get));
        assert_eq!(Action::parse("high"), Some(Action::Set(PinState::High)));
        assert_eq!(Action::parse("low"), Some(Action::Set(PinState::Low)));
        assert_eq!(Action::parse("HIGH"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(50.0), "50.0");
        assert_eq!(format_temperature(47.236), "47.2");
        assert_eq!(PinState::from(true).to_string(), "high");
        assert_eq!(PinState::from(false).to_string(), "low");
    }
}
