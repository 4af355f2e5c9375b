#[derive(Debug)]
/// base error class
pub enum MausError {
    /// sysfs or other file system access failed
    Io(std::io::Error),
    /// a request could not be handed to the MQTT client
    Client(rumqttc::ClientError),
    /// the connection to the broker went away for good
    Connection(String),
    /// a sensor or pin file held something we could not parse
    Parse(String),
    /// the board does not provide what we need
    UnsupportedBoard(String),
    /// invalid configuration
    Config(String),
}

pub type Result<T> = std::result::Result<T, MausError>;

impl std::fmt::Display for MausError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MausError::Io(e) => write!(f, "MausError: I/O error: {}", e),
            MausError::Client(e) => write!(f, "MausError: MQTT client error: {}", e),
            MausError::Connection(message) => write!(f, "MausError: MQTT connection: {}", message),
            MausError::Parse(message) => write!(f, "MausError: could not parse {}", message),
            MausError::UnsupportedBoard(message) => {
                write!(f, "MausError: board is not supported: {}", message)
            }
            MausError::Config(message) => write!(f, "MausError: invalid config: {}", message),
        }
    }
}

impl std::error::Error for MausError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MausError::Io(e) => Some(e),
            MausError::Client(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MausError {
    fn from(e: std::io::Error) -> Self {
        MausError::Io(e)
    }
}

impl From<rumqttc::ClientError> for MausError {
    fn from(e: rumqttc::ClientError) -> Self {
        MausError::Client(e)
    }
}
