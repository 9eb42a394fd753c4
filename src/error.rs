use crate::types::Channel;

/// Misuse faults raised by the processing core.
///
/// These indicate a programming error on the caller's side; the core never
/// mutates state before returning one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("channel {0} has no low-pass filter (only accelerometer channels are filtered)")]
    NotFilterable(Channel),
    #[error("unknown series id: {0}")]
    UnknownSeries(String),
    #[error("unknown channel id: {0}")]
    UnknownChannel(String),
}

/// Errors raised by the sensor-delivery sources (MQTT, replay files).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid MQTT port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),
    #[error("MQTT connection error: {0}")]
    Connection(#[from] rumqttc::ConnectionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid payload: {0}")]
    Payload(String),
}
