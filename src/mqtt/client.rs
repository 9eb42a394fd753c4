use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use dotenv::dotenv;
use log::{error, info, warn};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS, RecvTimeoutError};
use serde::de::DeserializeOwned;

use crate::config::{MqttConfig, MqttTopics};
use crate::error::SourceError;
use crate::types::{AccelerometerSample, GyroscopeSample, SensorSample};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Subscribes to the accelerometer and gyroscope topics and forwards every
/// valid sample into `sample_sender`.
///
/// `MQTT_HOST` / `MQTT_PORT` override the configured broker, `MQTT_USER` /
/// `MQTT_PASS` enable authentication. A `.env` file is honoured.
pub fn run_mqtt_client(
    config: &MqttConfig,
    sample_sender: Sender<SensorSample>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), SourceError> {
    dotenv().ok(); // 加载 .env 文件

    let mqtt_host = env::var("MQTT_HOST").unwrap_or_else(|_| config.broker.clone());
    let mqtt_port = match env::var("MQTT_PORT") {
        Ok(port) => port.parse::<u16>()?,
        Err(_) => config.port,
    };

    let mut mqtt_options = MqttOptions::new(config.client_id.clone(), mqtt_host.clone(), mqtt_port);
    mqtt_options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive)));

    if let (Ok(mqtt_user), Ok(mqtt_pass)) = (env::var("MQTT_USER"), env::var("MQTT_PASS")) {
        mqtt_options.set_credentials(mqtt_user, mqtt_pass);
    }

    let qos = qos_level(config.qos);
    let (client, mut connection) = Client::new(mqtt_options, 10);
    client.subscribe(config.topics.accelerometer.as_str(), qos)?;
    client.subscribe(config.topics.gyroscope.as_str(), qos)?;
    info!(
        "MQTT subscribed to {} and {} on {}:{}",
        config.topics.accelerometer, config.topics.gyroscope, mqtt_host, mqtt_port
    );

    loop {
        // 检查关闭信号
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT thread received shutdown signal, exiting gracefully");
            break;
        }

        let event = match connection.recv_timeout(POLL_INTERVAL) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                info!("MQTT event loop closed");
                break;
            }
        };

        match event {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                match decode_publish(&config.topics, &publish.topic, &publish.payload) {
                    Some(Ok(sample)) => {
                        if sample_sender.send(sample).is_err() {
                            // 通道断开表示处理线程已退出
                            info!("Sample channel disconnected, MQTT thread exiting");
                            break;
                        }
                    }
                    Some(Err(e)) => warn!("Invalid sensor data on {}: {}", publish.topic, e),
                    None => {}
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

/// Routes a publish to the sensor its topic belongs to. Returns `None` for
/// topics that are not sensor topics.
pub fn decode_publish(
    topics: &MqttTopics,
    topic: &str,
    payload: &[u8],
) -> Option<Result<SensorSample, SourceError>> {
    if topic == topics.accelerometer {
        Some(parse_payload::<AccelerometerSample>(payload).map(SensorSample::from))
    } else if topic == topics.gyroscope {
        Some(parse_payload::<GyroscopeSample>(payload).map(SensorSample::from))
    } else {
        None
    }
}

fn parse_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T, SourceError> {
    let payload_str = std::str::from_utf8(payload)
        .map_err(|e| SourceError::Payload(format!("Invalid UTF-8: {}", e)))?;

    serde_json::from_str::<T>(payload_str)
        .map_err(|e| SourceError::Payload(format!("JSON parsing error: {}", e)))
}

fn qos_level(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    }
}
