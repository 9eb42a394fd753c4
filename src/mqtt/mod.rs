pub mod client;

pub use client::{decode_publish, run_mqtt_client};
