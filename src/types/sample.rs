use serde::{Deserialize, Serialize};

use super::channel::Sensor;

/// One accelerometer reading in m/s²
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct AccelerometerSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Sensor timestamp in milliseconds, only used for logging
    #[serde(default)]
    pub timestamp: i64,
}

impl AccelerometerSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, timestamp: 0 }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// One gyroscope reading in rad/s
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct GyroscopeSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub timestamp: i64,
}

impl GyroscopeSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, timestamp: 0 }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Inbound event from the sensor-delivery side.
///
/// Serialized with a `sensor` tag, e.g.
/// `{"sensor":"gyroscope","x":0.1,"y":0.0,"z":-0.2,"timestamp":1700000000000}`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "sensor", rename_all = "lowercase")]
pub enum SensorSample {
    Accelerometer(AccelerometerSample),
    Gyroscope(GyroscopeSample),
}

impl SensorSample {
    pub fn sensor(&self) -> Sensor {
        match self {
            SensorSample::Accelerometer(_) => Sensor::Accelerometer,
            SensorSample::Gyroscope(_) => Sensor::Gyroscope,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            SensorSample::Accelerometer(sample) => sample.timestamp,
            SensorSample::Gyroscope(sample) => sample.timestamp,
        }
    }
}

impl From<AccelerometerSample> for SensorSample {
    fn from(sample: AccelerometerSample) -> Self {
        SensorSample::Accelerometer(sample)
    }
}

impl From<GyroscopeSample> for SensorSample {
    fn from(sample: GyroscopeSample) -> Self {
        SensorSample::Gyroscope(sample)
    }
}

/// A plotted point. `index` is the x-coordinate taken from the window counter.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    pub index: u64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(index: u64, value: f64) -> Self {
        Self { index, value }
    }
}
