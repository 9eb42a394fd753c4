use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Physical sensor producing a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    Accelerometer,
    Gyroscope,
}

/// Axis of a 3-axis sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// One physical sensor axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::AccelX,
        Channel::AccelY,
        Channel::AccelZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
    ];

    pub const ACCELEROMETER: [Channel; 3] = [Channel::AccelX, Channel::AccelY, Channel::AccelZ];
    pub const GYROSCOPE: [Channel; 3] = [Channel::GyroX, Channel::GyroY, Channel::GyroZ];

    pub fn new(sensor: Sensor, axis: Axis) -> Self {
        match (sensor, axis) {
            (Sensor::Accelerometer, Axis::X) => Channel::AccelX,
            (Sensor::Accelerometer, Axis::Y) => Channel::AccelY,
            (Sensor::Accelerometer, Axis::Z) => Channel::AccelZ,
            (Sensor::Gyroscope, Axis::X) => Channel::GyroX,
            (Sensor::Gyroscope, Axis::Y) => Channel::GyroY,
            (Sensor::Gyroscope, Axis::Z) => Channel::GyroZ,
        }
    }

    pub fn sensor(self) -> Sensor {
        match self {
            Channel::AccelX | Channel::AccelY | Channel::AccelZ => Sensor::Accelerometer,
            Channel::GyroX | Channel::GyroY | Channel::GyroZ => Sensor::Gyroscope,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Channel::AccelX | Channel::GyroX => Axis::X,
            Channel::AccelY | Channel::GyroY => Axis::Y,
            Channel::AccelZ | Channel::GyroZ => Axis::Z,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Channel::AccelX => "accel_x",
            Channel::AccelY => "accel_y",
            Channel::AccelZ => "accel_z",
            Channel::GyroX => "gyro_x",
            Channel::GyroY => "gyro_y",
            Channel::GyroZ => "gyro_z",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.id() == s)
            .ok_or_else(|| CoreError::UnknownChannel(s.to_string()))
    }
}
