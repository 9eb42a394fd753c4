use std::fmt;
use std::str::FromStr;

use super::channel::{Axis, Channel, Sensor};
use crate::error::CoreError;

/// Raw sensor values or low-pass filtered values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Raw,
    Filtered,
}

/// One plotted line: a channel plus its variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    AccelRawX,
    AccelRawY,
    AccelRawZ,
    AccelFilteredX,
    AccelFilteredY,
    AccelFilteredZ,
    GyroRawX,
    GyroRawY,
    GyroRawZ,
}

impl Series {
    pub const COUNT: usize = 9;

    /// Ordered by [`Series::index`]
    pub const ALL: [Series; Series::COUNT] = [
        Series::AccelRawX,
        Series::AccelRawY,
        Series::AccelRawZ,
        Series::AccelFilteredX,
        Series::AccelFilteredY,
        Series::AccelFilteredZ,
        Series::GyroRawX,
        Series::GyroRawY,
        Series::GyroRawZ,
    ];

    /// Looks up the series for a channel. Gyroscope channels only exist as raw.
    pub fn of(channel: Channel, variant: Variant) -> Option<Series> {
        let series = match (channel, variant) {
            (Channel::AccelX, Variant::Raw) => Series::AccelRawX,
            (Channel::AccelY, Variant::Raw) => Series::AccelRawY,
            (Channel::AccelZ, Variant::Raw) => Series::AccelRawZ,
            (Channel::AccelX, Variant::Filtered) => Series::AccelFilteredX,
            (Channel::AccelY, Variant::Filtered) => Series::AccelFilteredY,
            (Channel::AccelZ, Variant::Filtered) => Series::AccelFilteredZ,
            (Channel::GyroX, Variant::Raw) => Series::GyroRawX,
            (Channel::GyroY, Variant::Raw) => Series::GyroRawY,
            (Channel::GyroZ, Variant::Raw) => Series::GyroRawZ,
            (_, Variant::Filtered) => return None,
        };
        Some(series)
    }

    /// Position of this series in per-series tables
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn channel(self) -> Channel {
        match self {
            Series::AccelRawX | Series::AccelFilteredX => Channel::AccelX,
            Series::AccelRawY | Series::AccelFilteredY => Channel::AccelY,
            Series::AccelRawZ | Series::AccelFilteredZ => Channel::AccelZ,
            Series::GyroRawX => Channel::GyroX,
            Series::GyroRawY => Channel::GyroY,
            Series::GyroRawZ => Channel::GyroZ,
        }
    }

    pub fn variant(self) -> Variant {
        match self {
            Series::AccelFilteredX | Series::AccelFilteredY | Series::AccelFilteredZ => {
                Variant::Filtered
            }
            _ => Variant::Raw,
        }
    }

    pub fn group(self) -> ResetGroup {
        match self.channel().sensor() {
            Sensor::Accelerometer => ResetGroup::Accelerometer,
            Sensor::Gyroscope => ResetGroup::Gyroscope,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Series::AccelRawX => "accel_raw_x",
            Series::AccelRawY => "accel_raw_y",
            Series::AccelRawZ => "accel_raw_z",
            Series::AccelFilteredX => "accel_filtered_x",
            Series::AccelFilteredY => "accel_filtered_y",
            Series::AccelFilteredZ => "accel_filtered_z",
            Series::GyroRawX => "gyro_raw_x",
            Series::GyroRawY => "gyro_raw_y",
            Series::GyroRawZ => "gyro_raw_z",
        }
    }

    /// Chart title for the rendering side
    pub fn title(self) -> String {
        let axis = self.channel().axis().label();
        match (self.channel().sensor(), self.variant()) {
            (Sensor::Accelerometer, Variant::Raw) => format!("Raw Accelerometer {} Axis", axis),
            (Sensor::Accelerometer, Variant::Filtered) => {
                format!("Filtered Accelerometer {} Axis", axis)
            }
            (Sensor::Gyroscope, _) => format!("Gyroscope {} Axis", axis),
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Series {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Series::ALL
            .into_iter()
            .find(|series| series.id() == s)
            .ok_or_else(|| CoreError::UnknownSeries(s.to_string()))
    }
}

/// Series cleared together when their window fills up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetGroup {
    Accelerometer,
    Gyroscope,
}

impl ResetGroup {
    pub fn series(self) -> &'static [Series] {
        match self {
            ResetGroup::Accelerometer => &[
                Series::AccelRawX,
                Series::AccelRawY,
                Series::AccelRawZ,
                Series::AccelFilteredX,
                Series::AccelFilteredY,
                Series::AccelFilteredZ,
            ],
            ResetGroup::Gyroscope => &[Series::GyroRawX, Series::GyroRawY, Series::GyroRawZ],
        }
    }

    pub fn raw_series(self, axis: Axis) -> Series {
        let sensor = match self {
            ResetGroup::Accelerometer => Sensor::Accelerometer,
            ResetGroup::Gyroscope => Sensor::Gyroscope,
        };
        match Series::of(Channel::new(sensor, axis), Variant::Raw) {
            Some(series) => series,
            None => unreachable!("every channel has a raw series"),
        }
    }
}
