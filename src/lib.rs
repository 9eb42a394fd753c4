//! Real-time motion sensor plotting core.
//!
//! Accelerometer and gyroscope samples come in one at a time; each one is
//! appended to its raw series, accelerometer samples additionally go through
//! a low-pass filter into the filtered series, and every series group is
//! wiped once its window is full. The results leave the core as
//! [`PlotEvent`]s for whatever draws the charts.

pub mod config;
pub mod error;
pub mod logger;
pub mod mqtt;
pub mod processing;
pub mod replay;
pub mod sink;
pub mod types;
pub mod utils;

pub use config::{AppConfig, ConfigError};
pub use error::{CoreError, SourceError};
pub use processing::{CounterMode, LowPassFilter, WindowManager, WindowStats};
pub use sink::{ChannelSink, PlotMirror, PlotSink};
pub use types::{
    AccelerometerSample, Channel, GyroscopeSample, PlotEvent, ResetGroup, SamplePoint,
    SensorSample, Series,
};
