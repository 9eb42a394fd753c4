pub mod channel;
pub mod events;
pub mod sample;
pub mod series;

pub use channel::{Axis, Channel, Sensor};
pub use events::PlotEvent;
pub use sample::{AccelerometerSample, GyroscopeSample, SamplePoint, SensorSample};
pub use series::{ResetGroup, Series, Variant};
