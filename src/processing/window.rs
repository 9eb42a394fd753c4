//! Rolling window bookkeeping for the nine plotted series.
//!
//! Every inbound sample advances a counter. Once the counter has handed out
//! `threshold` indices, the next sample wipes its whole reset group and starts
//! a new window at index 0. The wipe is a hard reset, never an eviction of the
//! oldest points.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::filter::LowPassFilter;
use crate::config::WindowConfig;
use crate::error::CoreError;
use crate::sink::PlotSink;
use crate::types::{Axis, PlotEvent, ResetGroup, SamplePoint, SensorSample, Series};

pub const DEFAULT_THRESHOLD: u64 = 300;

// Larger windows grow their logs on demand
const MAX_PREALLOCATED_POINTS: u64 = 4096;

/// How the two reset groups count their samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CounterMode {
    /// Each group counts only its own sensor's events
    #[default]
    Independent,
    /// One counter advanced by every event, whichever sensor produced it
    Shared,
}

#[derive(Debug, Clone, Copy, Default)]
struct WindowCounter {
    next_index: u64,
}

impl WindowCounter {
    /// Hands out the index for one event and reports whether that event
    /// opened a new window.
    fn advance(&mut self, threshold: u64) -> (u64, bool) {
        let wrapped = self.next_index >= threshold;
        if wrapped {
            self.next_index = 0;
        }
        let index = self.next_index;
        self.next_index += 1;
        (index, wrapped)
    }
}

/// Running totals since the session started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
    pub accelerometer_samples: u64,
    pub gyroscope_samples: u64,
    pub accelerometer_resets: u64,
    pub gyroscope_resets: u64,
}

impl WindowStats {
    pub fn total_samples(&self) -> u64 {
        self.accelerometer_samples + self.gyroscope_samples
    }
}

/// Owns the point logs and applies the append / group reset policy.
///
/// All mutation goes through `&mut self`, so a manager must live on a single
/// consumer thread. Readers on other threads should consume the emitted
/// [`PlotEvent`]s (see [`crate::sink::PlotMirror`]).
#[derive(Debug)]
pub struct WindowManager<S: PlotSink> {
    filter: LowPassFilter,
    threshold: u64,
    counter_mode: CounterMode,
    reset_filter_on_window: bool,
    counters: [WindowCounter; 2],
    logs: [Vec<SamplePoint>; Series::COUNT],
    stats: WindowStats,
    sink: S,
}

impl<S: PlotSink> WindowManager<S> {
    pub fn new(filter: LowPassFilter, config: &WindowConfig, sink: S) -> Self {
        debug_assert!(config.threshold > 0, "window threshold must be positive");
        let capacity = config.threshold.min(MAX_PREALLOCATED_POINTS) as usize;
        Self {
            filter,
            threshold: config.threshold,
            counter_mode: config.counter_mode,
            reset_filter_on_window: config.reset_filter_on_window,
            counters: [WindowCounter::default(); 2],
            logs: std::array::from_fn(|_| Vec::with_capacity(capacity)),
            stats: WindowStats::default(),
            sink,
        }
    }

    /// Default alpha, threshold and counter mode
    pub fn with_sink(sink: S) -> Self {
        Self::new(LowPassFilter::default(), &WindowConfig::default(), sink)
    }

    pub fn process(&mut self, sample: &SensorSample) {
        match sample {
            SensorSample::Accelerometer(s) => {
                self.on_accelerometer_sample(s.x, s.y, s.z);
            }
            SensorSample::Gyroscope(s) => self.on_gyroscope_sample(s.x, s.y, s.z),
        }
    }

    /// Records one accelerometer event in the raw and filtered series and
    /// returns the filtered values.
    pub fn on_accelerometer_sample(&mut self, x: f64, y: f64, z: f64) -> [f64; 3] {
        self.stats.accelerometer_samples += 1;
        let index = self.advance(ResetGroup::Accelerometer);

        let raw = [x, y, z];
        for axis in Axis::ALL {
            self.push_point(
                ResetGroup::Accelerometer.raw_series(axis),
                index,
                raw[axis.index()],
            );
        }

        let filtered = self.filter.update_all(raw);
        let filtered_series = [
            Series::AccelFilteredX,
            Series::AccelFilteredY,
            Series::AccelFilteredZ,
        ];
        for (series, value) in filtered_series.into_iter().zip(filtered) {
            self.push_point(series, index, value);
        }
        self.sink.flush();

        trace!(
            "accel #{} raw=({:.3}, {:.3}, {:.3}) filtered=({:.3}, {:.3}, {:.3})",
            index, x, y, z, filtered[0], filtered[1], filtered[2]
        );
        filtered
    }

    /// Records one gyroscope event in the raw gyroscope series.
    pub fn on_gyroscope_sample(&mut self, x: f64, y: f64, z: f64) {
        self.stats.gyroscope_samples += 1;
        let index = self.advance(ResetGroup::Gyroscope);

        let raw = [x, y, z];
        for axis in Axis::ALL {
            self.push_point(ResetGroup::Gyroscope.raw_series(axis), index, raw[axis.index()]);
        }
        self.sink.flush();

        trace!("gyro #{} raw=({:.3}, {:.3}, {:.3})", index, x, y, z);
    }

    pub fn append(&mut self, series: Series, index: u64, value: f64) {
        self.push_point(series, index, value);
        self.sink.flush();
    }

    /// Same as [`append`](Self::append) but resolves the series from its id.
    pub fn append_by_id(&mut self, id: &str, index: u64, value: f64) -> Result<(), CoreError> {
        let series: Series = id.parse()?;
        self.append(series, index, value);
        Ok(())
    }

    /// Clears every series of `group` and notifies the sink for each.
    pub fn reset_group(&mut self, group: ResetGroup) {
        self.clear_group(group);
        self.sink.flush();
    }

    pub fn points(&self, series: Series) -> &[SamplePoint] {
        &self.logs[series.index()]
    }

    pub fn snapshot(&self, series: Series) -> Vec<SamplePoint> {
        self.points(series).to_vec()
    }

    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn push_point(&mut self, series: Series, index: u64, value: f64) {
        let point = SamplePoint::new(index, value);
        self.logs[series.index()].push(point);
        self.sink.publish(PlotEvent::PointAppended { series, point });
    }

    fn clear_group(&mut self, group: ResetGroup) {
        for &series in group.series() {
            self.logs[series.index()].clear();
            self.sink.publish(PlotEvent::cleared(series));
        }

        match group {
            ResetGroup::Accelerometer => {
                self.stats.accelerometer_resets += 1;
                if self.reset_filter_on_window {
                    self.filter.reset();
                }
            }
            ResetGroup::Gyroscope => self.stats.gyroscope_resets += 1,
        }
    }

    fn advance(&mut self, group: ResetGroup) -> u64 {
        let slot = match (self.counter_mode, group) {
            (CounterMode::Shared, _) => 0,
            (CounterMode::Independent, ResetGroup::Accelerometer) => 0,
            (CounterMode::Independent, ResetGroup::Gyroscope) => 1,
        };

        let (index, wrapped) = self.counters[slot].advance(self.threshold);
        if wrapped {
            debug!(
                "{:?} window reached {} samples, clearing {} series",
                group,
                self.threshold,
                group.series().len()
            );
            self.clear_group(group);
        }
        index
    }
}
