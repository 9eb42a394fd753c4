//! Single-pole low-pass filter for the accelerometer channels.
//!
//! Each accelerometer axis keeps its own smoothed value:
//! `smoothed = prior * alpha + raw * (1 - alpha)`.
//! A larger alpha keeps more of the history and smooths harder.

use crate::error::CoreError;
use crate::types::{Channel, Sensor};

pub const DEFAULT_ALPHA: f64 = 0.9;

/// Exponential moving average, one independent state per accelerometer axis.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    alpha: f64,
    /// Indexed by axis. Starts at zero.
    state: [f64; 3],
}

impl LowPassFilter {
    pub fn new(alpha: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&alpha),
            "low-pass alpha must be in [0.0, 1.0], got {}",
            alpha
        );
        Self {
            alpha,
            state: [0.0; 3],
        }
    }

    /// Feed one raw value for `channel` and return the new smoothed value.
    ///
    /// Gyroscope channels are rejected without touching any state.
    pub fn update(&mut self, channel: Channel, raw: f64) -> Result<f64, CoreError> {
        let slot = Self::slot(channel)?;
        Ok(self.step(slot, raw))
    }

    /// Filter all three accelerometer axes in X, Y, Z order.
    pub fn update_all(&mut self, raw: [f64; 3]) -> [f64; 3] {
        let mut smoothed = [0.0; 3];
        for (slot, value) in raw.into_iter().enumerate() {
            smoothed[slot] = self.step(slot, value);
        }
        smoothed
    }

    /// Last smoothed value for `channel`
    pub fn state(&self, channel: Channel) -> Result<f64, CoreError> {
        Ok(self.state[Self::slot(channel)?])
    }

    pub fn reset(&mut self) {
        self.state = [0.0; 3];
    }

    fn step(&mut self, slot: usize, raw: f64) -> f64 {
        let smoothed = self.state[slot] * self.alpha + raw * (1.0 - self.alpha);
        self.state[slot] = smoothed;
        smoothed
    }

    fn slot(channel: Channel) -> Result<usize, CoreError> {
        match channel.sensor() {
            Sensor::Accelerometer => Ok(channel.axis().index()),
            Sensor::Gyroscope => Err(CoreError::NotFilterable(channel)),
        }
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
