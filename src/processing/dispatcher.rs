use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{info, trace};

use super::window::WindowManager;
use crate::sink::PlotSink;
use crate::types::SensorSample;
use crate::utils::format_timestamp;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Drains the sample queue into `manager`, one sample at a time in arrival
/// order. Returns once `shutdown` is set or every sender has hung up, with the
/// number of samples processed.
pub fn run_sample_loop<S: PlotSink>(
    sample_receiver: &Receiver<SensorSample>,
    manager: &mut WindowManager<S>,
    shutdown_signal: &AtomicBool,
) -> usize {
    info!("Sample processing loop started");
    let mut processed = 0;

    while !shutdown_signal.load(Ordering::Relaxed) {
        match sample_receiver.recv_timeout(POLL_INTERVAL) {
            Ok(sample) => {
                if sample.timestamp() != 0 {
                    trace!("{:?} sample at {}", sample.sensor(), format_timestamp(sample.timestamp()));
                }
                manager.process(&sample);
                processed += 1;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                info!("Sample channel disconnected, processing loop exiting");
                break;
            }
        }
    }

    let stats = manager.stats();
    info!(
        "Processed {} samples ({} accel, {} gyro), {} accel windows / {} gyro windows completed",
        processed,
        stats.accelerometer_samples,
        stats.gyroscope_samples,
        stats.accelerometer_resets,
        stats.gyroscope_resets
    );
    processed
}

/// Convenience wrapper for running the loop on its own thread with an owned
/// manager. Hands the manager back when the loop ends.
pub fn spawn_sample_loop<S>(
    sample_receiver: Receiver<SensorSample>,
    mut manager: WindowManager<S>,
    shutdown_signal: Arc<AtomicBool>,
) -> std::thread::JoinHandle<WindowManager<S>>
where
    S: PlotSink + Send + 'static,
{
    std::thread::spawn(move || {
        run_sample_loop(&sample_receiver, &mut manager, &shutdown_signal);
        manager
    })
}
