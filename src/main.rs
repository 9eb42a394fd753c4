use std::env;
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{error, info, warn};

use motion_plot::config::{AppConfig, SourceKind};
use motion_plot::processing::spawn_sample_loop;
use motion_plot::{
    logger, mqtt, replay, ChannelSink, LowPassFilter, PlotEvent, PlotMirror, SensorSample, Series,
    WindowManager,
};

const STATUS_INTERVAL: Duration = Duration::from_secs(5);

fn main() {
    logger::init_logger();
    info!("Application starting");

    let config_path = env::var("MOTION_PLOT_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = match AppConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path, e);
            std::process::exit(1);
        }
    };
    info!(
        "alpha={} threshold={} counter_mode={:?} source={:?}",
        config.filter.alpha, config.window.threshold, config.window.counter_mode, config.source.kind
    );

    let (sample_sender, sample_receiver) = bounded(config.channels.sample_channel_capacity);
    let (event_sender, event_receiver) = bounded(config.channels.event_channel_capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    spawn_ctrl_c_watcher(Arc::clone(&shutdown_signal));

    let source_handle = spawn_source(&config, sample_sender, Arc::clone(&shutdown_signal));

    let manager = WindowManager::new(
        LowPassFilter::new(config.filter.alpha),
        &config.window,
        ChannelSink::new(event_sender),
    );
    let processing_handle =
        spawn_sample_loop(sample_receiver, manager, Arc::clone(&shutdown_signal));

    // 渲染端线程：把事件应用到镜像
    let mirror = PlotMirror::new();
    let render_mirror = mirror.clone();
    let render_handle = thread::spawn(move || run_render_loop(&event_receiver, &render_mirror));

    match processing_handle.join() {
        Ok(manager) => {
            let stats = manager.stats();
            let sink = manager.sink();
            info!(
                "Processing finished: {} samples, render side stalled {} times, {} plot events dropped",
                stats.total_samples(),
                sink.stalls(),
                sink.dropped()
            );
            // 释放 sink，渲染线程随之退出
            drop(manager);
        }
        Err(e) => error!("Processing thread panicked: {:?}", e),
    }

    shutdown_signal.store(true, Ordering::Relaxed);
    if source_handle.join().is_err() {
        error!("Source thread panicked");
    }
    match render_handle.join() {
        Ok(applied) => info!("Render side applied {} plot events", applied),
        Err(e) => error!("Render thread panicked: {:?}", e),
    }

    log_series_summary(&mirror);
}

/// Sets `shutdown_signal` on Ctrl-C so every thread winds down and the
/// summary still gets logged.
fn spawn_ctrl_c_watcher(shutdown_signal: Arc<AtomicBool>) {
    thread::spawn(move || wait_for_shutdown(tokio::signal::ctrl_c(), &shutdown_signal));
}

fn wait_for_shutdown<F>(signal: F, shutdown_signal: &AtomicBool)
where
    F: Future<Output = io::Result<()>>,
{
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            warn!("Ctrl-C handler unavailable: {}", e);
            return;
        }
    };

    match runtime.block_on(signal) {
        Ok(()) => {
            info!("Ctrl-C received, shutting down");
            shutdown_signal.store(true, Ordering::Relaxed);
        }
        Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
    }
}

fn spawn_source(
    config: &AppConfig,
    sample_sender: Sender<SensorSample>,
    shutdown_signal: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    let kind = config.source.kind;
    let replay_path = config.get_replay_path();
    let interval = Duration::from_millis(config.source.replay_interval_ms);
    let mqtt_config = config.mqtt.clone();

    thread::spawn(move || match kind {
        SourceKind::Mqtt => {
            if let Err(e) = mqtt::run_mqtt_client(&mqtt_config, sample_sender, shutdown_signal) {
                error!("MQTT thread failed: {}", e);
            }
        }
        SourceKind::Replay => {
            if let Err(e) =
                replay::run_replay(&replay_path, interval, &sample_sender, &shutdown_signal)
            {
                error!("Replay failed: {}", e);
            }
        }
    })
}

/// Applies plot event batches until the producer side goes away. Whatever is
/// already queued is applied under a single write lock.
fn run_render_loop(event_receiver: &Receiver<Vec<PlotEvent>>, mirror: &PlotMirror) -> usize {
    let mut applied = 0;
    let mut batches = Vec::new();
    let mut last_status = Instant::now();

    loop {
        match event_receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(batch) => {
                batches.push(batch);
                batches.extend(event_receiver.try_iter());
                applied += mirror.apply_batch(batches.iter().flatten());
                batches.clear();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if last_status.elapsed() >= STATUS_INTERVAL {
            info!(
                "accel window {} points, gyro window {} points",
                mirror.len(Series::AccelRawX),
                mirror.len(Series::GyroRawX)
            );
            last_status = Instant::now();
        }
    }

    applied
}

fn log_series_summary(mirror: &PlotMirror) {
    for series in Series::ALL {
        match mirror.latest(series) {
            Some(point) => info!(
                "{:<32} {:>4} points, latest #{} = {:.4}",
                series.title(),
                mirror.len(series),
                point.index,
                point.value
            ),
            None => info!("{:<32} empty", series.title()),
        }
    }
}
