use std::io::Cursor;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::bounded;

use motion_plot::config::WindowConfig;
use motion_plot::processing::{run_sample_loop, spawn_sample_loop};
use motion_plot::replay::replay_from_reader;
use motion_plot::{
    AccelerometerSample, ChannelSink, CounterMode, GyroscopeSample, LowPassFilter, PlotEvent,
    PlotMirror, ResetGroup, SamplePoint, SensorSample, Series, WindowManager,
};

fn capture(accel: usize, gyro_every: usize) -> String {
    let mut lines = String::new();
    for i in 0..accel {
        lines.push_str(&format!(
            "{{\"sensor\":\"accelerometer\",\"x\":{},\"y\":0.5,\"z\":9.81,\"timestamp\":{}}}\n",
            i,
            1_700_000_000_000i64 + i as i64 * 20
        ));
        if gyro_every > 0 && i % gyro_every == 0 {
            lines.push_str("{\"sensor\":\"gyroscope\",\"x\":0.01,\"y\":-0.02,\"z\":0.03}\n");
        }
    }
    lines
}

#[test]
fn replayed_capture_reaches_the_mirror() {
    let (sample_sender, sample_receiver) = bounded(64);
    let (event_sender, event_receiver) = bounded(16_384);
    let shutdown = Arc::new(AtomicBool::new(false));

    let source_shutdown = Arc::clone(&shutdown);
    let source = thread::spawn(move || {
        replay_from_reader(
            Cursor::new(capture(650, 10)),
            Duration::ZERO,
            &sample_sender,
            &source_shutdown,
        )
    });

    let manager = WindowManager::with_sink(ChannelSink::new(event_sender));
    let processing = spawn_sample_loop(sample_receiver, manager, Arc::clone(&shutdown));

    let summary = source.join().unwrap().unwrap();
    assert_eq!(summary.sent, 650 + 65);

    let manager = processing.join().unwrap();
    assert_eq!(manager.sink().dropped(), 0);
    assert_eq!(manager.sink().stalls(), 0);
    let stats = manager.stats();
    assert_eq!(stats.accelerometer_samples, 650);
    assert_eq!(stats.gyroscope_samples, 65);
    // 650 accel samples = two full windows plus 50
    assert_eq!(stats.accelerometer_resets, 2);
    assert_eq!(stats.gyroscope_resets, 0);

    let expected: Vec<Vec<SamplePoint>> =
        Series::ALL.iter().map(|s| manager.snapshot(*s)).collect();
    drop(manager);

    let mirror = PlotMirror::new();
    let events: Vec<PlotEvent> = event_receiver.try_iter().flatten().collect();
    mirror.apply_batch(&events);

    for (series, points) in Series::ALL.iter().zip(expected) {
        assert_eq!(mirror.snapshot(*series), points, "{} diverged", series);
    }
    assert_eq!(mirror.len(Series::AccelRawX), 50);
    assert_eq!(mirror.latest(Series::AccelRawX), Some(SamplePoint::new(49, 649.0)));
    assert_eq!(mirror.len(Series::GyroRawZ), 65);
}

#[test]
fn slow_reader_converges_on_manager_logs() {
    let (event_sender, event_receiver) = bounded::<Vec<PlotEvent>>(4);
    let mirror = PlotMirror::new();

    let render_mirror = mirror.clone();
    let render = thread::spawn(move || {
        let mut batches = 0;
        for batch in event_receiver {
            // Fall behind the producer on every other batch
            if batches % 2 == 0 {
                thread::sleep(Duration::from_millis(1));
            }
            render_mirror.apply_batch(&batch);
            batches += 1;
        }
        batches
    });

    let config = WindowConfig {
        threshold: 3,
        counter_mode: CounterMode::Independent,
        reset_filter_on_window: false,
    };
    let mut manager =
        WindowManager::new(LowPassFilter::new(0.9), &config, ChannelSink::new(event_sender));
    for i in 0..20 {
        manager.process(&SensorSample::from(GyroscopeSample::new(i as f64, 0.0, 0.0)));
        manager.process(&SensorSample::from(AccelerometerSample::new(i as f64, 1.0, 2.0)));
    }

    assert_eq!(manager.sink().dropped(), 0);
    assert_eq!(manager.stats().gyroscope_resets, 6);
    let expected: Vec<Vec<SamplePoint>> =
        Series::ALL.iter().map(|s| manager.snapshot(*s)).collect();
    drop(manager);

    assert_eq!(render.join().unwrap(), 40);
    for (series, points) in Series::ALL.iter().zip(expected) {
        assert_eq!(mirror.snapshot(*series), points, "{} diverged", series);
    }
    assert_eq!(
        mirror.snapshot(Series::GyroRawX),
        vec![SamplePoint::new(0, 18.0), SamplePoint::new(1, 19.0)]
    );
}

#[test]
fn shared_counter_mode_replicates_coupled_windows() {
    let config = WindowConfig {
        threshold: 300,
        counter_mode: CounterMode::Shared,
        reset_filter_on_window: false,
    };
    let mut events = Vec::new();
    let mut manager = WindowManager::new(LowPassFilter::new(0.9), &config, &mut events);

    // Two gyro events for every accel event, 301 events in total
    for i in 0..301u64 {
        let sample: SensorSample = if i % 3 == 0 {
            SensorSample::from(AccelerometerSample::new(1.0, 1.0, 1.0))
        } else {
            SensorSample::from(GyroscopeSample::new(0.0, 0.0, 0.0))
        };
        manager.process(&sample);
    }

    // Event #301 (i = 300) is an accelerometer event, so the shared counter
    // overflows on the accelerometer side only.
    assert_eq!(manager.points(Series::AccelRawX), &[SamplePoint::new(0, 1.0)]);
    assert_eq!(manager.points(Series::GyroRawX).len(), 200);
    assert_eq!(manager.stats().accelerometer_resets, 1);
    assert_eq!(manager.stats().gyroscope_resets, 0);

    drop(manager);
    let cleared: Vec<Series> = events
        .iter()
        .filter(|e| e.is_clear())
        .map(|e| e.series())
        .collect();
    assert_eq!(cleared, ResetGroup::Accelerometer.series().to_vec());
}

#[test]
fn filtered_series_keep_smoothing_across_windows() {
    let (sender, receiver) = bounded(1024);
    for _ in 0..600 {
        sender.send(SensorSample::from(AccelerometerSample::new(2.0, 2.0, 2.0))).unwrap();
    }
    drop(sender);

    let mut manager = WindowManager::with_sink(Vec::<PlotEvent>::new());
    let shutdown = AtomicBool::new(false);
    assert_eq!(run_sample_loop(&receiver, &mut manager, &shutdown), 600);

    let filtered = manager.points(Series::AccelFilteredX);
    assert_eq!(filtered.len(), 300);
    assert_eq!(filtered[0].index, 0);
    // After 301 updates the smoothed value is essentially at the input already
    assert!((filtered[0].value - 2.0).abs() < 1e-9);
    assert!(filtered.iter().all(|p| p.value <= 2.0));
}
