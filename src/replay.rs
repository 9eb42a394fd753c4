//! Offline sensor source: replays a JSON-lines capture into the sample queue.
//!
//! One sample per line, tagged by sensor:
//! `{"sensor":"accelerometer","x":0.12,"y":-0.03,"z":9.79,"timestamp":1700000000000}`

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{info, warn};

use crate::error::SourceError;
use crate::types::SensorSample;

/// Outcome of one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub sent: usize,
    pub skipped: usize,
}

/// Parses one line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<SensorSample>, SourceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<SensorSample>(trimmed)
        .map(Some)
        .map_err(|e| SourceError::Payload(format!("JSON parsing error: {}", e)))
}

pub fn run_replay<P: AsRef<Path>>(
    path: P,
    interval: Duration,
    sample_sender: &Sender<SensorSample>,
    shutdown_signal: &AtomicBool,
) -> Result<ReplaySummary, SourceError> {
    let file = File::open(path.as_ref())?;
    info!("Replaying samples from {}", path.as_ref().display());
    replay_from_reader(BufReader::new(file), interval, sample_sender, shutdown_signal)
}

/// Sends every valid line to `sample_sender`, sleeping `interval` between
/// samples. Malformed lines are logged and skipped.
pub fn replay_from_reader<R: BufRead>(
    reader: R,
    interval: Duration,
    sample_sender: &Sender<SensorSample>,
    shutdown_signal: &AtomicBool,
) -> Result<ReplaySummary, SourceError> {
    let mut summary = ReplaySummary::default();

    for (line_no, line) in reader.lines().enumerate() {
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("Replay received shutdown signal after {} samples", summary.sent);
            break;
        }

        let sample = match parse_line(&line?) {
            Ok(Some(sample)) => sample,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no + 1, e);
                summary.skipped += 1;
                continue;
            }
        };

        if sample_sender.send(sample).is_err() {
            info!("Sample channel disconnected, replay stopping");
            break;
        }
        summary.sent += 1;

        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    info!("Replay finished: {} samples sent, {} lines skipped", summary.sent, summary.skipped);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccelerometerSample, GyroscopeSample};
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    const CAPTURE: &str = r#"{"sensor":"accelerometer","x":1.0,"y":2.0,"z":3.0,"timestamp":10}

{"sensor":"gyroscope","x":0.5,"y":0.25,"z":0.0}
not json at all
{"sensor":"barometer","x":1.0,"y":1.0,"z":1.0}
{"sensor":"accelerometer","x":4.0,"y":5.0,"z":6.0}
"#;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(
            parse_line(r#"{"sensor":"gyroscope","x":1,"y":2,"z":3}"#).unwrap(),
            Some(SensorSample::Gyroscope(GyroscopeSample::new(1.0, 2.0, 3.0)))
        );
        assert!(parse_line("{").is_err());
    }

    #[test]
    fn test_replay_skips_bad_lines_and_keeps_order() {
        let (sender, receiver) = unbounded();
        let shutdown = AtomicBool::new(false);

        let summary =
            replay_from_reader(Cursor::new(CAPTURE), Duration::ZERO, &sender, &shutdown).unwrap();
        assert_eq!(summary, ReplaySummary { sent: 3, skipped: 2 });

        let received: Vec<SensorSample> = receiver.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SensorSample::from(AccelerometerSample::new(1.0, 2.0, 3.0).with_timestamp(10)),
                SensorSample::from(GyroscopeSample::new(0.5, 0.25, 0.0)),
                SensorSample::from(AccelerometerSample::new(4.0, 5.0, 6.0)),
            ]
        );
    }

    #[test]
    fn test_replay_honours_shutdown() {
        let (sender, receiver) = unbounded();
        let shutdown = AtomicBool::new(true);

        let summary =
            replay_from_reader(Cursor::new(CAPTURE), Duration::ZERO, &sender, &shutdown).unwrap();
        assert_eq!(summary.sent, 0);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let (sender, _receiver) = unbounded();
        let shutdown = AtomicBool::new(false);
        let result = run_replay("/nonexistent/capture.jsonl", Duration::ZERO, &sender, &shutdown);
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
