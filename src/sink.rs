//! Outbound side: where [`PlotEvent`]s go once the core has produced them.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crossbeam_channel::{SendError, Sender, TrySendError};
use log::warn;

use crate::types::{PlotEvent, SamplePoint, Series};

/// Receives plot events.
///
/// The manager calls [`flush`](PlotSink::flush) once every public operation
/// has published all of its events, so a sink may treat the events between two
/// flushes as one unit.
pub trait PlotSink {
    fn publish(&mut self, event: PlotEvent);

    fn flush(&mut self) {}
}

impl PlotSink for Vec<PlotEvent> {
    fn publish(&mut self, event: PlotEvent) {
        self.push(event);
    }
}

impl<T: PlotSink + ?Sized> PlotSink for &mut T {
    fn publish(&mut self, event: PlotEvent) {
        (**self).publish(event);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Forwards events to a rendering thread over a bounded channel, one batch per
/// flush.
///
/// A full channel blocks the producer instead of losing events, so a reader
/// that applies every batch always ends up with the manager's logs. Events are
/// only lost once the receiver is gone.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<Vec<PlotEvent>>,
    pending: Vec<PlotEvent>,
    stalls: u64,
    dropped: u64,
    disconnected: bool,
}

impl ChannelSink {
    pub fn new(sender: Sender<Vec<PlotEvent>>) -> Self {
        Self {
            sender,
            pending: Vec::new(),
            stalls: 0,
            dropped: 0,
            disconnected: false,
        }
    }

    /// Batches that had to wait for room in the channel
    pub fn stalls(&self) -> u64 {
        self.stalls
    }

    /// Events lost because the receiver was gone
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn lose(&mut self, batch: Vec<PlotEvent>) {
        self.dropped += batch.len() as u64;
        if !self.disconnected {
            warn!("Plot event receiver disconnected, dropping further events");
            self.disconnected = true;
        }
    }
}

impl PlotSink for ChannelSink {
    fn publish(&mut self, event: PlotEvent) {
        self.pending.push(event);
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);

        match self.sender.try_send(batch) {
            Ok(()) => {}
            Err(TrySendError::Full(batch)) => {
                self.stalls += 1;
                // 每1000次阻塞只记录一次
                if self.stalls % 1000 == 1 {
                    warn!("Plot event channel full, producer stalled {} times", self.stalls);
                }
                if let Err(SendError(batch)) = self.sender.send(batch) {
                    self.lose(batch);
                }
            }
            Err(TrySendError::Disconnected(batch)) => self.lose(batch),
        }
    }
}

#[derive(Debug, Default)]
struct MirrorTable {
    logs: [Vec<SamplePoint>; Series::COUNT],
}

impl MirrorTable {
    fn apply(&mut self, event: &PlotEvent) {
        match event {
            PlotEvent::PointAppended { series, point } => self.logs[series.index()].push(*point),
            PlotEvent::SeriesCleared { series } => self.logs[series.index()].clear(),
        }
    }
}

/// Reader-side copy of the nine series, rebuilt from plot events.
///
/// Clones share the same table, so one handle can be fed by the event
/// consumer while others read snapshots from any thread.
#[derive(Debug, Clone, Default)]
pub struct PlotMirror {
    table: Arc<RwLock<MirrorTable>>,
}

impl PlotMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, event: &PlotEvent) {
        self.write().apply(event);
    }

    /// Applies a batch under one write lock, so a group reset followed by the
    /// first point of the next window is never observed half done.
    pub fn apply_batch<'a, I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = &'a PlotEvent>,
    {
        let mut table = self.write();
        let mut applied = 0;
        for event in events {
            table.apply(event);
            applied += 1;
        }
        applied
    }

    pub fn snapshot(&self, series: Series) -> Vec<SamplePoint> {
        self.read().logs[series.index()].clone()
    }

    pub fn len(&self, series: Series) -> usize {
        self.read().logs[series.index()].len()
    }

    pub fn is_empty(&self, series: Series) -> bool {
        self.len(series) == 0
    }

    pub fn latest(&self, series: Series) -> Option<SamplePoint> {
        self.read().logs[series.index()].last().copied()
    }

    // A panic while holding the lock leaves the table consistent per event,
    // so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, MirrorTable> {
        self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MirrorTable> {
        self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_channel_sink_sends_one_batch_per_flush() {
        let (sender, receiver) = bounded(4);
        let mut sink = ChannelSink::new(sender);

        sink.publish(PlotEvent::cleared(Series::AccelRawX));
        sink.publish(PlotEvent::appended(Series::AccelRawX, 0, 1.0));
        assert!(receiver.try_recv().is_err());

        sink.flush();
        assert_eq!(
            receiver.try_recv().unwrap(),
            vec![
                PlotEvent::cleared(Series::AccelRawX),
                PlotEvent::appended(Series::AccelRawX, 0, 1.0),
            ]
        );

        // Nothing pending, nothing sent
        sink.flush();
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_waits_for_room_instead_of_dropping() {
        let (sender, receiver) = bounded(1);
        let mut sink = ChannelSink::new(sender);

        let consumer = thread::spawn(move || {
            let mut received = Vec::new();
            for batch in receiver {
                thread::sleep(Duration::from_millis(1));
                received.extend(batch);
            }
            received
        });

        for i in 0..20 {
            sink.publish(PlotEvent::appended(Series::GyroRawX, i, i as f64));
            sink.flush();
        }
        assert_eq!(sink.dropped(), 0);
        drop(sink);

        let received = consumer.join().unwrap();
        assert_eq!(received.len(), 20);
        assert_eq!(received[19], PlotEvent::appended(Series::GyroRawX, 19, 19.0));
    }

    #[test]
    fn test_channel_sink_counts_events_lost_after_disconnect() {
        let (sender, receiver) = bounded(4);
        let mut sink = ChannelSink::new(sender);
        drop(receiver);

        sink.publish(PlotEvent::cleared(Series::AccelRawX));
        sink.publish(PlotEvent::cleared(Series::AccelRawY));
        sink.flush();

        assert!(sink.is_disconnected());
        assert_eq!(sink.dropped(), 2);
    }

    #[test]
    fn test_mirror_applies_appends_and_clears() {
        let mirror = PlotMirror::new();
        mirror.apply(&PlotEvent::appended(Series::GyroRawZ, 0, 0.5));
        mirror.apply(&PlotEvent::appended(Series::GyroRawZ, 1, 0.6));
        assert_eq!(mirror.len(Series::GyroRawZ), 2);
        assert_eq!(mirror.latest(Series::GyroRawZ), Some(SamplePoint::new(1, 0.6)));
        assert!(mirror.is_empty(Series::GyroRawX));

        mirror.apply(&PlotEvent::cleared(Series::GyroRawZ));
        assert!(mirror.snapshot(Series::GyroRawZ).is_empty());
    }

    #[test]
    fn test_mirror_clones_share_storage_across_threads() {
        let writer = PlotMirror::new();
        let reader = writer.clone();

        let events: Vec<PlotEvent> = (0..100)
            .map(|i| PlotEvent::appended(Series::AccelFilteredX, i, i as f64))
            .collect();

        let handle = thread::spawn(move || writer.apply_batch(&events));
        assert_eq!(handle.join().unwrap(), 100);

        let snapshot = reader.snapshot(Series::AccelFilteredX);
        assert_eq!(snapshot.len(), 100);
        assert_eq!(snapshot[99], SamplePoint::new(99, 99.0));
    }
}
