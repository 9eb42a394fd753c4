use super::sample::SamplePoint;
use super::series::Series;

/// Outbound notification for the rendering side
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlotEvent {
    PointAppended { series: Series, point: SamplePoint },
    SeriesCleared { series: Series },
}

impl PlotEvent {
    pub fn appended(series: Series, index: u64, value: f64) -> Self {
        Self::PointAppended {
            series,
            point: SamplePoint::new(index, value),
        }
    }

    pub fn cleared(series: Series) -> Self {
        Self::SeriesCleared { series }
    }

    pub fn series(&self) -> Series {
        match self {
            PlotEvent::PointAppended { series, .. } => *series,
            PlotEvent::SeriesCleared { series } => *series,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, PlotEvent::SeriesCleared { .. })
    }
}
