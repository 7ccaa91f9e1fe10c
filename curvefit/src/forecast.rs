use burn::tensor::backend::AutodiffBackend;
use tracing::{info, warn};
use crate::prelude::*;

/// Observed history for a series followed by its extrapolated days.
#[derive(Clone, Debug, PartialEq)]
pub struct Forecast {
    pub kind: SeriesKind,
    pub history: vi64,
    pub predicted: vi64,
    /// Raw model output over every day index, history included.
    pub fitted: v32,
}

impl Forecast {
    pub fn values(&self) -> vi64 {
        self.history.iter().chain(&self.predicted).copied().collect_vec()
    }

    pub fn days(&self) -> v32 {
        (self.history.len() + self.predicted.len()).arange()
    }

    pub fn len(&self) -> usize {
        self.history.len() + self.predicted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct Forecaster<'a, B: AutodiffBackend> {
    pub source: &'a dyn SeriesSource,
    pub trainer: Trainer<B>,
}

impl<'a, B: AutodiffBackend> Forecaster<'a, B> {
    pub fn new(source: &'a dyn SeriesSource, trainer: Trainer<B>) -> Self {
        Self { source, trainer }
    }

    pub fn forecast(
        &self,
        kind: SeriesKind,
        days: usize,
        mode: Mode,
        observer: &mut dyn TrainObserver,
    ) -> ForecastResult<Forecast> {
        let series = self.source.series(kind)?;
        self.forecast_series(&series, days, mode, observer)
    }

    /// Same as [`Forecaster::forecast`] for a series already pulled from the source.
    pub fn forecast_series(
        &self,
        series: &TimeSeries,
        days: usize,
        mode: Mode,
        observer: &mut dyn TrainObserver,
    ) -> ForecastResult<Forecast> {
        let kind = series.kind;
        let (x, y) = (series.days(), series.targets());
        info!(%kind, rows = series.len(), last = series.last_label().unwrap_or_default(), days, ?mode, "forecast");
        let model = self.trainer.fit(kind, &x, &y, mode, observer)?;

        let fitted = model.predict(&(series.len() + days).arange(), &self.trainer.device)?;
        let predicted = fitted[series.len()..]
            .iter()
            .map(|v| v.trunc() as i64)
            .collect_vec();
        Ok(Forecast { kind, history: series.counts(), predicted, fitted })
    }
}

/// String-selector entry point. An unrecognised selector yields an empty
/// result rather than an error.
pub fn start<B: AutodiffBackend>(
    source: &dyn SeriesSource,
    config: &RuntimeConfig,
    device: B::Device,
    selector: &str,
    days: usize,
    train: bool,
    observer: &mut dyn TrainObserver,
) -> ForecastResult<vi64> {
    let kind = match selector.parse::<SeriesKind>() {
        Ok(kind) => kind,
        Err(_) => {
            warn!(selector, "unknown series selector, returning an empty forecast");
            return Ok(vec![]);
        }
    };
    Forecaster::new(source, Trainer::<B>::new(config, device))
        .forecast(kind, days, Mode::from(train), observer)
        .map(|x| x.values())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_concatenate_history_and_prediction() {
        let f = Forecast {
            kind: SeriesKind::Cases,
            history: vec![10, 12, 15, 20],
            predicted: vec![23, 27],
            fitted: vec![0.; 6],
        };
        assert_eq!(f.values(), vec![10, 12, 15, 20, 23, 27]);
        assert_eq!(f.days(), vec![0., 1., 2., 3., 4., 5.]);
        assert_eq!(f.len(), 6);
    }
}
