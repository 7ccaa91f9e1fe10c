use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Cases,
    Deaths,
}

impl SeriesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::Cases => "cases",
            SeriesKind::Deaths => "deaths",
        }
    }

    pub fn checkpoint_file(&self) -> &'static str {
        match self {
            SeriesKind::Cases => "cases.mpk",
            SeriesKind::Deaths => "deaths.mpk",
        }
    }

    pub fn checkpoint_path<P: AsRef<Path>>(&self, models_dir: P) -> PathBuf {
        models_dir.as_ref().join(self.checkpoint_file())
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesKind {
    type Err = ForecastError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cases" => Ok(SeriesKind::Cases),
            "deaths" => Ok(SeriesKind::Deaths),
            _ => Err(ForecastError::UnknownSeries(s.to_string())),
        }
    }
}

/// One observed day: the date label as published and the cumulative count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub label: String,
    pub count: i64,
}

impl<T: Into<String>> From<(T, i64)> for SeriesRow {
    fn from(value: (T, i64)) -> Self {
        SeriesRow { label: value.0.into(), count: value.1 }
    }
}

/// Chronological series; the day index of a row is its position.
#[derive(Clone, Debug)]
pub struct TimeSeries {
    pub kind: SeriesKind,
    pub rows: Vec<SeriesRow>,
}

impl TimeSeries {
    pub fn new(kind: SeriesKind, rows: Vec<SeriesRow>) -> ForecastResult<Self> {
        if rows.is_empty() {
            return Err(ForecastError::EmptySeries(kind));
        }
        Ok(TimeSeries { kind, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn days(&self) -> v32 {
        self.len().arange()
    }

    pub fn counts(&self) -> vi64 {
        self.rows.iter().map(|x| x.count).collect_vec()
    }

    pub fn targets(&self) -> v32 {
        self.rows.iter().map(|x| x.count as f32).collect_vec()
    }

    pub fn last_label(&self) -> Option<&str> {
        self.rows.last().map(|x| x.label.as_str())
    }
}

/// Upstream feed of raw rows. Implementations drop any leading sentinel row
/// and return rows oldest first.
pub trait SeriesSource {
    fn raw_series(&self, kind: SeriesKind) -> ForecastResult<Vec<SeriesRow>>;

    fn series(&self, kind: SeriesKind) -> ForecastResult<TimeSeries> {
        TimeSeries::new(kind, self.raw_series(kind)?)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemorySource(pub hm<SeriesKind, Vec<SeriesRow>>);

impl MemorySource {
    pub fn with_counts(mut self, kind: SeriesKind, counts: &[i64]) -> Self {
        let rows = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| SeriesRow::from((format!("day{}", i), c)))
            .collect_vec();
        self.0.insert(kind, rows);
        self
    }
}

impl SeriesSource for MemorySource {
    fn raw_series(&self, kind: SeriesKind) -> ForecastResult<Vec<SeriesRow>> {
        Ok(self.0.get(&kind).cloned().unwrap_or_default())
    }
}
