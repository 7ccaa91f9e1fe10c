use csv::StringRecord;
use curvefit::prelude::*;
use serde::Deserializer;
use std::path::{Path, PathBuf};
use tracing::debug;

trait ReadRecord {
    type Output;
    fn read_record(&self, record: &StringRecord) -> Result<Self::Output, String>;
}

pub trait ReadCsv {
    type Output;
    fn read_csv(&self) -> ForecastResult<Self::Output>;
}

fn default_count_col() -> usize {
    1
}

/// One published feed. The first line is a header and is never returned as
/// data. `newest_first` feeds are reversed into chronological order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CsvFeed {
    pub path: PathBuf,
    #[serde(default)]
    pub date_col: usize,
    #[serde(default = "default_count_col")]
    pub count_col: usize,
    #[serde(default)]
    pub newest_first: bool,
}

impl CsvFeed {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        CsvFeed {
            path: path.into(),
            date_col: 0,
            count_col: default_count_col(),
            newest_first: false,
        }
    }

    pub fn with_newest_first(mut self, newest_first: bool) -> Self {
        self.newest_first = newest_first;
        self
    }

    pub fn with_columns(mut self, date_col: usize, count_col: usize) -> Self {
        self.date_col = date_col;
        self.count_col = count_col;
        self
    }
}

struct SeriesRowRecord {
    date_col: usize,
    count_col: usize,
}

fn parse_count(s: &str) -> Result<i64, String> {
    let s = s.trim().replace(',', "");
    s.parse::<i64>()
        .or_else(|_| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
                .ok_or(())
        })
        .map_err(|_| format!("count is not a number: {:?}", s))
}

impl ReadRecord for SeriesRowRecord {
    type Output = SeriesRow;
    fn read_record(&self, record: &StringRecord) -> Result<Self::Output, String> {
        let field = |i: usize| {
            record
                .get(i)
                .ok_or_else(|| format!("missing column {}, row has {}", i, record.len()))
        };
        Ok(SeriesRow {
            label: field(self.date_col)?.trim().to_string(),
            count: parse_count(field(self.count_col)?)?,
        })
    }
}

fn csv_err(path: &Path, e: csv::Error) -> ForecastError {
    let line = e.position().map(|p| p.line()).unwrap_or_default();
    match e.into_kind() {
        csv::ErrorKind::Io(e) => ForecastError::Io(e),
        kind => ForecastError::Parse {
            path: path.to_path_buf(),
            line,
            msg: format!("{:?}", kind),
        },
    }
}

impl ReadCsv for CsvFeed {
    type Output = Vec<SeriesRow>;
    fn read_csv(&self) -> ForecastResult<Self::Output> {
        let row_record = SeriesRowRecord {
            date_col: self.date_col,
            count_col: self.count_col,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| csv_err(&self.path, e))?;
        let mut res = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| csv_err(&self.path, e))?;
            if record.iter().all(|x| x.trim().is_empty()) {
                continue;
            }
            let row = row_record.read_record(&record).map_err(|msg| ForecastError::Parse {
                path: self.path.clone(),
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                msg,
            })?;
            res.push(row);
        }
        if self.newest_first {
            res.reverse();
        }
        debug!(path = %self.path.display(), rows = res.len(), "series read");
        Ok(res)
    }
}

/// Partial feed settings from a config file, laid over a per-kind default.
#[derive(Default, Deserialize)]
#[serde(default)]
struct FeedOverride {
    path: Option<PathBuf>,
    date_col: Option<usize>,
    count_col: Option<usize>,
    newest_first: Option<bool>,
}

impl FeedOverride {
    fn apply(self, base: CsvFeed) -> CsvFeed {
        CsvFeed {
            path: self.path.unwrap_or(base.path),
            date_col: self.date_col.unwrap_or(base.date_col),
            count_col: self.count_col.unwrap_or(base.count_col),
            newest_first: self.newest_first.unwrap_or(base.newest_first),
        }
    }
}

fn cases_feed() -> CsvFeed {
    CsvFeed::new("data/cases.csv")
}

/// The deaths feed is published newest first.
fn deaths_feed() -> CsvFeed {
    CsvFeed::new("data/deaths.csv").with_newest_first(true)
}

fn de_cases<'de, D: Deserializer<'de>>(d: D) -> Result<CsvFeed, D::Error> {
    FeedOverride::deserialize(d).map(|x| x.apply(cases_feed()))
}

fn de_deaths<'de, D: Deserializer<'de>>(d: D) -> Result<CsvFeed, D::Error> {
    FeedOverride::deserialize(d).map(|x| x.apply(deaths_feed()))
}

/// Cases and deaths feeds read from local CSV files. Keys missing from a
/// config table keep the default of their own kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CsvSource {
    #[serde(default = "cases_feed", deserialize_with = "de_cases")]
    pub cases: CsvFeed,
    #[serde(default = "deaths_feed", deserialize_with = "de_deaths")]
    pub deaths: CsvFeed,
}

impl Default for CsvSource {
    fn default() -> Self {
        CsvSource {
            cases: cases_feed(),
            deaths: deaths_feed(),
        }
    }
}

impl CsvSource {
    pub fn feed(&self, kind: SeriesKind) -> &CsvFeed {
        match kind {
            SeriesKind::Cases => &self.cases,
            SeriesKind::Deaths => &self.deaths,
        }
    }
}

impl SeriesSource for CsvSource {
    fn raw_series(&self, kind: SeriesKind) -> ForecastResult<Vec<SeriesRow>> {
        self.feed(kind).read_csv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn header_row_is_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "cases.csv", "date,total\n2020-03-01,10\n2020-03-02,12\n2020-03-03,15\n");
        let rows = CsvFeed::new(p).read_csv().unwrap();
        assert_eq!(
            rows,
            vec![
                SeriesRow::from(("2020-03-01", 10)),
                SeriesRow::from(("2020-03-02", 12)),
                SeriesRow::from(("2020-03-03", 15)),
            ]
        );
    }

    #[test]
    fn newest_first_feed_is_reversed() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "deaths.csv", "date,deaths,new\n03-03,5,2\n03-02,3,1\n03-01,2,0\n");
        let counts = CsvFeed::new(p)
            .with_newest_first(true)
            .read_csv()
            .unwrap()
            .into_iter()
            .map(|x| x.count)
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![2, 3, 5]);
    }

    #[test]
    fn counts_accept_floats_and_separators() {
        assert_eq!(parse_count(" 12 ").unwrap(), 12);
        assert_eq!(parse_count("12.9").unwrap(), 12);
        assert_eq!(parse_count("\"1,234\"".trim_matches('"')).unwrap(), 1234);
        assert!(parse_count("NaN").is_err());
        assert!(parse_count("").is_err());
    }

    #[test]
    fn bad_row_names_file_and_line() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "cases.csv", "date,total\n03-01,10\n03-02,many\n");
        let err = CsvFeed::new(&p).read_csv().unwrap_err();
        match err {
            ForecastError::Parse { path, line, msg } => {
                assert_eq!(path, p);
                assert_eq!(line, 3);
                assert!(msg.contains("many"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let p = write(tmp.path(), "cases.csv", "date,total\n03-01\n");
        assert!(matches!(CsvFeed::new(p).read_csv(), Err(ForecastError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let res = CsvFeed::new(tmp.path().join("nope.csv")).read_csv();
        assert!(matches!(res, Err(ForecastError::Io(_))));
    }

    #[test]
    fn source_routes_by_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let cases = write(tmp.path(), "c.csv", "d,n\na,1\nb,2\n");
        let deaths = write(tmp.path(), "d.csv", "d,n\nb,9\na,4\n");
        let source = CsvSource {
            cases: CsvFeed::new(cases),
            deaths: CsvFeed::new(deaths).with_newest_first(true),
        };
        assert_eq!(source.series(SeriesKind::Cases).unwrap().counts(), vec![1, 2]);
        assert_eq!(source.series(SeriesKind::Deaths).unwrap().counts(), vec![4, 9]);
    }

    #[test]
    fn partial_feed_keeps_its_kind_defaults() {
        let only_path = || FeedOverride { path: Some("feeds/d.csv".into()), ..Default::default() };
        let deaths = only_path().apply(deaths_feed());
        assert_eq!(deaths.path, PathBuf::from("feeds/d.csv"));
        assert!(deaths.newest_first);
        assert_eq!((deaths.date_col, deaths.count_col), (0, 1));
        assert!(!only_path().apply(cases_feed()).newest_first);
        let flipped = FeedOverride { newest_first: Some(false), ..Default::default() }.apply(deaths_feed());
        assert_eq!(flipped.path, PathBuf::from("data/deaths.csv"));
        assert!(!flipped.newest_first);
    }
}
