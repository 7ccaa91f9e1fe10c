use serde_json::{json, Map, Value};
use tracing::{field::Visit, Subscriber};
use tracing_subscriber::{
    filter::{self, LevelFilter},
    fmt::{self, format::Writer, FmtContext, FormatFields},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Registry,
};
use tracing_appender::non_blocking::WorkerGuard;
use chrono::Local;
use std::{io, path::Path};
use crate::prelude::*;

struct JsonVisitor {
    map: Map<String, Value>,
}

impl JsonVisitor {
    fn new() -> Self {
        JsonVisitor {
            map: Map::new(),
        }
    }
}

impl Visit for JsonVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.map.insert(field.name().to_string(), json!(value));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.map.insert(field.name().to_string(), json!(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.map.insert(field.name().to_string(), json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.map.insert(field.name().to_string(), json!(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.map.insert(field.name().to_string(), json!(format!("{:?}", value)));
    }
}

trait ExtractString {
    fn extract_string(self) -> String;
}

impl ExtractString for Option<Value> {
    fn extract_string(self) -> String {
        match self {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => "".to_string(),
        }
    }
}

/// `time level message key=value.. file:line`, one event per line.
struct LineFormatter;

impl<S, N> fmt::FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = JsonVisitor::new();
        event.record(&mut visitor);
        let meta = event.metadata();
        let message = visitor.map.remove("message").extract_string();
        let fields = visitor.map
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, Some(v).extract_string()))
            .join(" ");
        writeln!(
            writer, "{} {:<5} {} {} {}:{}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            meta.level(),
            message,
            fields,
            meta.file().unwrap_or_default(),
            meta.line().unwrap_or_default(),
        )
    }
}

type LayerType = Box<dyn Layer<Registry> + Send + Sync>;

/// One log file per target prefix under `dir`, plus stderr at `console_level`.
/// The returned guards flush the file writers when dropped.
pub fn setup_logging<P: AsRef<Path>>(
    dir: P,
    targets: &[&str],
    console_level: LevelFilter,
) -> io::Result<Vec<WorkerGuard>> {
    let log_dir = dir.as_ref();
    log_dir.check_or_make()?;
    let mut guard_vec = Vec::with_capacity(targets.len());
    let layers = targets
        .iter()
        .map(|&s| {
            let (non_blocking, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
                log_dir,
                format!("{}.log", s),
            ));
            let prefix = s.to_string();
            let filter_target = filter::filter_fn(move |metadata| {
                metadata.target().starts_with(prefix.as_str())
            });
            let layer_target = fmt::layer()
                .event_format(LineFormatter)
                .with_writer(non_blocking)
                .with_filter(filter_target);
            guard_vec.push(guard);
            layer_target.boxed()
        })
        .collect::<Vec<LayerType>>();
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(console_level);
    tracing_subscriber::registry()
        .with(layers)
        .with(console_layer)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(guard_vec)
}
