#![allow(non_upper_case_globals, non_camel_case_types)]
mod args;
mod config;

use anyhow::Result;
use args::Args;
use config::{get_config, AppConfig};
use curvefit::prelude::*;
use curvefit_io::prelude::*;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

/// Reads the feed before anything is written, then trains or loads, and
/// writes the optional plot and JSON file.
fn run(args: &Args, config: &AppConfig) -> Result<vi64> {
    let kind: SeriesKind = args.series.parse()?;
    let series = config.data.series(kind)?;

    let trainer = Trainer::<TrainBackend>::new(&config.model, config.model.device.device());
    let forecaster = Forecaster::new(&config.data, trainer);
    let mode = Mode::from(args.train);
    let forecast = match mode {
        Mode::Train => {
            let mut recorder = GifRecorder::create(
                &config.output.animation,
                config.output.frame_size,
                config.output.fps,
            )?;
            forecaster.forecast_series(&series, args.days, mode, &mut recorder)?
        }
        Mode::Load => forecaster.forecast_series(&series, args.days, mode, &mut NoopObserver)?,
    };

    if args.plot {
        forecast.plot_svg(&config.output.plot)?;
        info!(path = %config.output.plot.display(), "plot saved");
    }
    let values = forecast.values();
    if let Some(path) = &args.output {
        values.sof_json(path)?;
    }
    Ok(values)
}

fn main() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;
    let config = get_config(args.config.as_deref())?;
    let _guards = setup_logging(&config.tracing_config.path, &["curvefit"], LevelFilter::INFO)?;
    let values = run(&args, &config)?;
    println!("{}", serde_json::to_string(&values)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_in(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.data.cases.path = dir.join("cases.csv");
        config.data.deaths.path = dir.join("deaths.csv");
        config.model = config.model.with_models_dir(dir.join("models")).with_iterations(2);
        config.output.animation = dir.join("curve.gif");
        config.output.plot = dir.join("forecast.svg");
        config.output.frame_size = (64, 48);
        config
    }

    fn args(series: &str, days: usize, train: bool) -> Args {
        Args { series: series.into(), days, train, ..Default::default() }
    }

    #[test]
    fn empty_feed_leaves_no_animation_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        std::fs::write(&config.data.deaths.path, "date,deaths\n").unwrap();
        assert!(run(&args("deaths", 3, true), &config).is_err());
        assert!(!config.output.animation.exists());
        assert!(!tmp.path().join("models").exists());
    }

    #[test]
    fn train_run_writes_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        std::fs::write(&config.data.cases.path, "date,cases\n03-01,10\n03-02,12\n03-03,15\n").unwrap();
        let mut a = args("cases", 2, true);
        a.plot = true;
        a.output = Some(tmp.path().join("out/forecast.json"));

        let values = run(&a, &config).unwrap();
        assert_eq!(values.len(), 5);
        assert_eq!(&values[..3], &[10, 12, 15]);
        assert!(config.output.animation.is_file());
        assert!(config.output.plot.is_file());
        assert!(SeriesKind::Cases.checkpoint_path(tmp.path().join("models")).is_file());
        let saved = std::fs::read_to_string(tmp.path().join("out/forecast.json")).unwrap();
        assert_eq!(saved, serde_json::to_string(&values).unwrap());
    }
}
