use burn::{
    module::{AutodiffModule, Module},
    nn::loss::{MseLoss, Reduction},
    optim::{AdamConfig, GradientsParams, Optimizer},
    record::{FullPrecisionSettings, NamedMpkFileRecorder, RecorderError},
    tensor::{backend::AutodiffBackend, ElementConversion},
};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use crate::prelude::*;

type CheckpointRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

fn recorder() -> CheckpointRecorder {
    CheckpointRecorder::new()
}

fn checkpoint_err(e: RecorderError) -> ForecastError {
    ForecastError::Checkpoint(format!("{:?}", e))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Load,
    Train,
}

impl From<bool> for Mode {
    fn from(train: bool) -> Self {
        if train { Mode::Train } else { Mode::Load }
    }
}

/// What an observer sees after every optimisation step.
pub struct StepFrame<'a> {
    pub step: usize,
    pub loss: f32,
    pub x: &'a [f32],
    pub y: &'a [f32],
    pub prediction: &'a [f32],
}

pub trait TrainObserver {
    fn on_step(&mut self, frame: &StepFrame<'_>) -> ForecastResult<()>;

    /// Called once after the last step, before the checkpoint is written.
    fn finish(&mut self) -> ForecastResult<()> {
        Ok(())
    }
}

pub struct NoopObserver;

impl TrainObserver for NoopObserver {
    fn on_step(&mut self, _frame: &StepFrame<'_>) -> ForecastResult<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainReport {
    pub steps: usize,
    pub loss: f32,
}

/// Loads or trains the regressor for a series kind.
pub struct Trainer<B: AutodiffBackend> {
    pub device: B::Device,
    pub models_dir: PathBuf,
    pub training: TrainingConfig,
    pub model: RegressorConfig,
}

impl<B: AutodiffBackend> Trainer<B> {
    pub fn new(config: &RuntimeConfig, device: B::Device) -> Self {
        Self {
            device,
            models_dir: config.models_dir.clone(),
            training: config.training.clone(),
            model: RegressorConfig::new(),
        }
    }

    pub fn checkpoint(&self, kind: SeriesKind) -> PathBuf {
        kind.checkpoint_path(&self.models_dir)
    }

    pub fn fit(
        &self,
        kind: SeriesKind,
        x: &[f32],
        y: &[f32],
        mode: Mode,
        observer: &mut dyn TrainObserver,
    ) -> ForecastResult<Regressor<B::InnerBackend>> {
        match mode {
            Mode::Load => self.load(kind),
            Mode::Train => self.train(kind, x, y, observer).map(|(model, _)| model),
        }
    }

    pub fn load(&self, kind: SeriesKind) -> ForecastResult<Regressor<B::InnerBackend>> {
        let path = self.checkpoint(kind);
        if !path.is_file() {
            return Err(ForecastError::CheckpointMissing(path));
        }
        let model = self.model
            .init::<B::InnerBackend>(&self.device)
            .load_file(path.clone(), &recorder(), &self.device)
            .map_err(checkpoint_err)?;
        debug!(%kind, path = %path.display(), "checkpoint loaded");
        Ok(model)
    }

    pub fn train(
        &self,
        kind: SeriesKind,
        x: &[f32],
        y: &[f32],
        observer: &mut dyn TrainObserver,
    ) -> ForecastResult<(Regressor<B::InnerBackend>, TrainReport)> {
        let path = self.checkpoint(kind);
        B::seed(self.training.seed);
        let mut model = self.model.init::<B>(&self.device);
        if path.is_file() {
            model = model
                .load_file(path.clone(), &recorder(), &self.device)
                .map_err(checkpoint_err)?;
            info!(%kind, path = %path.display(), "warm start from checkpoint");
        } else {
            warn!(%kind, path = %path.display(), "no checkpoint, training from a fresh network");
        }

        let inputs = column::<B>(x, &self.device);
        let targets = column::<B>(y, &self.device);
        let loss_fn = MseLoss::new();
        let schedule = CosineAnnealing::new(
            self.training.lr_max,
            self.training.lr_min,
            self.training.iterations,
        );
        let mut optim = AdamConfig::new().init();
        let mut last_loss = f32::NAN;

        for step in 0..self.training.iterations {
            let prediction = model.forward(inputs.clone());
            let loss = loss_fn.forward(prediction.clone(), targets.clone(), Reduction::Mean);
            last_loss = loss.clone().into_scalar().elem::<f32>();
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(schedule.value(step), model, grads);

            let fitted = flat_values(prediction)?;
            observer.on_step(&StepFrame { step, loss: last_loss, x, y, prediction: &fitted })?;
            debug!(%kind, step, loss = last_loss, "train step");
        }
        observer.finish()?;

        self.models_dir.check_or_make()?;
        model
            .clone()
            .save_file(path.clone(), &recorder())
            .map_err(checkpoint_err)?;
        let report = TrainReport { steps: self.training.iterations, loss: last_loss };
        info!(%kind, steps = report.steps, loss = report.loss, path = %path.display(), "checkpoint saved");
        Ok((model.valid(), report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArrayDevice;

    struct CountFrames(usize, bool);

    impl TrainObserver for CountFrames {
        fn on_step(&mut self, frame: &StepFrame<'_>) -> ForecastResult<()> {
            assert_eq!(frame.step, self.0);
            assert_eq!(frame.prediction.len(), frame.x.len());
            assert!(frame.loss.is_finite());
            self.0 += 1;
            Ok(())
        }

        fn finish(&mut self) -> ForecastResult<()> {
            self.1 = true;
            Ok(())
        }
    }

    fn trainer(dir: &std::path::Path, iterations: usize) -> Trainer<TrainBackend> {
        let config = RuntimeConfig::default()
            .with_models_dir(dir)
            .with_iterations(iterations);
        Trainer::new(&config, NdArrayDevice::Cpu)
    }

    #[test]
    fn mode_from_flag() {
        assert_eq!(Mode::from(true), Mode::Train);
        assert_eq!(Mode::from(false), Mode::Load);
    }

    #[test]
    fn load_without_checkpoint_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = trainer(tmp.path(), 1).load(SeriesKind::Deaths).unwrap_err();
        assert!(matches!(err, ForecastError::CheckpointMissing(p) if p.ends_with("deaths.mpk")));
    }

    #[test]
    fn load_rejects_garbage_checkpoint() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("cases.mpk"), b"not a checkpoint").unwrap();
        let err = trainer(tmp.path(), 1).load(SeriesKind::Cases).unwrap_err();
        assert!(matches!(err, ForecastError::Checkpoint(_)));
    }

    #[test]
    fn train_reports_every_step_and_writes_checkpoint() {
        let tmp = tempfile::tempdir().unwrap();
        let t = trainer(&tmp.path().join("models"), 3);
        let mut observer = CountFrames(0, false);
        let (_, report) = t
            .train(SeriesKind::Cases, &[0., 1., 2., 3.], &[10., 12., 15., 20.], &mut observer)
            .unwrap();
        assert_eq!(observer.0, 3);
        assert!(observer.1);
        assert_eq!(report.steps, 3);
        assert!(t.checkpoint(SeriesKind::Cases).is_file());
        assert!(!t.checkpoint(SeriesKind::Deaths).exists());
    }

    #[test]
    fn trained_and_reloaded_models_agree() {
        let tmp = tempfile::tempdir().unwrap();
        let t = trainer(tmp.path(), 2);
        let x = [0., 1., 2., 3., 4., 5.];
        let (trained, _) = t
            .train(SeriesKind::Deaths, &x[..4], &[1., 2., 4., 7.], &mut NoopObserver)
            .unwrap();
        let loaded = t.load(SeriesKind::Deaths).unwrap();
        let a = trained.predict(&x, &t.device).unwrap();
        let b = loaded.predict(&x, &t.device).unwrap();
        a.iter().zip(&b).for_each(|(a, b)| assert!((a - b).abs() < 1e-4));
    }
}
