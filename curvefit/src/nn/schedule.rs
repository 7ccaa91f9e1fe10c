use burn::LearningRate;
use std::f64::consts::PI;

/// A learning rate as a function of the zero-based step.
pub trait LrSchedule {
    fn value(&self, step: usize) -> LearningRate;
}

/// Half-period cosine from `lr_max` at step 0 down to `lr_min` at `total_steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct CosineAnnealing {
    pub lr_max: LearningRate,
    pub lr_min: LearningRate,
    pub total_steps: usize,
}

impl CosineAnnealing {
    pub fn new(lr_max: LearningRate, lr_min: LearningRate, total_steps: usize) -> Self {
        Self { lr_max, lr_min, total_steps }
    }
}

impl LrSchedule for CosineAnnealing {
    fn value(&self, step: usize) -> LearningRate {
        if self.total_steps == 0 {
            return self.lr_max;
        }
        let progress = step.min(self.total_steps) as f64 / self.total_steps as f64;
        self.lr_min + (self.lr_max - self.lr_min) * (1. + (PI * progress).cos()) / 2.
    }
}
