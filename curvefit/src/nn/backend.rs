use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use serde::{Deserialize, Serialize};

pub type InferBackend = NdArray<f32>;
pub type TrainBackend = Autodiff<InferBackend>;

/// Where tensors live. Passed explicitly to every component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceConfig {
    #[default]
    Cpu,
}

impl DeviceConfig {
    pub fn device(&self) -> NdArrayDevice {
        match self {
            DeviceConfig::Cpu => NdArrayDevice::Cpu,
        }
    }
}
