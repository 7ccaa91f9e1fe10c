use burn::{
    config::Config,
    module::Module,
    nn::{Linear, LinearConfig, Relu},
    tensor::{backend::Backend, Tensor, TensorData},
};
use crate::prelude::*;

/// 1 → 200 → 800 → 500 → 200 → 1, ReLU after every hidden layer.
#[derive(Module, Debug)]
pub struct Regressor<B: Backend> {
    input_layer: Linear<B>,
    mid_layer1: Linear<B>,
    mid_layer2: Linear<B>,
    mid_layer3: Linear<B>,
    output_layer: Linear<B>,
    activation: Relu,
}

#[derive(Config, Debug)]
pub struct RegressorConfig {
    #[config(default = 1)]
    pub num_features: usize,

    #[config(default = 200)]
    pub hidden_size: usize,

    #[config(default = 800)]
    pub mid_size1: usize,

    #[config(default = 500)]
    pub mid_size2: usize,

    #[config(default = 1)]
    pub num_outputs: usize,
}

impl RegressorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Regressor<B> {
        Regressor {
            input_layer: LinearConfig::new(self.num_features, self.hidden_size).init(device),
            mid_layer1: LinearConfig::new(self.hidden_size, self.mid_size1).init(device),
            mid_layer2: LinearConfig::new(self.mid_size1, self.mid_size2).init(device),
            mid_layer3: LinearConfig::new(self.mid_size2, self.hidden_size).init(device),
            output_layer: LinearConfig::new(self.hidden_size, self.num_outputs).init(device),
            activation: Relu::new(),
        }
    }
}

impl<B: Backend> Regressor<B> {
    /// `[n, 1] -> [n, 1]`
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = self.activation.forward(self.input_layer.forward(input));
        x = self.activation.forward(self.mid_layer1.forward(x));
        x = self.activation.forward(self.mid_layer2.forward(x));
        x = self.activation.forward(self.mid_layer3.forward(x));
        self.output_layer.forward(x)
    }

    pub fn predict(&self, x: &[f32], device: &B::Device) -> ForecastResult<v32> {
        column::<B>(x, device)
            .pip(|input| self.forward(input))
            .pip(flat_values)
    }
}

/// Values as a `[n, 1]` column.
pub fn column<B: Backend>(values: &[f32], device: &B::Device) -> Tensor<B, 2> {
    let data = TensorData::new(values.to_vec(), [values.len(), 1]).convert::<B::FloatElem>();
    Tensor::<B, 2>::from_data(data, device)
}

pub fn flat_values<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> ForecastResult<v32> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| ForecastError::Tensor(format!("{:?}", e)))
}
