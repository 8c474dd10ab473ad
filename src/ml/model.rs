// ============================================================
// Layer 5 — Intent Network
// ============================================================
// A two-layer feedforward network:
//
//   X [1, V] ──W_ih [V, H] + b_h──▶ sigmoid ──▶ hidden [1, H]
//   hidden    ──W_ho [H, L] + b_o──▶ softmax ──▶ output [1, L]
//
// Gradients are written out by hand instead of going through
// Burn's autodiff: with softmax + cross-entropy and a one-hot
// target, the error at the output pre-activation is simply
// (target - output), and the sigmoid derivative can be taken
// from the activation itself, h * (1 - h).
//
// Both activations guard against overflow:
//   - sigmoid clamps its input to [-500, 500] before exp()
//   - softmax subtracts the row max before exp()
//
// Reference: Burn Book §3 (Tensors)
//            Rumelhart, Hinton & Williams (1986) backpropagation

use burn::tensor::{backend::Backend, Tensor};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::data::batcher::matrix;
use crate::error::EngineError;

/// Inputs to the sigmoid are clamped to this magnitude.
pub const SIGMOID_CLAMP: f32 = 500.0;

// ─── Host-side parameter storage ──────────────────────────────────────────────
/// A row-major matrix of raw `f32` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows:   usize,
    pub cols:   usize,
    pub values: Vec<f32>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, values: Vec<f32>) -> Self {
        Self { rows, cols, values }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, values: vec![0.0; rows * cols] }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when the value count matches the declared shape.
    pub fn is_consistent(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.values.len())
    }

    fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        matrix(self.values.clone(), self.rows, self.cols, device)
    }

    fn from_tensor<B: Backend>(tensor: Tensor<B, 2>) -> Result<Self, EngineError> {
        let [rows, cols] = tensor.dims();
        let values = tensor
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| EngineError::Tensor(format!("{e:?}")))?;
        Ok(Self { rows, cols, values })
    }
}

/// The four parameter tensors, copied out of the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    /// Input → hidden weights, [V, H]
    pub w_ih: Matrix,
    /// Hidden → output weights, [H, L]
    pub w_ho: Matrix,
    /// Hidden bias, [1, H]
    pub b_h:  Matrix,
    /// Output bias, [1, L]
    pub b_o:  Matrix,
}

impl NetworkParameters {
    /// Seeded Gaussian weights scaled by `scale`, zero biases.
    pub fn random(
        input_size:  usize,
        hidden_size: usize,
        output_size: usize,
        seed:        u64,
        scale:       f32,
    ) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut sample = |rows: usize, cols: usize| {
            let values = (0..rows * cols)
                .map(|_| {
                    let z: f32 = StandardNormal.sample(&mut rng);
                    z * scale
                })
                .collect();
            Matrix::new(rows, cols, values)
        };

        let w_ih = sample(input_size, hidden_size);
        let w_ho = sample(hidden_size, output_size);

        Self {
            w_ih,
            w_ho,
            b_h: Matrix::zeros(1, hidden_size),
            b_o: Matrix::zeros(1, output_size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.w_ih.rows
    }

    pub fn hidden_size(&self) -> usize {
        self.w_ih.cols
    }

    pub fn output_size(&self) -> usize {
        self.w_ho.cols
    }

    /// Check every tensor against the expected V/H/L shapes.
    pub fn check_shapes(&self, input_size: usize, output_size: usize) -> Result<(), EngineError> {
        let hidden = self.w_ih.cols;
        let expected = [
            ("W_ih", &self.w_ih, (input_size, hidden)),
            ("W_ho", &self.w_ho, (hidden, output_size)),
            ("b_h",  &self.b_h,  (1, hidden)),
            ("b_o",  &self.b_o,  (1, output_size)),
        ];
        for (name, m, shape) in expected {
            if !m.is_consistent() {
                return Err(EngineError::Deserialization(format!(
                    "{name} declares {}x{} but holds {} values",
                    m.rows, m.cols, m.values.len()
                )));
            }
            if m.shape() != shape {
                return Err(EngineError::Deserialization(format!(
                    "{name} is {}x{}, expected {}x{}",
                    m.rows, m.cols, shape.0, shape.1
                )));
            }
        }
        if hidden == 0 {
            return Err(EngineError::Deserialization("hidden layer has width 0".to_string()));
        }
        Ok(())
    }
}

// ─── Activations ──────────────────────────────────────────────────────────────
/// 1 / (1 + e^-x) with x clamped to [-500, 500].
pub fn sigmoid<B: Backend>(x: Tensor<B, 2>) -> Tensor<B, 2> {
    x.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP)
        .neg()
        .exp()
        .add_scalar(1.0)
        .recip()
}

/// h * (1 - h), for h already passed through the sigmoid.
pub fn sigmoid_derivative<B: Backend>(h: Tensor<B, 2>) -> Tensor<B, 2> {
    h.clone().mul(h.neg().add_scalar(1.0))
}

/// Row-wise softmax with max subtraction.
pub fn softmax<B: Backend>(x: Tensor<B, 2>) -> Tensor<B, 2> {
    let max = x.clone().max_dim(1);
    let exp = x.sub(max).exp();
    let sum = exp.clone().sum_dim(1);
    exp.div(sum)
}

// ─── IntentNetwork ────────────────────────────────────────────────────────────
/// Activations of one forward pass.
#[derive(Debug, Clone)]
pub struct ForwardPass<B: Backend> {
    /// Sigmoid activations — shape: [batch, H]
    pub hidden: Tensor<B, 2>,
    /// Softmax probabilities — shape: [batch, L]
    pub output: Tensor<B, 2>,
}

#[derive(Debug, Clone)]
pub struct IntentNetwork<B: Backend> {
    pub w_ih: Tensor<B, 2>,
    pub w_ho: Tensor<B, 2>,
    pub b_h:  Tensor<B, 2>,
    pub b_o:  Tensor<B, 2>,
}

impl<B: Backend> IntentNetwork<B> {
    /// Upload host parameters to the device.
    pub fn from_parameters(params: &NetworkParameters, device: &B::Device) -> Self {
        Self {
            w_ih: params.w_ih.to_tensor(device),
            w_ho: params.w_ho.to_tensor(device),
            b_h:  params.b_h.to_tensor(device),
            b_o:  params.b_o.to_tensor(device),
        }
    }

    /// Copy the current parameters back to the host.
    pub fn to_parameters(&self) -> Result<NetworkParameters, EngineError> {
        Ok(NetworkParameters {
            w_ih: Matrix::from_tensor(self.w_ih.clone())?,
            w_ho: Matrix::from_tensor(self.w_ho.clone())?,
            b_h:  Matrix::from_tensor(self.b_h.clone())?,
            b_o:  Matrix::from_tensor(self.b_o.clone())?,
        })
    }

    /// [V, H, L]
    pub fn dims(&self) -> [usize; 3] {
        let [input, hidden] = self.w_ih.dims();
        let [_, output]     = self.w_ho.dims();
        [input, hidden, output]
    }

    /// x: [batch, V] → hidden [batch, H], output [batch, L]
    pub fn forward(&self, x: Tensor<B, 2>) -> ForwardPass<B> {
        let hidden = sigmoid(x.matmul(self.w_ih.clone()).add(self.b_h.clone()));
        let output = softmax(hidden.clone().matmul(self.w_ho.clone()).add(self.b_o.clone()));
        ForwardPass { hidden, output }
    }

    /// One stochastic update on a single example (or any batch;
    /// the bias gradients are summed over rows).
    pub fn train_step(&mut self, x: Tensor<B, 2>, target: Tensor<B, 2>, learning_rate: f32) {
        let ForwardPass { hidden, output } = self.forward(x.clone());

        // Softmax + cross-entropy: gradient w.r.t. the pre-activation
        let output_delta = target.sub(output);

        // Back through W_ho, then through the sigmoid
        let hidden_delta = output_delta
            .clone()
            .matmul(self.w_ho.clone().transpose())
            .mul(sigmoid_derivative(hidden.clone()));

        // Ascend the log-likelihood
        self.w_ho = self.w_ho.clone().add(
            hidden.transpose().matmul(output_delta.clone()).mul_scalar(learning_rate),
        );
        self.b_o = self.b_o.clone().add(output_delta.sum_dim(0).mul_scalar(learning_rate));
        self.w_ih = self.w_ih.clone().add(
            x.transpose().matmul(hidden_delta.clone()).mul_scalar(learning_rate),
        );
        self.b_h = self.b_h.clone().add(hidden_delta.sum_dim(0).mul_scalar(learning_rate));
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::CpuBackend;

    type B = CpuBackend;

    fn to_vec(t: Tensor<B, 2>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_sigmoid_saturates_without_nan() {
        let device = Default::default();
        let x = matrix::<B>(vec![-1.0e6, 0.0, 1.0e6], 1, 3, &device);
        let y = to_vec(sigmoid(x));
        assert!(y.iter().all(|v| v.is_finite()));
        assert!(y[0] < 1e-6);
        assert!((y[1] - 0.5).abs() < 1e-6);
        assert!((y[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_is_distribution_per_row() {
        let device = Default::default();
        let x = matrix::<B>(vec![1000.0, 1001.0, 999.0, -5.0, 0.0, 5.0], 2, 3, &device);
        let y = to_vec(softmax(x));
        for row in y.chunks(3) {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "row sums to {sum}");
            assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
        }
        // Largest logit wins in each row
        assert!(y[1] > y[0] && y[0] > y[2]);
        assert!(y[5] > y[4] && y[4] > y[3]);
    }

    #[test]
    fn test_random_init_is_seeded() {
        let a = NetworkParameters::random(5, 4, 3, 42, 0.5);
        let b = NetworkParameters::random(5, 4, 3, 42, 0.5);
        let c = NetworkParameters::random(5, 4, 3, 7, 0.5);
        assert_eq!(a, b);
        assert_ne!(a.w_ih, c.w_ih);
        assert!(a.b_h.values.iter().all(|&v| v == 0.0));
        assert!(a.b_o.values.iter().all(|&v| v == 0.0));
        assert_eq!(a.w_ih.shape(), (5, 4));
        assert_eq!(a.w_ho.shape(), (4, 3));
    }

    #[test]
    fn test_forward_output_is_distribution_for_extreme_weights() {
        let device = Default::default();
        let mut params = NetworkParameters::random(4, 3, 2, 1, 0.5);
        params.w_ih.values.iter_mut().for_each(|v| *v *= 1.0e5);
        params.w_ho.values.iter_mut().for_each(|v| *v *= 1.0e5);
        let net = IntentNetwork::<B>::from_parameters(&params, &device);

        let x = matrix::<B>(vec![1.0, 1.0, 0.0, 1.0], 1, 4, &device);
        let out = to_vec(net.forward(x).output);
        let sum: f32 = out.iter().sum();
        assert!(out.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p)));
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_parameters_round_trip_through_device() {
        let device = Default::default();
        let params = NetworkParameters::random(6, 3, 2, 9, 0.5);
        let net    = IntentNetwork::<B>::from_parameters(&params, &device);
        assert_eq!(net.dims(), [6, 3, 2]);
        assert_eq!(net.to_parameters().unwrap(), params);
    }

    #[test]
    fn test_train_step_moves_toward_target() {
        let device  = Default::default();
        let params  = NetworkParameters::random(3, 4, 2, 42, 0.5);
        let mut net = IntentNetwork::<B>::from_parameters(&params, &device);

        let x      = matrix::<B>(vec![1.0, 0.0, 1.0], 1, 3, &device);
        let target = matrix::<B>(vec![0.0, 1.0], 1, 2, &device);

        let before = to_vec(net.forward(x.clone()).output)[1];
        for _ in 0..50 {
            net.train_step(x.clone(), target.clone(), 0.1);
        }
        let after = to_vec(net.forward(x).output)[1];
        assert!(after > before, "p(target) went from {before} to {after}");
    }

    #[test]
    fn test_train_step_leaves_unused_inputs_alone() {
        let device  = Default::default();
        let params  = NetworkParameters::random(3, 2, 2, 3, 0.5);
        let mut net = IntentNetwork::<B>::from_parameters(&params, &device);

        // Feature 1 is zero, so row 1 of W_ih gets a zero gradient
        let x      = matrix::<B>(vec![1.0, 0.0, 1.0], 1, 3, &device);
        let target = matrix::<B>(vec![1.0, 0.0], 1, 2, &device);
        net.train_step(x, target, 0.5);

        let updated = net.to_parameters().unwrap();
        assert_eq!(updated.w_ih.values[2..4], params.w_ih.values[2..4]);
        assert_ne!(updated.w_ih.values[0..2], params.w_ih.values[0..2]);
    }

    #[test]
    fn test_check_shapes() {
        let params = NetworkParameters::random(5, 4, 3, 42, 0.5);
        assert!(params.check_shapes(5, 3).is_ok());
        assert!(matches!(params.check_shapes(6, 3), Err(EngineError::Deserialization(_))));
        assert!(matches!(params.check_shapes(5, 2), Err(EngineError::Deserialization(_))));

        let mut truncated = params.clone();
        truncated.b_h.values.pop();
        assert!(matches!(truncated.check_shapes(5, 3), Err(EngineError::Deserialization(_))));
    }
}
