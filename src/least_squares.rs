//! Single-parameter curve fitting on solvr's Levenberg-Marquardt solver.
//!
//! Residuals are handed to solvr as CPU tensors. Input checks, the
//! parameter variance and a zero-derivative check are done here.

use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
use numr::tensor::Tensor;
use solvr::optimize::LeastSquaresAlgorithms;
use thiserror::Error;

pub use solvr::optimize::LeastSquaresOptions;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FitError {
    #[error("no data to fit")]
    EmptyData,
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("data point {index} is not finite")]
    NonFiniteData { index: usize },
    #[error("model is not finite at k = {k}")]
    NonFiniteModel { k: f64 },
    #[error("model does not depend on its parameter near k = {k}")]
    SingularJacobian { k: f64 },
    #[error("least-squares solver failed: {0}")]
    Solver(String),
}

/// Solver settings for constants that may be many orders of magnitude below 1
///
/// solvr's tolerances are absolute. The cost tolerance sits far below any
/// timing noise, so exact data converges on the step size or the cost and
/// noisy data on the step size.
pub fn fit_options() -> LeastSquaresOptions {
    LeastSquaresOptions {
        max_iter: 200,
        f_tol: 1e-20,
        x_tol: 1e-10,
        g_tol: 1e-14,
        eps: 1e-8,
    }
}

/// Result of [`curve_fit`]
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit {
    pub k: f64,
    /// `s² / (JᵀJ)` with `s² = cost / (m - 1)`; infinite for a single point
    pub k_variance: f64,
    /// Sum of squared residuals at `k`
    pub cost: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Fit the single parameter `k` of `model(x, k)` to the data
pub fn curve_fit<F>(model: F, x: &[f64], y: &[f64], k0: f64, options: &LeastSquaresOptions) -> Result<CurveFit, FitError>
where
    F: Fn(f64, f64) -> f64,
{
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch { x: x.len(), y: y.len() });
    }
    if x.is_empty() {
        return Err(FitError::EmptyData);
    }
    if let Some(index) = x.iter().zip(y).position(|(a, b)| !a.is_finite() || !b.is_finite()) {
        return Err(FitError::NonFiniteData { index });
    }

    let residuals = |k: f64| -> Vec<f64> { x.iter().zip(y).map(|(&xi, &yi)| model(xi, k) - yi).collect() };
    if residuals(k0).iter().any(|r| !r.is_finite()) {
        return Err(FitError::NonFiniteModel { k: k0 });
    }

    let device = CpuDevice::new();
    let client = CpuClient::new(device.clone());
    let residual_tensor = |p: &Tensor<CpuRuntime>| -> numr::error::Result<Tensor<CpuRuntime>> {
        let k: Vec<f64> = p.to_vec();
        let r = residuals(k[0]);
        Ok(Tensor::from_slice(&r, &[r.len()], p.device()))
    };

    let start = Tensor::<CpuRuntime>::from_slice(&[k0], &[1], &device);
    let result = client
        .leastsq(residual_tensor, &start, options)
        .map_err(|err| FitError::Solver(err.to_string()))?;

    let k = result
        .x
        .to_vec::<f64>()
        .first()
        .copied()
        .ok_or_else(|| FitError::Solver("no parameter in the solution".to_string()))?;
    if !k.is_finite() || !result.cost.is_finite() {
        return Err(FitError::NonFiniteModel { k });
    }

    let jtj = normal_matrix(&model, x, k, options.eps);
    if jtj == 0.0 || !jtj.is_finite() {
        return Err(FitError::SingularJacobian { k });
    }

    let dof = x.len().saturating_sub(1);
    let k_variance = if dof == 0 {
        f64::INFINITY
    } else {
        result.cost / dof as f64 / jtj
    };

    Ok(CurveFit {
        k,
        k_variance,
        cost: result.cost,
        iterations: result.iterations,
        converged: result.converged,
    })
}

/// `JᵀJ` for the single parameter, by forward differences relative to `k`
fn normal_matrix<F>(model: &F, x: &[f64], k: f64, eps: f64) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let h = eps * k.abs().max(f64::MIN_POSITIVE.sqrt());
    x.iter()
        .map(|&xi| {
            let j = (model(xi, k + h) - model(xi, k)) / h;
            j * j
        })
        .sum()
}
