//! Empirical time-complexity fits of benchmark data.
//!
//! Three single-constant models are fitted independently to the mean
//! construction times and sampled well past the measured range so their
//! extrapolations can be compared by eye. No model is picked automatically.

use serde::{Deserialize, Serialize};

use crate::constants::{FIT_EXTRAPOLATE_BY, FIT_SAMPLE_COUNT};
use crate::least_squares::{FitError, curve_fit, fit_options};
use crate::math_utils::logspace;
use crate::records::{BenchmarkRecord, FitRecord, ModelFit, load_record, save_record};
use crate::run_config::{FitConfig, RunError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingModel {
    /// `K·n·ln(n)`
    LogLinear,
    /// `K·n`
    Linear,
    /// `K·n²`
    Quadratic,
}

impl ScalingModel {
    pub const ALL: [ScalingModel; 3] = [ScalingModel::LogLinear, ScalingModel::Linear, ScalingModel::Quadratic];

    pub fn evaluate(self, n: f64, k: f64) -> f64 {
        match self {
            ScalingModel::LogLinear => k * (n * n.ln()),
            ScalingModel::Linear => k * n,
            ScalingModel::Quadratic => k * (n * n),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScalingModel::LogLinear => "n log n",
            ScalingModel::Linear => "n",
            ScalingModel::Quadratic => "n^2",
        }
    }
}

/// Fit one model to `(x, y)` starting from `K = 1`
pub fn fit_model(model: ScalingModel, x: &[f64], y: &[f64]) -> Result<ModelFit, FitError> {
    let fit = curve_fit(|n, k| model.evaluate(n, k), x, y, 1.0, &fit_options())?;
    if !fit.converged {
        tracing::warn!(model = model.label(), k = fit.k, "scaling fit did not converge");
    }
    Ok(ModelFit {
        model,
        k: fit.k,
        k_variance: fit.k_variance.is_finite().then_some(fit.k_variance),
        residual_sum_squares: fit.cost,
        converged: fit.converged,
    })
}

/// Fit all models to a benchmark record with the default sampling
pub fn fit_time_complexity(record: &BenchmarkRecord) -> Result<FitRecord, FitError> {
    fit_time_complexity_with(record, FIT_SAMPLE_COUNT, FIT_EXTRAPOLATE_BY)
}

/// Fit all models, sampling `sample_count` log-spaced points from 10 to
/// `max(n) + extrapolate_by`
pub fn fit_time_complexity_with(
    record: &BenchmarkRecord,
    sample_count: usize,
    extrapolate_by: f64,
) -> Result<FitRecord, FitError> {
    let x = record.generator_counts();
    let y = record.mean_times();

    let fits = ScalingModel::ALL
        .iter()
        .map(|&model| fit_model(model, &x, &y))
        .collect::<Result<Vec<_>, _>>()?;

    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sample_x = logspace(1.0, (x_max + extrapolate_by).log10(), sample_count);
    let curve = |model: ScalingModel| -> Vec<f64> {
        let k = fits.iter().find(|f| f.model == model).map_or(f64::NAN, |f| f.k);
        sample_x.iter().map(|&n| model.evaluate(n, k)).collect()
    };

    for fit in &fits {
        tracing::info!(
            model = fit.model.label(),
            k = fit.k,
            rss = fit.residual_sum_squares,
            "fitted scaling model"
        );
    }

    Ok(FitRecord {
        engine: record.engine().to_string(),
        loglinear: curve(ScalingModel::LogLinear),
        linear: curve(ScalingModel::Linear),
        quadratic: curve(ScalingModel::Quadratic),
        sample_x,
        fits,
    })
}

/// Fit the benchmark record at `config.input_path` and write the result
pub fn run_time_complexity(config: &FitConfig) -> Result<FitRecord, RunError> {
    let bench: BenchmarkRecord = load_record(&config.input_path)?;
    let record = fit_time_complexity_with(&bench, config.sample_count, config.extrapolate_by)?;
    save_record(&record, &config.output_path)?;
    Ok(record)
}
