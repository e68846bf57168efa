pub mod composite;
pub mod models;
pub mod regulation;

pub use composite::CompositeExpressionModel;
pub use models::{ConstantExpression, HillExpression, LinearExpression};
pub use regulation::{AdditiveRegulation, MultiplicativeRegulation, RegulatoryModel};

use crate::types::{clamp_level, Conditions};
use ndarray::{Array2, ArrayView2, ArrayViewMut2, Zip};
use std::fmt::Debug;

/// Capability shared by every expression model.
///
/// `compute` sees only the environment. Models that fold network input into
/// their result report `is_regulated() == true` and override
/// `compute_regulated`; the orchestrator only computes regulatory input for
/// those.
pub trait ExpressionModel: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn compute(&self, conditions: &Conditions) -> f64;

    fn compute_regulated(&self, conditions: &Conditions, _tf_input: f64) -> f64 {
        self.compute(conditions)
    }

    fn is_regulated(&self) -> bool {
        false
    }

    /// Evaluates a whole individuals x genes matrix of regulatory inputs.
    fn compute_batch(&self, conditions: &Conditions, tf_inputs: ArrayView2<f64>) -> Array2<f64> {
        let mut levels = Array2::zeros(tf_inputs.raw_dim());
        self.compute_batch_into(conditions, tf_inputs, levels.view_mut());
        levels
    }

    /// `compute_batch` writing into `out`, which has the shape of `tf_inputs`.
    fn compute_batch_into(
        &self,
        conditions: &Conditions,
        tf_inputs: ArrayView2<f64>,
        mut out: ArrayViewMut2<f64>,
    ) {
        if self.is_regulated() {
            map_elements_into(tf_inputs, out, |tf| self.compute_regulated(conditions, tf));
        } else {
            out.fill(clamp_level(self.compute(conditions)));
        }
    }
}

#[cfg(feature = "parallel")]
pub(crate) fn map_elements_into<F>(input: ArrayView2<f64>, out: ArrayViewMut2<f64>, f: F)
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    Zip::from(out).and(input).par_for_each(|o, &x| *o = f(x));
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_elements_into<F>(input: ArrayView2<f64>, out: ArrayViewMut2<f64>, f: F)
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    Zip::from(out).and(input).for_each(|o, &x| *o = f(x));
}
