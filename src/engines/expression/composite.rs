use super::{ExpressionModel, RegulatoryModel};
use crate::types::Conditions;
use ndarray::{ArrayView2, ArrayViewMut2, Zip};
use std::sync::Arc;

/// A base expression model wrapped by one regulatory overlay.
///
/// The base may itself be a `CompositeExpressionModel`, so overlays stack
/// to any depth. Every layer receives the same per-gene regulatory input.
#[derive(Debug, Clone)]
pub struct CompositeExpressionModel {
    base: Arc<dyn ExpressionModel>,
    regulation: Arc<dyn RegulatoryModel>,
    name: String,
}

impl CompositeExpressionModel {
    pub fn new(base: Arc<dyn ExpressionModel>, regulation: Arc<dyn RegulatoryModel>) -> Self {
        let name = format!("{}({})", regulation.name(), base.name());
        Self {
            base,
            regulation,
            name,
        }
    }

    pub fn base(&self) -> &Arc<dyn ExpressionModel> {
        &self.base
    }

    pub fn regulation(&self) -> &Arc<dyn RegulatoryModel> {
        &self.regulation
    }
}

impl ExpressionModel for CompositeExpressionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, conditions: &Conditions) -> f64 {
        self.compute_regulated(conditions, 0.0)
    }

    fn compute_regulated(&self, conditions: &Conditions, tf_input: f64) -> f64 {
        let base_expr = self.base.compute_regulated(conditions, tf_input);
        self.regulation.compute(base_expr, tf_input)
    }

    fn is_regulated(&self) -> bool {
        true
    }

    fn compute_batch_into(
        &self,
        conditions: &Conditions,
        tf_inputs: ArrayView2<f64>,
        mut out: ArrayViewMut2<f64>,
    ) {
        self.base.compute_batch_into(conditions, tf_inputs, out.view_mut());
        let regulation = &self.regulation;
        let zip = Zip::from(out).and(tf_inputs);

        #[cfg(feature = "parallel")]
        zip.par_for_each(|level, &tf| *level = regulation.compute(*level, tf));
        #[cfg(not(feature = "parallel"))]
        zip.for_each(|level, &tf| *level = regulation.compute(*level, tf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::expression::{
        AdditiveRegulation, ConstantExpression, HillExpression, MultiplicativeRegulation,
    };
    use ndarray::array;

    fn additive(weight: f64) -> Arc<dyn RegulatoryModel> {
        Arc::new(AdditiveRegulation::new(weight).unwrap())
    }

    #[test]
    fn test_composite_applies_overlay() {
        let model = CompositeExpressionModel::new(
            Arc::new(ConstantExpression::new(0.5).unwrap()),
            additive(1.0),
        );
        let conditions = Conditions::new();
        assert!((model.compute_regulated(&conditions, 0.3) - 0.8).abs() < 1e-12);
        assert_eq!(model.compute_regulated(&conditions, -1.0), 0.0);
        assert_eq!(model.compute(&conditions), 0.5);
        assert!(model.is_regulated());
        assert_eq!(model.name(), "additive(constant)");
    }

    #[test]
    fn test_nested_composites() {
        let hill: Arc<dyn ExpressionModel> = Arc::new(HillExpression::new(1.0, 1.0, 1.0).unwrap());
        let inner: Arc<dyn ExpressionModel> =
            Arc::new(CompositeExpressionModel::new(hill, additive(0.5)));
        let outer = CompositeExpressionModel::new(
            inner,
            Arc::new(MultiplicativeRegulation::new(2.0).unwrap()),
        );

        // Hill at x = 1, k = 1, n = 1 gives 0.5.
        let conditions = Conditions::new().with_tf_concentration(1.0);
        let tf = 0.2;
        let expected = (0.5 + 0.5 * tf) * (1.0 + 2.0 * tf);
        assert!((outer.compute_regulated(&conditions, tf) - expected).abs() < 1e-12);
        assert_eq!(outer.name(), "multiplicative(additive(hill))");
    }

    #[test]
    fn test_batch_matches_scalar_path() {
        let inner: Arc<dyn ExpressionModel> = Arc::new(CompositeExpressionModel::new(
            Arc::new(ConstantExpression::new(0.4).unwrap()),
            additive(1.0),
        ));
        let model = CompositeExpressionModel::new(
            inner,
            Arc::new(MultiplicativeRegulation::new(0.5).unwrap()),
        );
        let conditions = Conditions::new();
        let tf = array![[0.0, 0.3, -0.8], [1.2, -0.1, 0.5]];

        let batch = model.compute_batch(&conditions, tf.view());
        for ((r, c), &value) in batch.indexed_iter() {
            let scalar = model.compute_regulated(&conditions, tf[[r, c]]);
            assert!((value - scalar).abs() < 1e-12);
        }
    }
}
