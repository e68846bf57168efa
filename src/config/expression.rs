use super::traits::ConfigSection;
use crate::engines::expression::{
    AdditiveRegulation, CompositeExpressionModel, ConstantExpression, ExpressionModel,
    HillExpression, LinearExpression, MultiplicativeRegulation, RegulatoryModel,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BaseExpressionConfig {
    Constant { level: f64 },
    Linear { slope: f64, intercept: f64 },
    Hill { v_max: f64, k: f64, n: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayConfig {
    Additive { weight: f64 },
    Multiplicative { weight: f64 },
}

/// Base model plus regulatory overlays, applied innermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionConfig {
    pub model: BaseExpressionConfig,
    #[serde(default)]
    pub overlays: Vec<OverlayConfig>,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            model: BaseExpressionConfig::Constant { level: 1.0 },
            overlays: Vec::new(),
        }
    }
}

impl ExpressionConfig {
    pub fn build(&self) -> Result<Arc<dyn ExpressionModel>> {
        let mut model: Arc<dyn ExpressionModel> = match self.model {
            BaseExpressionConfig::Constant { level } => Arc::new(ConstantExpression::new(level)?),
            BaseExpressionConfig::Linear { slope, intercept } => {
                Arc::new(LinearExpression::new(slope, intercept)?)
            }
            BaseExpressionConfig::Hill { v_max, k, n } => Arc::new(HillExpression::new(v_max, k, n)?),
        };

        for overlay in &self.overlays {
            let regulation: Arc<dyn RegulatoryModel> = match *overlay {
                OverlayConfig::Additive { weight } => Arc::new(AdditiveRegulation::new(weight)?),
                OverlayConfig::Multiplicative { weight } => {
                    Arc::new(MultiplicativeRegulation::new(weight)?)
                }
            };
            model = Arc::new(CompositeExpressionModel::new(model, regulation));
        }
        Ok(model)
    }
}

impl ConfigSection for ExpressionConfig {
    fn section_name() -> &'static str {
        "expression"
    }

    fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }
}
