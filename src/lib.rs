//! Population-level simulation of gene expression evolution.
//!
//! A [`GeneNetwork`](engines::evolution::GeneNetwork) owns a population of
//! [`Individual`](types::Individual)s and advances it one generation per
//! `step()`: expression (optionally coupled through a sparse
//! [`RegulatoryNetwork`](engines::network::RegulatoryNetwork)), selection,
//! then mutation from a single seeded random stream.

pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use engines::collector::DataCollector;
pub use engines::evolution::{
    GeneNetwork, GeneNetworkBuilder, MutationModel, PointMutation, ProportionalSelection,
    SelectionModel, ThresholdSelection,
};
pub use engines::expression::{
    AdditiveRegulation, CompositeExpressionModel, ConstantExpression, ExpressionModel,
    HillExpression, LinearExpression, MultiplicativeRegulation, RegulatoryModel,
};
pub use engines::network::{FeedforwardMotif, RegulationConnection, RegulatoryNetwork};
pub use error::{GeneSimError, Result};
pub use types::{Conditions, Gene, Individual};
