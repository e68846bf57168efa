pub mod collector;
pub mod evolution;
pub mod expression;
pub mod network;

pub use collector::DataCollector;
pub use evolution::{GeneNetwork, GeneNetworkBuilder};
pub use expression::{CompositeExpressionModel, ExpressionModel};
pub use network::{RegulationConnection, RegulatoryNetwork};
