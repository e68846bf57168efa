pub mod gene_network;
pub mod mutation;
pub mod selection;

pub use gene_network::{GeneNetwork, GeneNetworkBuilder, GenerationObserver, LoggingObserver};
pub use mutation::{MutationModel, PointMutation};
pub use selection::{ProportionalSelection, SelectionModel, ThresholdSelection};
