pub mod motifs;
pub mod regulatory_network;
pub mod sparse;

pub use motifs::FeedforwardMotif;
pub use regulatory_network::{RegulationConnection, RegulatoryNetwork};
pub use sparse::CsrMatrix;
