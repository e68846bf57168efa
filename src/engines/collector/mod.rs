pub mod data_collector;
pub mod reporters;

pub use data_collector::{DataCollector, GeneReporter, IndividualReporter, ModelReporter, Record};
