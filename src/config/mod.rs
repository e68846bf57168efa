pub mod traits;
pub mod evolution;
pub mod expression;
pub mod population;
pub mod network;
pub mod manager;

pub use manager::{ConfigManager, SimulationConfig, SimulationSettings};
pub use evolution::{MutationConfig, SelectionConfig};
pub use expression::{BaseExpressionConfig, ExpressionConfig, OverlayConfig};
pub use population::PopulationConfig;
pub use network::NetworkConfig;
pub use traits::ConfigSection;
