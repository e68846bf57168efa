use anyhow::{Context, Result};
use genesim::config::{
    BaseExpressionConfig, ConfigManager, NetworkConfig, OverlayConfig, SimulationConfig,
};
use genesim::engines::collector::reporters;
use genesim::engines::evolution::{GenerationObserver, GeneNetwork, LoggingObserver};
use genesim::{DataCollector, RegulationConnection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::time::Instant;

/// Forwards each generation to both the logger and the collector.
struct Observers {
    logger: LoggingObserver,
    collector: DataCollector,
}

impl GenerationObserver for Observers {
    fn on_generation_complete(&mut self, model: &GeneNetwork) {
        self.logger.on_generation_complete(model);
        self.collector.on_generation_complete(model);
    }
}

/// Random sparse wiring over `genes` with roughly `density` of all ordered
/// pairs connected.
fn random_network(genes: &[String], density: f64, seed: u64) -> NetworkConfig {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut interactions = Vec::new();
    for source in genes {
        for target in genes {
            if source != target && rng.gen::<f64>() < density {
                interactions.push(RegulationConnection::new(
                    source.clone(),
                    target.clone(),
                    rng.gen_range(-0.5..0.5),
                ));
            }
        }
    }
    NetworkConfig {
        detect_circuits: false,
        interactions,
    }
}

fn default_config(population_size: usize, n_genes: usize, generations: usize) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.simulation.generations = generations;
    config.simulation.seed = Some(42);
    config.simulation.max_history = Some(100);
    config.population.size = population_size;
    config.population.gene_names = (0..n_genes).map(|i| format!("g{}", i)).collect();
    config.conditions = config.conditions.clone().with_tf_concentration(1.0);
    config.expression.model = BaseExpressionConfig::Hill {
        v_max: 1.0,
        k: 0.5,
        n: 2.0,
    };
    config.expression.overlays = vec![OverlayConfig::Additive { weight: 0.2 }];
    config.network = Some(random_network(&config.population.gene_names, 0.01, 7));
    config
}

fn main() -> Result<()> {
    env_logger::init();

    // Usage: simulate [config.toml] | simulate <population> <genes> <generations>
    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) if path.ends_with(".toml") => {
            let manager = ConfigManager::new();
            manager
                .load_from_file(path)
                .with_context(|| format!("loading {}", path))?;
            manager.get()
        }
        _ => {
            let population = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10_000);
            let genes = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
            let generations = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(1_000);
            default_config(population, genes, generations)
        }
    };

    println!("Configuration:");
    println!("  Population size: {}", config.population.size);
    println!("  Genes: {}", config.population.gene_names.len());
    println!("  Generations: {}", config.simulation.generations);
    println!(
        "  Interactions: {}",
        config.network.as_ref().map_or(0, |n| n.interactions.len())
    );

    let mut model = config.build_gene_network()?;
    let mut observers = Observers {
        logger: LoggingObserver::new(100),
        // Per-gene history is too large at this scale; keep model summaries.
        collector: DataCollector::new(config.simulation.max_history)
            .with_model_reporter("mean_fitness", reporters::mean_fitness)
            .with_model_reporter("max_fitness", reporters::max_fitness)
            .with_model_reporter("mean_expression", reporters::mean_expression),
    };

    let start = Instant::now();
    model.run_observed(config.simulation.generations, &mut observers)?;
    println!(
        "Ran {} generations in {:.2}s",
        model.generation(),
        start.elapsed().as_secs_f64()
    );

    let summary = observers.collector.model_vars_dataframe()?;
    println!("{}", summary.tail(Some(5)));
    Ok(())
}
