use genesim::engines::collector::reporters;
use genesim::engines::evolution::GenerationObserver;
use genesim::{
    ConstantExpression, DataCollector, GeneNetwork, Individual, PointMutation,
    ProportionalSelection,
};
use std::sync::Arc;

fn model(size: usize) -> GeneNetwork {
    let individuals = (0..size)
        .map(|_| Individual::with_gene_names(&["a", "b", "c"], 0.0))
        .collect();
    GeneNetwork::builder(
        individuals,
        Arc::new(ConstantExpression::new(0.6).unwrap()),
        Arc::new(ProportionalSelection::new()),
        Arc::new(PointMutation::new(0.0, 0.1).unwrap()),
    )
    .seed(10)
    .build()
    .unwrap()
}

fn collector(max_history: Option<usize>) -> DataCollector {
    DataCollector::new(max_history)
        .with_model_reporter("mean_fitness", reporters::mean_fitness)
        .with_model_reporter("max_fitness", reporters::max_fitness)
        .with_individual_reporter("fitness", reporters::fitness)
        .with_gene_reporter("expression", reporters::expression_level)
}

#[test]
fn test_history_is_bounded() {
    let mut model = model(2);
    let mut collector = collector(Some(4));
    for _ in 0..10 {
        model.step().unwrap();
        collector.collect(&model);
    }

    let generations: Vec<u64> = collector
        .model_history("mean_fitness")
        .unwrap()
        .iter()
        .map(|r| r.generation)
        .collect();
    assert_eq!(generations, vec![7, 8, 9, 10]);
    assert_eq!(collector.model_history("max_fitness").unwrap().len(), 4);
    assert_eq!(collector.individual_history("fitness").unwrap().len(), 4);
    assert_eq!(collector.gene_history("expression").unwrap().len(), 4);
}

#[test]
fn test_unbounded_history_keeps_everything() {
    let mut model = model(1);
    let mut collector = collector(None);
    for _ in 0..25 {
        model.step().unwrap();
        collector.collect(&model);
    }
    assert_eq!(collector.model_history("mean_fitness").unwrap().len(), 25);
}

#[test]
fn test_model_dataframe() {
    let mut model = model(3);
    let mut collector = collector(None);
    collector.collect(&model);
    model.run_observed(2, &mut collector).unwrap();

    let df = collector.model_vars_dataframe().unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 3);
    let fitness: Vec<Option<f64>> = df
        .column("mean_fitness")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    // Initial fitness is 1.0; after a step it is the mean constant level.
    assert_eq!(fitness[0], Some(1.0));
    assert!((fitness[2].unwrap() - 0.6).abs() < 1e-12);
}

#[test]
fn test_individual_and_gene_dataframes() {
    let mut model = model(3);
    let mut collector = collector(Some(2));
    for _ in 0..5 {
        model.step().unwrap();
        collector.on_generation_complete(&model);
    }

    let individuals = collector.individual_vars_dataframe().unwrap();
    assert_eq!(individuals.height(), 2 * 3);
    assert_eq!(
        individuals.get_column_names().iter().map(|n| n.as_str()).collect::<Vec<_>>(),
        vec!["generation", "individual", "fitness"]
    );

    let genes = collector.gene_vars_dataframe().unwrap();
    assert_eq!(genes.height(), 2 * 3 * 3);
    let names: Vec<Option<&str>> = genes
        .column("gene")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(&names[..3], &[Some("a"), Some("b"), Some("c")]);
}
