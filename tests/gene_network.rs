use genesim::{
    AdditiveRegulation, CompositeExpressionModel, Conditions, ConstantExpression, ExpressionModel,
    Gene, GeneNetwork, GeneSimError, HillExpression, Individual, MultiplicativeRegulation,
    MutationModel, PointMutation, ProportionalSelection, RegulationConnection, RegulatoryNetwork,
    SelectionModel, ThresholdSelection,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const GENES: [&str; 4] = ["g1", "g2", "g3", "g4"];

fn network() -> Arc<RegulatoryNetwork> {
    Arc::new(
        RegulatoryNetwork::new(
            GENES,
            &[
                RegulationConnection::new("g1", "g2", 0.6),
                RegulationConnection::new("g2", "g3", -0.4),
                RegulationConnection::new("g3", "g1", 0.3),
                RegulationConnection::new("g1", "g4", 1.2),
            ],
            true,
        )
        .unwrap(),
    )
}

fn regulated_model() -> Arc<dyn ExpressionModel> {
    let hill: Arc<dyn ExpressionModel> = Arc::new(HillExpression::new(1.0, 0.5, 2.0).unwrap());
    let additive: Arc<dyn ExpressionModel> = Arc::new(CompositeExpressionModel::new(
        hill,
        Arc::new(AdditiveRegulation::new(0.5).unwrap()),
    ));
    Arc::new(CompositeExpressionModel::new(
        additive,
        Arc::new(MultiplicativeRegulation::new(0.2).unwrap()),
    ))
}

fn population(seed: u64, size: usize) -> Vec<Individual> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|_| {
            Individual::new(
                GENES
                    .iter()
                    .map(|name| Gene::new(*name, rng.gen_range(0.0..1.5)))
                    .collect(),
            )
        })
        .collect()
}

fn simulation(seed: u64, mutation: Arc<dyn MutationModel>) -> GeneNetwork {
    GeneNetwork::builder(
        population(99, 25),
        regulated_model(),
        Arc::new(ProportionalSelection::new()),
        mutation,
    )
    .conditions(Conditions::new().with_tf_concentration(0.8))
    .regulatory_network(network())
    .seed(seed)
    .build()
    .unwrap()
}

#[test]
fn test_same_seed_same_trajectory() {
    let mutation: Arc<dyn MutationModel> = Arc::new(PointMutation::new(0.3, 0.2).unwrap());
    let mut a = simulation(42, Arc::clone(&mutation));
    let mut b = simulation(42, mutation);

    a.run(30).unwrap();
    b.run(30).unwrap();

    assert_eq!(a.generation(), 30);
    assert_eq!(a.generation(), b.generation());
    assert_eq!(a.individuals(), b.individuals());
}

#[test]
fn test_different_seeds_diverge() {
    let mutation: Arc<dyn MutationModel> = Arc::new(PointMutation::new(0.5, 0.2).unwrap());
    let mut a = simulation(1, Arc::clone(&mutation));
    let mut b = simulation(2, mutation);
    a.run(5).unwrap();
    b.run(5).unwrap();
    assert_ne!(a.individuals(), b.individuals());
}

#[test]
fn test_levels_never_negative() {
    // Heavy mutation and strong repression push levels toward zero.
    let expression: Arc<dyn ExpressionModel> = Arc::new(CompositeExpressionModel::new(
        Arc::new(ConstantExpression::new(0.05).unwrap()),
        Arc::new(AdditiveRegulation::new(3.0).unwrap()),
    ));
    let repressive = Arc::new(
        RegulatoryNetwork::new(
            GENES,
            &[
                RegulationConnection::new("g1", "g2", -2.0),
                RegulationConnection::new("g2", "g3", -2.0),
                RegulationConnection::new("g3", "g4", -2.0),
                RegulationConnection::new("g4", "g1", -2.0),
            ],
            false,
        )
        .unwrap(),
    );
    let mut model = GeneNetwork::builder(
        population(5, 40),
        expression,
        Arc::new(ThresholdSelection::new(0.1).unwrap()),
        Arc::new(PointMutation::new(1.0, 1.0).unwrap()),
    )
    .regulatory_network(repressive)
    .seed(8)
    .build()
    .unwrap();

    for _ in 0..50 {
        model.step().unwrap();
        for individual in model.individuals() {
            assert!(individual.genes.iter().all(|g| g.expression_level() >= 0.0));
            assert!(individual.fitness == 0.0 || individual.fitness == 1.0);
        }
    }
}

#[test]
fn test_run_is_repeated_step() {
    let mutation: Arc<dyn MutationModel> = Arc::new(PointMutation::new(0.2, 0.1).unwrap());
    let mut stepped = simulation(11, Arc::clone(&mutation));
    let mut ran = simulation(11, mutation);
    for _ in 0..7 {
        stepped.step().unwrap();
    }
    ran.run(7).unwrap();
    assert_eq!(stepped.individuals(), ran.individuals());
    assert_eq!(stepped.generation(), 7);
}

#[test]
fn test_step_matches_synchronous_reference() {
    // Without mutation, one step equals evaluating the model on the
    // start-of-step regulatory input of each individual.
    let mutation: Arc<dyn MutationModel> = Arc::new(PointMutation::new(0.0, 0.1).unwrap());
    let mut model = simulation(3, mutation);
    let conditions = model.conditions().clone();
    let expression = regulated_model();
    let selection = ProportionalSelection::new();
    let network = network();

    let before: Vec<Vec<f64>> = model.individuals().iter().map(|i| i.expression_levels()).collect();
    model.step().unwrap();

    for (start, individual) in before.iter().zip(model.individuals()) {
        let tf = network.compute_tf_inputs(start).unwrap();
        for (gene, input) in individual.genes.iter().zip(tf) {
            let expected = expression.compute_regulated(&conditions, input);
            assert!((gene.expression_level() - expected).abs() < 1e-12);
        }
        assert!((individual.fitness - selection.fitness(individual)).abs() < 1e-12);
    }
}

#[test]
fn test_fitness_scores_levels_before_mutation() {
    // Every gene mutates, so stored levels differ from what selection saw.
    let mutation: Arc<dyn MutationModel> = Arc::new(PointMutation::new(1.0, 0.5).unwrap());
    let mut model = simulation(21, mutation);
    let conditions = model.conditions().clone();
    let expression = regulated_model();
    let selection = ProportionalSelection::new();
    let network = network();

    for _ in 0..3 {
        let before: Vec<Vec<f64>> =
            model.individuals().iter().map(|i| i.expression_levels()).collect();
        model.step().unwrap();

        let mut mutated_scores_differ = false;
        for (start, individual) in before.iter().zip(model.individuals()) {
            let tf = network.compute_tf_inputs(start).unwrap();
            let expressed = Individual::new(
                GENES
                    .iter()
                    .zip(tf)
                    .map(|(name, input)| Gene::new(*name, expression.compute_regulated(&conditions, input)))
                    .collect(),
            );
            assert!((individual.fitness - selection.fitness(&expressed)).abs() < 1e-12);
            if (individual.fitness - selection.fitness(individual)).abs() > 1e-9 {
                mutated_scores_differ = true;
            }
        }
        assert!(mutated_scores_differ);
    }
}

#[test]
fn test_results_independent_of_population_size() {
    // Individual 0 follows the same deterministic trajectory whether or not
    // others share the population when mutation is off.
    let mutation: Arc<dyn MutationModel> = Arc::new(PointMutation::new(0.0, 0.1).unwrap());
    let build = |size: usize| {
        GeneNetwork::builder(
            population(77, size),
            regulated_model(),
            Arc::new(ProportionalSelection::new()) as Arc<dyn SelectionModel>,
            Arc::clone(&mutation),
        )
        .conditions(Conditions::new().with_tf_concentration(0.8))
        .regulatory_network(network())
        .seed(5)
        .build()
        .unwrap()
    };
    let mut small = build(1);
    let mut large = build(30);
    small.run(10).unwrap();
    large.run(10).unwrap();
    assert_eq!(small.individuals()[0], large.individuals()[0]);
}

#[test]
fn test_unregulated_model_ignores_network() {
    let mut model = GeneNetwork::builder(
        population(1, 3),
        Arc::new(ConstantExpression::new(0.9).unwrap()),
        Arc::new(ProportionalSelection::new()),
        Arc::new(PointMutation::new(0.0, 0.1).unwrap()),
    )
    .regulatory_network(network())
    .build()
    .unwrap();
    model.step().unwrap();
    for individual in model.individuals() {
        assert_eq!(individual.expression_levels(), vec![0.9; 4]);
    }
}

#[test]
fn test_gene_order_must_match_network() {
    let individuals = vec![Individual::with_gene_names(&["g2", "g1", "g3", "g4"], 0.1)];
    let result = GeneNetwork::builder(
        individuals,
        regulated_model(),
        Arc::new(ProportionalSelection::new()),
        Arc::new(PointMutation::new(0.1, 0.1).unwrap()),
    )
    .regulatory_network(network())
    .build();
    assert!(matches!(result, Err(GeneSimError::Configuration(_))));
}

#[test]
fn test_empty_population_steps() {
    let mut model = GeneNetwork::builder(
        Vec::new(),
        regulated_model(),
        Arc::new(ProportionalSelection::new()),
        Arc::new(PointMutation::new(0.1, 0.1).unwrap()),
    )
    .regulatory_network(network())
    .seed(1)
    .build()
    .unwrap();
    model.run(3).unwrap();
    assert_eq!(model.generation(), 3);
    assert!(model.individuals().is_empty());
    assert_eq!(model.n_genes(), 4);
}
