use super::{argmin, clamp_unit, evaluate_all, random_vector, EvaluationBudget, Objective, SearchOutcome};
use rand::rngs::StdRng;
use rand::Rng;

const MUTATION_FACTOR: f64 = 0.8;
const CROSSOVER_RATE: f64 = 0.9;

/// Differential evolution (DE/rand/1/bin) over [0,1]^D, minimizing.
///
/// For each target, a mutant `xₐ + F·(xᵦ − xᵧ)` is built from three
/// distinct other members, binomially crossed with the target (one gene
/// forced from the mutant), clamped, and kept only if it scores no worse.
pub fn search(
    objective: &dyn Objective,
    population_size: usize,
    max_evaluations: usize,
    rng: &mut StdRng,
) -> SearchOutcome {
    let dimension = objective.dimension();
    let mut budget = EvaluationBudget::new(max_evaluations);

    let mut population: Vec<Vec<f64>> = (0..budget.take(population_size))
        .map(|_| random_vector(dimension, rng))
        .collect();
    let mut scores = evaluate_all(objective, &population);

    let best = argmin(&scores);
    let mut best_vector = population[best].clone();
    let mut best_score = scores[best];

    while !budget.is_exhausted() {
        let num_trials = budget.take(population.len());
        let mut trials = Vec::with_capacity(num_trials);

        for target in 0..num_trials {
            let (a, b, c) = pick_distinct(population.len(), target, rng);

            let mut trial = population[target].clone();
            let forced = rng.gen_range(0..dimension);
            for d in 0..dimension {
                if d == forced || rng.gen::<f64>() < CROSSOVER_RATE {
                    trial[d] = population[a][d]
                        + MUTATION_FACTOR * (population[b][d] - population[c][d]);
                }
            }
            clamp_unit(&mut trial);
            trials.push(trial);
        }

        let trial_scores = evaluate_all(objective, &trials);

        for (target, (trial, score)) in trials.into_iter().zip(trial_scores).enumerate() {
            if score <= scores[target] {
                if score < best_score {
                    best_score = score;
                    best_vector = trial.clone();
                }
                population[target] = trial;
                scores[target] = score;
            }
        }
    }

    SearchOutcome {
        best_vector,
        best_score,
        evaluations: budget.used(),
    }
}

/// Three distinct indices, all different from `target`.
fn pick_distinct(len: usize, target: usize, rng: &mut StdRng) -> (usize, usize, usize) {
    let mut pick = |taken: &[usize]| loop {
        let index = rng.gen_range(0..len);
        if index != target && !taken.contains(&index) {
            return index;
        }
    };
    let a = pick(&[]);
    let b = pick(&[a]);
    let c = pick(&[a, b]);
    (a, b, c)
}
