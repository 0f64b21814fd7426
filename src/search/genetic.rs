use super::{argmin, evaluate_all, random_vector, EvaluationBudget, Objective, SearchOutcome};
use rand::rngs::StdRng;
use rand::Rng;

const ELITISM_RATE: f64 = 0.1;
const CROSSOVER_RATE: f64 = 0.9;
const MUTATION_RATE: f64 = 0.1;
const TOURNAMENT_SIZE: usize = 3;

/// Generational genetic algorithm over real genes in [0,1], minimizing.
///
/// Elitism carries the best individuals forward unchanged; the rest of each
/// generation comes from tournament selection, single-point crossover and
/// per-gene uniform mutation.
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
        let mut next_generation = Vec::with_capacity(population.len());

        // Elitism: keep the lowest-scoring individuals as-is.
        let elite_count = ((population.len() as f64 * ELITISM_RATE) as usize).max(1);
        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by(|&a, &b| {
            scores[a]
                .partial_cmp(&scores[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for &index in ranked.iter().take(elite_count) {
            next_generation.push(population[index].clone());
        }

        while next_generation.len() < population.len() {
            if rng.gen::<f64>() < CROSSOVER_RATE {
                let parent1 = tournament_selection(&population, &scores, rng);
                let parent2 = tournament_selection(&population, &scores, rng);
                let (mut child1, mut child2) = crossover(&parent1, &parent2, rng);

                mutate(&mut child1, rng);
                mutate(&mut child2, rng);

                next_generation.push(child1);
                if next_generation.len() < population.len() {
                    next_generation.push(child2);
                }
            } else {
                let mut child = tournament_selection(&population, &scores, rng);
                mutate(&mut child, rng);
                next_generation.push(child);
            }
        }

        next_generation.truncate(budget.take(next_generation.len()));
        let next_scores = evaluate_all(objective, &next_generation);

        for (individual, score) in next_generation.iter().zip(&next_scores) {
            if *score < best_score {
                best_score = *score;
                best_vector = individual.clone();
            }
        }

        if next_generation.len() < population.len() {
            // Budget ran out mid-generation; the partial batch already
            // contributed to the best tracking above.
            break;
        }
        population = next_generation;
        scores = next_scores;
    }

    SearchOutcome {
        best_vector,
        best_score,
        evaluations: budget.used(),
    }
}

/// Tournament selection: best (lowest-scoring) of K random candidates.
fn tournament_selection(
    population: &[Vec<f64>],
    scores: &[f64],
    rng: &mut StdRng,
) -> Vec<f64> {
    let mut best_index = rng.gen_range(0..population.len());
    for _ in 1..TOURNAMENT_SIZE {
        let index = rng.gen_range(0..population.len());
        if scores[index] < scores[best_index] {
            best_index = index;
        }
    }
    population[best_index].clone()
}

/// Single-point crossover: swap gene segments past a random cut.
fn crossover(
    parent1: &[f64],
    parent2: &[f64],
    rng: &mut StdRng,
) -> (Vec<f64>, Vec<f64>) {
    let len = parent1.len();
    if len <= 1 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let point = rng.gen_range(1..len);
    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();
    child1[point..].copy_from_slice(&parent2[point..]);
    child2[point..].copy_from_slice(&parent1[point..]);

    (child1, child2)
}

/// Per-gene mutation: resample within [0,1] at the mutation rate.
fn mutate(individual: &mut [f64], rng: &mut StdRng) {
    for gene in individual.iter_mut() {
        if rng.gen::<f64>() < MUTATION_RATE {
            *gene = rng.gen::<f64>();
        }
    }
}
