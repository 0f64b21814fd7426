use super::{argmin, clamp_unit, evaluate_all, random_vector, EvaluationBudget, Objective, SearchOutcome};
use rand::rngs::StdRng;
use rand::Rng;

const BETA0: f64 = 1.0;
const GAMMA: f64 = 1.0;
const ALPHA_START: f64 = 0.25;
const ALPHA_DECAY: f64 = 0.97;

/// Firefly algorithm over [0,1]^D, minimizing.
///
/// Each firefly moves toward every brighter (lower-scoring) one with
/// attractiveness `β0·exp(-γ·r²)` plus a random walk whose amplitude α
/// decays per generation. Moves are computed against a snapshot of the
/// population, so the whole moved generation can be scored as one parallel
/// batch.
pub fn search(
    objective: &dyn Objective,
    population_size: usize,
    max_evaluations: usize,
    rng: &mut StdRng,
) -> SearchOutcome {
    let dimension = objective.dimension();
    let mut budget = EvaluationBudget::new(max_evaluations);

    let mut positions: Vec<Vec<f64>> = (0..budget.take(population_size))
        .map(|_| random_vector(dimension, rng))
        .collect();
    let mut intensity = evaluate_all(objective, &positions);

    let best = argmin(&intensity);
    let mut best_vector = positions[best].clone();
    let mut best_score = intensity[best];

    let mut alpha = ALPHA_START;
    while !budget.is_exhausted() {
        let snapshot = positions.clone();
        let mut moved = Vec::with_capacity(snapshot.len());

        for i in 0..snapshot.len() {
            let mut position = snapshot[i].clone();
            for j in 0..snapshot.len() {
                if intensity[j] < intensity[i] {
                    let r2: f64 = position
                        .iter()
                        .zip(&snapshot[j])
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum();
                    let beta = BETA0 * (-GAMMA * r2).exp();
                    for d in 0..dimension {
                        position[d] += beta * (snapshot[j][d] - position[d])
                            + alpha * (rng.gen::<f64>() - 0.5);
                    }
                }
            }
            clamp_unit(&mut position);
            moved.push(position);
        }

        moved.truncate(budget.take(moved.len()));
        let scores = evaluate_all(objective, &moved);

        for (i, (position, score)) in moved.into_iter().zip(scores).enumerate() {
            if score < best_score {
                best_score = score;
                best_vector = position.clone();
            }
            positions[i] = position;
            intensity[i] = score;
        }

        alpha *= ALPHA_DECAY;
    }

    SearchOutcome {
        best_vector,
        best_score,
        evaluations: budget.used(),
    }
}
