use ordered_float::OrderedFloat;
use rand::Rng;
use rand::prelude::SmallRng;

use crate::ga::Chromosome;

/// Probability of the segment-reversal mutation, applied independently of
/// the swap mutation.
const INVERSION_RATE: f64 = 0.05;

/// Draws `tournament_size` individuals at random (with replacement) and
/// returns the index of the fittest draw (strictly lowest fitness wins,
/// the earliest such draw on ties).
pub fn tournament_select(
    fitnesses: &[f64],
    tournament_size: usize,
    rng: &mut SmallRng,
) -> usize {
    let mut best = rng.random_range(0..fitnesses.len());
    for _ in 1..tournament_size {
        let candidate = rng.random_range(0..fitnesses.len());
        if fitnesses[candidate] < fitnesses[best] {
            best = candidate;
        }
    }
    best
}

/// Order crossover (OX): copies a random segment `[start, end]` verbatim
/// from each parent into its child, then fills the remaining positions,
/// walking forward cyclically from `end + 1`, with the other parent's ids
/// in that parent's own cyclic order from `end + 1`, skipping ids already
/// present. Both children are valid permutations.
pub fn order_crossover(
    parent_1: &Chromosome,
    parent_2: &Chromosome,
    rng: &mut SmallRng,
) -> (Chromosome, Chromosome) {
    let n = parent_1.len();
    debug_assert_eq!(n, parent_2.len());
    let start = rng.random_range(0..n);
    let end = rng.random_range(start..n);

    let child_1 = ox_child(&parent_1.genes, &parent_2.genes, start, end);
    let child_2 = ox_child(&parent_2.genes, &parent_1.genes, start, end);
    (Chromosome::new(child_1), Chromosome::new(child_2))
}

fn ox_child(segment_parent: &[usize], fill_parent: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = segment_parent.len();
    let mut child: Vec<Option<usize>> = vec![None; n];
    let mut used = vec![false; n];
    for i in start..=end {
        child[i] = Some(segment_parent[i]);
        used[segment_parent[i]] = true;
    }

    let mut pos = (end + 1) % n;
    let mut fill_pos = (end + 1) % n;
    for _ in 0..n {
        if child[pos].is_none() {
            while used[fill_parent[fill_pos]] {
                fill_pos = (fill_pos + 1) % n;
            }
            child[pos] = Some(fill_parent[fill_pos]);
            used[fill_parent[fill_pos]] = true;
            fill_pos = (fill_pos + 1) % n;
        }
        pos = (pos + 1) % n;
    }

    child.into_iter().flatten().collect()
}

/// Applies the swap mutation with probability `mutation_rate` and,
/// independently, a segment reversal (length >= 2) with probability
/// [`INVERSION_RATE`]. Both may hit the same child.
pub fn mutate(chromosome: &Chromosome, mutation_rate: f64, rng: &mut SmallRng) -> Chromosome {
    let mut genes = chromosome.genes.clone();
    let n = genes.len();

    if rng.random::<f64>() < mutation_rate {
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        genes.swap(a, b);
    }
    if n >= 2 && rng.random::<f64>() < INVERSION_RATE {
        let start = rng.random_range(0..n - 1);
        let end = rng.random_range(start + 1..n);
        genes[start..=end].reverse();
    }

    Chromosome::new(genes)
}

/// Indices of the `elite_count` fittest individuals, ascending by fitness
/// with ties broken by original population order.
pub fn elite_indices(fitnesses: &[f64], elite_count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..fitnesses.len()).collect();
    indices.sort_by_key(|&i| OrderedFloat(fitnesses[i]));
    indices.truncate(elite_count);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutstock_rs::util::assertions;
    use rand::SeedableRng;

    #[test]
    fn ox_fills_cyclically_from_segment_end() {
        // segment [2,5] copied from the first parent, remainder from the
        // second parent's cyclic order starting at position 6
        let p1 = vec![0, 1, 2, 3, 4, 5, 6, 7];
        let p2 = vec![7, 6, 5, 4, 3, 2, 1, 0];
        let child = ox_child(&p1, &p2, 2, 5);
        assert_eq!(child, vec![7, 6, 2, 3, 4, 5, 1, 0]);
    }

    #[test]
    fn crossover_children_are_permutations() {
        let mut rng = SmallRng::seed_from_u64(7);
        let p1 = Chromosome::new(vec![3, 0, 4, 1, 2, 5]);
        let p2 = Chromosome::new(vec![5, 4, 3, 2, 1, 0]);
        for _ in 0..200 {
            let (c1, c2) = order_crossover(&p1, &p2, &mut rng);
            assert!(assertions::is_permutation(&c1.genes, 6));
            assert!(assertions::is_permutation(&c2.genes, 6));
        }
    }

    #[test]
    fn mutation_preserves_the_permutation() {
        let mut rng = SmallRng::seed_from_u64(11);
        let original = Chromosome::new((0..12).collect());
        for _ in 0..200 {
            let mutated = mutate(&original, 1.0, &mut rng);
            assert!(assertions::is_permutation(&mutated.genes, 12));
        }
    }

    #[test]
    fn mutation_skips_inversion_on_short_chromosomes() {
        let mut rng = SmallRng::seed_from_u64(3);
        let single = Chromosome::new(vec![0]);
        for _ in 0..50 {
            assert_eq!(mutate(&single, 1.0, &mut rng).genes, vec![0]);
        }
    }

    #[test]
    fn elites_are_sorted_and_stable() {
        let fitnesses = vec![5.0, 1.0, 3.0, 1.0, 0.5];
        assert_eq!(elite_indices(&fitnesses, 3), vec![4, 1, 3]);
    }

    #[test]
    fn tournament_prefers_lower_fitness() {
        let mut rng = SmallRng::seed_from_u64(99);
        let fitnesses = vec![10.0, 2.0, 30.0, 4.0];
        // with enough draws per tournament the minimum must dominate
        let mut wins = vec![0usize; 4];
        for _ in 0..200 {
            wins[tournament_select(&fitnesses, 4, &mut rng)] += 1;
        }
        assert!(wins[1] > wins[0]);
        assert!(wins[1] > wins[2]);
        assert!(wins[1] > wins[3]);
    }
}
