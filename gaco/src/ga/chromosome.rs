use std::cmp::Reverse;

use cutstock_rs::entities::PartCatalog;
use rand::prelude::SmallRng;
use rand::seq::SliceRandom;

/// A placement-priority ordering: a permutation of part ids `0..N`.
/// Never mutated in place; every transformation yields a fresh individual.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Chromosome {
    pub genes: Vec<usize>,
}

impl Chromosome {
    pub fn new(genes: Vec<usize>) -> Self {
        Chromosome { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// Seeds the initial population: five deterministic greedy orderings
/// (descending width, height, area, perimeter and aspect ratio), the rest
/// uniformly random permutations. Ties in the greedy sorts keep input
/// order.
pub fn seed_population(
    catalog: &PartCatalog,
    population_size: usize,
    rng: &mut SmallRng,
) -> Vec<Chromosome> {
    let base: Vec<usize> = (0..catalog.n_parts()).collect();
    let part = |&id: &usize| &catalog.parts[id];

    let mut population = Vec::with_capacity(population_size);
    for key in [
        (|p| p.width) as fn(&cutstock_rs::entities::Part) -> i64,
        |p| p.height,
        |p| p.area,
        |p| p.perimeter(),
    ] {
        let mut genes = base.clone();
        genes.sort_by_key(|id| Reverse(key(part(id))));
        population.push(Chromosome::new(genes));
    }

    let mut by_aspect = base.clone();
    by_aspect.sort_by(|a, b| {
        // descending max/min ratio, compared by cross-multiplication to
        // stay in integer arithmetic
        let (a, b) = (part(a), part(b));
        let (max_a, min_a) = (a.width.max(a.height), a.width.min(a.height));
        let (max_b, min_b) = (b.width.max(b.height), b.width.min(b.height));
        (max_b * min_a).cmp(&(max_a * min_b))
    });
    population.push(Chromosome::new(by_aspect));

    while population.len() < population_size {
        let mut genes = base.clone();
        genes.shuffle(rng);
        population.push(Chromosome::new(genes));
    }
    population.truncate(population_size);
    population
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutstock_rs::util::assertions;
    use rand::SeedableRng;

    fn catalog() -> PartCatalog {
        PartCatalog::new(200, 200, &[(10, 80), (50, 50), (100, 5), (30, 30)]).unwrap()
    }

    #[test]
    fn greedy_seeds_follow_their_sort_keys() {
        let mut rng = SmallRng::seed_from_u64(0);
        let population = seed_population(&catalog(), 8, &mut rng);

        assert_eq!(population.len(), 8);
        // width: 100x5, 50x50, 30x30, 10x80
        assert_eq!(population[0].genes, vec![2, 1, 3, 0]);
        // height: 10x80, 50x50, 30x30, 100x5
        assert_eq!(population[1].genes, vec![0, 1, 3, 2]);
        // area: 2500, 800, 900, 500 -> 50x50, 30x30, 10x80, 100x5
        assert_eq!(population[2].genes, vec![1, 3, 0, 2]);
        // perimeter: 180, 200, 210, 120 -> 100x5, 50x50, 10x80, 30x30
        assert_eq!(population[3].genes, vec![2, 1, 0, 3]);
        // aspect ratio: 8, 1, 20, 1 -> 100x5, 10x80, 50x50, 30x30
        assert_eq!(population[4].genes, vec![2, 0, 1, 3]);
    }

    #[test]
    fn every_individual_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        let population = seed_population(&catalog(), 20, &mut rng);
        assert!(
            population
                .iter()
                .all(|c| assertions::is_permutation(&c.genes, 4))
        );
    }

    #[test]
    fn tiny_population_truncates_the_greedy_seeds() {
        let mut rng = SmallRng::seed_from_u64(0);
        let population = seed_population(&catalog(), 2, &mut rng);
        assert_eq!(population.len(), 2);
    }
}
