use std::collections::{HashMap, HashSet};
use std::time::Instant;

use anyhow::Result;
use cutstock_rs::decoder;
use cutstock_rs::entities::{PartCatalog, Placement};
use cutstock_rs::freespace::ScrapFilter;
use cutstock_rs::util::assertions;
use itertools::Itertools;
use log::{debug, info};
use ordered_float::OrderedFloat;
use rand::prelude::SmallRng;
use rayon::prelude::*;
use thousands::Separable;

use crate::config::GACConfig;
use crate::ga::chromosome::seed_population;
use crate::ga::eval::{CacheEntry, FitnessCache, fitness};
use crate::ga::operators::{elite_indices, mutate, order_crossover, tournament_select};
use crate::ga::Chromosome;
use crate::redistribute::redistribute;

/// Improvements below this threshold count as a stalled generation.
const CONVERGENCE_EPSILON: f64 = 0.001;
/// Number of consecutive stalled generations that ends the search.
const MAX_STALLED_GENERATIONS: usize = 8;

/// Genetic-algorithm optimizer for the cutting-stock problem: evolves
/// placement orderings, decoding each through the greedy guillotine
/// decoder and keeping the best layout ever seen.
pub struct GeneticOptimizer {
    pub catalog: PartCatalog,
    pub config: GACConfig,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    pub rng: SmallRng,
    cache: FitnessCache,
}

impl GeneticOptimizer {
    pub fn new(catalog: PartCatalog, config: GACConfig, rng: SmallRng) -> Self {
        assert!(config.population_size > 0);
        Self {
            catalog,
            config,
            rng,
            cache: FitnessCache::new(),
        }
    }

    /// Runs the full search and returns the redistributed best layout.
    ///
    /// Generation 0 is always evaluated, even with a generation budget of
    /// zero, so a real layout is returned in every configuration.
    pub fn solve(&mut self) -> Result<Vec<Placement>> {
        let start = Instant::now();
        let filter = self.config.scrap_filter();

        let mut population =
            seed_population(&self.catalog, self.config.population_size, &mut self.rng);

        let mut best_fitness = f64::MAX;
        let mut best_placements: Vec<Placement> = Vec::new();
        let mut last_best_fitness = f64::MAX;
        let mut stalled_generations = 0;

        let generations = self.config.generations.max(1);
        for generation in 0..generations {
            let fitnesses = self.evaluate(&population, filter)?;

            let gen_best_idx = fitnesses
                .iter()
                .position_min_by_key(|f| OrderedFloat(**f))
                .unwrap_or(0);
            if fitnesses[gen_best_idx] < best_fitness {
                best_fitness = fitnesses[gen_best_idx];
                best_placements = self.placements_of(&population[gen_best_idx], filter)?;
            }

            debug!(
                "[GA] generation {generation}: best fitness {best_fitness:.1}, {} cached layouts",
                self.cache.len().separate_with_commas()
            );

            if (best_fitness - last_best_fitness).abs() < CONVERGENCE_EPSILON {
                stalled_generations += 1;
                if stalled_generations >= MAX_STALLED_GENERATIONS {
                    info!("[GA] converged after {} generations", generation + 1);
                    break;
                }
            } else {
                stalled_generations = 0;
                last_best_fitness = best_fitness;
            }

            population = self.next_generation(population, &fitnesses);
        }

        info!(
            "[GA] search finished in {:.3}ms, best fitness {:.1}",
            start.elapsed().as_secs_f64() * 1000.0,
            best_fitness
        );

        let placements = redistribute(&self.catalog, best_placements, filter);
        debug_assert!(assertions::no_overlaps(&placements));
        debug_assert!(assertions::placements_match_catalog(
            &placements,
            &self.catalog
        ));
        Ok(placements)
    }

    /// Fitness of every individual, decoding cache misses in parallel.
    ///
    /// Results are kept in a generation-local map, so individuals evicted
    /// from the cache mid-generation still report a fitness; misses are
    /// inserted in first-appearance order to keep eviction deterministic.
    fn evaluate(&mut self, population: &[Chromosome], filter: ScrapFilter) -> Result<Vec<f64>> {
        let mut fitness_by_genes: HashMap<&[usize], f64> = HashMap::new();
        let mut queued: HashSet<&[usize]> = HashSet::new();
        let mut misses: Vec<&Chromosome> = Vec::new();

        for chromosome in population {
            let genes = chromosome.genes.as_slice();
            if fitness_by_genes.contains_key(genes) || queued.contains(genes) {
                continue;
            }
            match self.cache.get(genes) {
                Some(entry) => {
                    fitness_by_genes.insert(genes, entry.fitness);
                }
                None => {
                    queued.insert(genes);
                    misses.push(chromosome);
                }
            }
        }

        let catalog = &self.catalog;
        let sheet_area = catalog.sheet_area();
        let decoded = misses
            .par_iter()
            .map(|chromosome| {
                let placements = decoder::decode(catalog, &chromosome.genes, filter)?;
                Ok((fitness(sheet_area, &placements), placements))
            })
            .collect::<Result<Vec<_>>>()?;

        for (chromosome, (fitness, placements)) in misses.iter().zip(decoded) {
            fitness_by_genes.insert(&chromosome.genes, fitness);
            self.cache.insert(
                chromosome.genes.clone(),
                CacheEntry {
                    fitness,
                    placements,
                },
            );
        }

        Ok(population
            .iter()
            .map(|c| fitness_by_genes[c.genes.as_slice()])
            .collect())
    }

    /// Layout of one individual, re-decoded if the cache evicted it.
    fn placements_of(&self, chromosome: &Chromosome, filter: ScrapFilter) -> Result<Vec<Placement>> {
        match self.cache.get(&chromosome.genes) {
            Some(entry) => Ok(entry.placements.clone()),
            None => decoder::decode(&self.catalog, &chromosome.genes, filter),
        }
    }

    /// Builds the next generation: elites carried over unchanged, the rest
    /// bred by tournament selection, order crossover and mutation.
    fn next_generation(&mut self, population: Vec<Chromosome>, fitnesses: &[f64]) -> Vec<Chromosome> {
        let population_size = self.config.population_size;
        let elite_count = (population_size as f64 * self.config.elitism_rate) as usize;
        let elite_count = elite_count.max(1);

        let mut next = Vec::with_capacity(population_size);
        for idx in elite_indices(fitnesses, elite_count) {
            next.push(population[idx].clone());
        }

        while next.len() < population_size {
            let parent_1 =
                &population[tournament_select(fitnesses, self.config.tournament_size, &mut self.rng)];
            let parent_2 =
                &population[tournament_select(fitnesses, self.config.tournament_size, &mut self.rng)];
            let (child_1, child_2) = order_crossover(parent_1, parent_2, &mut self.rng);
            next.push(mutate(&child_1, self.config.mutation_rate, &mut self.rng));
            if next.len() < population_size {
                next.push(mutate(&child_2, self.config.mutation_rate, &mut self.rng));
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn optimizer(details: &[(i64, i64)], config: GACConfig) -> GeneticOptimizer {
        let catalog = PartCatalog::new(100, 100, details).unwrap();
        GeneticOptimizer::new(catalog, config, SmallRng::seed_from_u64(0))
    }

    fn small_config() -> GACConfig {
        GACConfig {
            population_size: 20,
            generations: 10,
            prng_seed: Some(0),
            ..GACConfig::default()
        }
    }

    #[test]
    fn solve_places_every_part() {
        let details = [(60, 40), (60, 40), (50, 50), (30, 30), (20, 20)];
        let mut opt = optimizer(&details, small_config());
        let placements = opt.solve().unwrap();

        assert_eq!(placements.len(), details.len());
        assert!(assertions::no_overlaps(&placements));
        assert!(assertions::placements_match_catalog(&placements, &opt.catalog));
    }

    #[test]
    fn zero_generation_budget_still_returns_a_layout() {
        let details = [(60, 40), (60, 40), (50, 50)];
        let config = GACConfig {
            generations: 0,
            ..small_config()
        };
        let mut opt = optimizer(&details, config);
        let placements = opt.solve().unwrap();
        assert_eq!(placements.len(), 3);
    }

    #[test]
    fn identical_seeds_give_identical_results() {
        let details = [(60, 40), (33, 21), (50, 50), (30, 30), (20, 20), (45, 17)];
        let a = optimizer(&details, small_config()).solve().unwrap();
        let b = optimizer(&details, small_config()).solve().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_part_jobs_converge_immediately() {
        let mut opt = optimizer(&[(100, 100)], small_config());
        let placements = opt.solve().unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].sheet, 0);
    }
}
