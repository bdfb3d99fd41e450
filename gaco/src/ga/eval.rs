use std::collections::{HashMap, VecDeque};

use cutstock_rs::entities::Placement;

/// Upper bound on memoized decode results; the oldest insertion is
/// evicted when exceeded (FIFO, not LRU).
pub const FITNESS_CACHE_CAPACITY: usize = 1000;

/// Penalty per sheet in use.
const SHEET_PENALTY: f64 = 5000.0;
/// Last-sheet usage ratio below which the under-utilization penalty kicks in.
const LAST_SHEET_MIN_RATIO: f64 = 0.3;
/// Weight of the last-sheet under-utilization penalty.
const LAST_SHEET_PENALTY: f64 = 50000.0;

/// Scores a decoded layout, lower is better: wasted area, plus a fixed
/// penalty per sheet, plus an extra penalty when the last sheet is filled
/// below 30%. An empty layout scores worst-possible.
pub fn fitness(sheet_area: i64, placements: &[Placement]) -> f64 {
    if placements.is_empty() {
        return f64::MAX;
    }

    let used_area: i64 = placements.iter().map(|p| p.width * p.height).sum();
    let max_sheet = placements.iter().map(|p| p.sheet).max().unwrap_or(0);
    let sheets_count = (max_sheet + 1) as i64;

    let total_area = sheets_count * sheet_area;
    let waste_area = total_area - used_area;
    let mut fitness = waste_area as f64;

    let last_sheet_used: i64 = placements
        .iter()
        .filter(|p| p.sheet == max_sheet)
        .map(|p| p.width * p.height)
        .sum();
    let last_sheet_ratio = last_sheet_used as f64 / sheet_area as f64;
    if last_sheet_ratio < LAST_SHEET_MIN_RATIO {
        fitness += (LAST_SHEET_MIN_RATIO - last_sheet_ratio) * LAST_SHEET_PENALTY;
    }

    fitness + sheets_count as f64 * SHEET_PENALTY
}

/// A memoized decode result for one ordering.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub fitness: f64,
    pub placements: Vec<Placement>,
}

/// Decode+score results keyed by the exact ordering, bounded by
/// [`FITNESS_CACHE_CAPACITY`] with oldest-insertion-first eviction.
pub struct FitnessCache {
    entries: HashMap<Vec<usize>, CacheEntry>,
    insertion_order: VecDeque<Vec<usize>>,
    capacity: usize,
}

impl FitnessCache {
    pub fn new() -> Self {
        Self::with_capacity(FITNESS_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FitnessCache {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, genes: &[usize]) -> Option<&CacheEntry> {
        self.entries.get(genes)
    }

    /// Inserts a fresh entry, evicting the oldest one when over capacity.
    /// Re-inserting a present key leaves the cache unchanged.
    pub fn insert(&mut self, genes: Vec<usize>, entry: CacheEntry) {
        if self.entries.contains_key(&genes) {
            return;
        }
        self.insertion_order.push_back(genes.clone());
        self.entries.insert(genes, entry);
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FitnessCache {
    fn default() -> Self {
        Self::new()
    }
}
