//! In-memory cache of the last cycle listing.

use std::sync::RwLock;

use super::investments_model::InvestmentCycle;

/// Holds the most recent cycle listing for rendering.
///
/// The store is replaced wholesale after each successful refresh and never
/// patched field by field. Concurrent refreshes are last-writer-wins.
#[derive(Debug, Default)]
pub struct CycleStore {
    cycles: RwLock<Vec<InvestmentCycle>>,
    refreshes: RwLock<u64>,
}

impl CycleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new listing.
    pub fn replace(&self, cycles: Vec<InvestmentCycle>) {
        *self.cycles.write().unwrap_or_else(|e| e.into_inner()) = cycles;
        *self.refreshes.write().unwrap_or_else(|e| e.into_inner()) += 1;
    }

    pub fn snapshot(&self) -> Vec<InvestmentCycle> {
        self.cycles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get(&self, cycle_id: &str) -> Option<InvestmentCycle> {
        self.cycles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|c| c.id == cycle_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.cycles.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of listings swapped in since creation or the last clear.
    pub fn refresh_count(&self) -> u64 {
        *self.refreshes.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn clear(&self) {
        self.cycles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        *self.refreshes.write().unwrap_or_else(|e| e.into_inner()) = 0;
    }
}
