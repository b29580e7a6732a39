// src/types.rs

use crate::taxtree::{Rank, TaxId};

/// One read-to-taxon assignment, from either the prediction table or the
/// truth table. A read may appear multiple times on the prediction side
/// (multiple hits); the truth side is expected to carry it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAssignment {
    pub read_id: String,
    pub tax_id: TaxId,
}

impl ReadAssignment {
    pub fn new(read_id: impl Into<String>, tax_id: impl Into<TaxId>) -> Self {
        Self {
            read_id: read_id.into(),
            tax_id: tax_id.into(),
        }
    }
}

/// Raw per-rank comparison counts, before any ratio is derived.
///
/// `classified` / `unique_classified` / `unclassified` are judged against
/// the truth table; `raw_classified` / `raw_unique_classified` count the
/// prediction side alone (reads with at least one surviving prediction at
/// this rank, and the subset with exactly one distinct promoted id).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankCounts {
    pub classified: u64,
    pub unique_classified: u64,
    pub unclassified: u64,
    pub raw_classified: u64,
    pub raw_unique_classified: u64,
}

impl RankCounts {
    /// Truth reads that were evaluable at this rank.
    pub fn num_cases(&self) -> u64 {
        self.classified + self.unclassified
    }
}

/// Comparison result for one rank, with the four derived ratios.
/// A ratio is `None` when its denominator was zero (no evaluable cases, or
/// no predicted reads, at this rank) and is reported as not-applicable.
#[derive(Debug, Clone, PartialEq)]
pub struct RankReport {
    pub rank: Rank,
    pub counts: RankCounts,
    pub sensitivity: Option<f64>,
    pub precision: Option<f64>,
    pub unique_sensitivity: Option<f64>,
    pub unique_precision: Option<f64>,
}
