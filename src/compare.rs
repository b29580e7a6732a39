// src/compare.rs

use ahash::{AHashMap, AHashSet};

use crate::errors::TaxonomyError;
use crate::taxtree::{TaxId, TaxonomyTree};
use crate::types::{RankCounts, ReadAssignment};

/// Rank at which assignments are taken as-is instead of being promoted.
pub const STRAIN_RANK: &str = "strain";

/// Compare predicted assignments against the truth table at one rank.
///
/// For ranks other than "strain", every taxon id on both sides is promoted
/// to its ancestor at `rank`; assignments whose promotion fails are dropped,
/// so an imperfect hierarchy degrades coverage instead of aborting. At
/// "strain" no promotion happens: ids are used raw (even ids the tree does
/// not contain), except that interior ids -- anything that is another
/// node's parent -- are excluded from both sides, since an interior node
/// cannot be a strain-level leaf.
///
/// A truth read counts classified when its promoted id is among the read's
/// distinct promoted predictions, uniquely classified when that prediction
/// set has exactly one member, and unclassified otherwise (including when
/// the read has no surviving prediction at all). The raw counts summarize
/// the prediction side alone.
pub fn compare_at_rank(
    predicted: &[ReadAssignment],
    truth: &[ReadAssignment],
    tree: &TaxonomyTree,
    rank: &str,
) -> Result<RankCounts, TaxonomyError> {
    let ancestors = if rank == STRAIN_RANK {
        tree.ancestor_ids()
    } else {
        AHashSet::new()
    };

    // read id -> distinct promoted taxon ids surviving at this rank
    let mut predictions: AHashMap<&str, AHashSet<TaxId>> = AHashMap::new();
    for assignment in predicted {
        let Some(rank_tax_id) = resolve_at_rank(&assignment.tax_id, tree, rank, &ancestors)?
        else {
            continue;
        };
        predictions
            .entry(assignment.read_id.as_str())
            .or_default()
            .insert(rank_tax_id);
    }

    let mut counts = RankCounts::default();
    for assignment in truth {
        let Some(rank_tax_id) = resolve_at_rank(&assignment.tax_id, tree, rank, &ancestors)?
        else {
            continue;
        };
        match predictions.get(assignment.read_id.as_str()) {
            None => counts.unclassified += 1,
            Some(maps) if maps.contains(&rank_tax_id) => {
                counts.classified += 1;
                if maps.len() == 1 {
                    counts.unique_classified += 1;
                }
            }
            Some(_) => counts.unclassified += 1,
        }
    }

    counts.raw_classified = predictions.len() as u64;
    counts.raw_unique_classified = predictions.values().filter(|maps| maps.len() == 1).count() as u64;

    Ok(counts)
}

/// Map one taxon id to the id it represents at `rank`, or `None` when the
/// assignment does not survive at this rank.
fn resolve_at_rank(
    tax_id: &TaxId,
    tree: &TaxonomyTree,
    rank: &str,
    ancestors: &AHashSet<TaxId>,
) -> Result<Option<TaxId>, TaxonomyError> {
    if rank == STRAIN_RANK {
        if ancestors.contains(tax_id) {
            return Ok(None);
        }
        return Ok(Some(tax_id.clone()));
    }
    tree.promote(tax_id, rank)
}
