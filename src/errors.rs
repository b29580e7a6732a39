// src/errors.rs

use thiserror::Error;

use crate::taxtree::TaxId;

/// Failures surfaced by taxonomy construction and the upward walks.
///
/// Promotion failure ("no ancestor at that rank") is deliberately *not* an
/// error variant: the comparator consumes it locally as an exclude-this-read
/// signal, so it travels as `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// The same taxon id occurred twice while building the tree.
    /// Hierarchy integrity is a precondition, so this aborts the run.
    #[error("duplicate taxon id {0} in taxonomy input")]
    DuplicateId(TaxId),

    /// An ancestor walk started from, or reached, an id the tree does
    /// not contain.
    #[error("unknown taxon id {0}")]
    UnknownTaxon(TaxId),

    /// An upward walk revisited a node without passing through the
    /// self-referencing root. The input contains a cycle.
    #[error("taxonomy cycle detected at taxon id {0}")]
    CycleDetected(TaxId),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
