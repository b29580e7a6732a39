// src/taxtree.rs

use ahash::{AHashMap, AHashSet};

use crate::errors::TaxonomyError;

/// Taxon identifier. Numeric strings in practice (NCBI-style dumps), but the
/// tree only ever compares and hashes them, so any token works.
pub type TaxId = String;

/// Rank label: "strain", "species", "genus", ... Free-form, open set.
pub type Rank = String;

/// Parent pointer plus rank label for one taxon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonNode {
    pub parent: TaxId,
    pub rank: Rank,
}

/// An id -> (parent, rank) taxonomy, built once and read-only afterwards.
///
/// Roots are the nodes whose parent is themselves. Dangling parent
/// references (a parent id the tree does not contain) are tolerated at
/// build time; each walk defines what happens when it reaches one.
#[derive(Debug, Default)]
pub struct TaxonomyTree {
    nodes: AHashMap<TaxId, TaxonNode>,
}

impl TaxonomyTree {
    /// Build the tree from `(id, parent, rank)` records.
    /// A recurring id aborts with `DuplicateId`.
    pub fn from_records<I>(records: I) -> Result<Self, TaxonomyError>
    where
        I: IntoIterator<Item = (TaxId, TaxId, Rank)>,
    {
        let mut nodes = AHashMap::new();
        for (tax_id, parent, rank) in records {
            if nodes.contains_key(&tax_id) {
                return Err(TaxonomyError::DuplicateId(tax_id));
            }
            nodes.insert(tax_id, TaxonNode { parent, rank });
        }
        log::info!("taxonomy tree built with {} nodes", nodes.len());
        Ok(Self { nodes })
    }

    pub fn get(&self, tax_id: &str) -> Option<&TaxonNode> {
        self.nodes.get(tax_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All ids stored in the tree, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Ordered path from the root down to `tax_id` (inclusive).
    ///
    /// Fails with `UnknownTaxon` if `tax_id` is not in the tree, or if the
    /// climb reaches a dangling parent reference. Fails with `CycleDetected`
    /// if the climb revisits a node before hitting a self-parented root.
    pub fn ancestors_of(&self, tax_id: &str) -> Result<Vec<TaxId>, TaxonomyError> {
        if !self.nodes.contains_key(tax_id) {
            return Err(TaxonomyError::UnknownTaxon(tax_id.to_string()));
        }

        let mut path: Vec<TaxId> = Vec::new();
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut cur = tax_id;
        loop {
            path.push(cur.to_string());
            seen.insert(cur);
            let node = self
                .nodes
                .get(cur)
                .ok_or_else(|| TaxonomyError::UnknownTaxon(cur.to_string()))?;
            if node.parent.as_str() == cur {
                break; // self-parented root
            }
            if seen.contains(node.parent.as_str()) {
                return Err(TaxonomyError::CycleDetected(node.parent.clone()));
            }
            cur = node.parent.as_str();
        }
        path.reverse();
        Ok(path)
    }

    /// Union of {root} and all of its descendants, for every root in `roots`.
    ///
    /// Every id outside the cache climbs toward a root, recording its path;
    /// the climb stops at the first cached id (whose membership flag the
    /// whole path inherits), at a self-parented root outside `roots`, or at
    /// a dangling parent (both resolve the path as "out"). The flag is then
    /// written back for each path node, so each node is resolved at most
    /// once and total work stays linear in tree size.
    ///
    /// A root id absent from the tree is still a member of the result.
    pub fn subtree(&self, roots: &[TaxId]) -> Result<AHashSet<TaxId>, TaxonomyError> {
        let mut in_subtree: AHashMap<&str, bool> = AHashMap::with_capacity(self.nodes.len());
        let mut members: AHashSet<TaxId> = AHashSet::new();
        for root in roots {
            in_subtree.insert(root.as_str(), true);
            members.insert(root.clone());
        }

        for tax_id in self.nodes.keys() {
            if in_subtree.contains_key(tax_id.as_str()) {
                continue;
            }

            let mut flag = false;
            let mut path: Vec<&str> = Vec::new();
            let mut walked: AHashSet<&str> = AHashSet::new();
            let mut cur = tax_id.as_str();
            loop {
                path.push(cur);
                walked.insert(cur);
                let Some(node) = self.nodes.get(cur) else {
                    break; // dangling parent, lineage cannot reach a queried root
                };
                let parent = node.parent.as_str();
                if let Some(&cached) = in_subtree.get(parent) {
                    flag = cached;
                    break;
                }
                if parent == cur {
                    break; // root outside `roots`
                }
                if walked.contains(parent) {
                    return Err(TaxonomyError::CycleDetected(parent.to_string()));
                }
                cur = parent;
            }

            for id in path {
                in_subtree.insert(id, flag);
                if flag {
                    members.insert(id.to_string());
                }
            }
        }

        Ok(members)
    }

    /// Nearest ancestor of `tax_id` (inclusive) whose rank is `target_rank`.
    ///
    /// `Ok(None)` when `tax_id` is not in the tree, when the climb reaches a
    /// dangling parent, or when the root is reached without a rank match --
    /// a sparse hierarchy and a nonexistent rank are indistinguishable by
    /// design. The rank test precedes the root check, so promoting to the
    /// root's own rank succeeds.
    pub fn promote(&self, tax_id: &str, target_rank: &str) -> Result<Option<TaxId>, TaxonomyError> {
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut cur = tax_id;
        loop {
            let Some(node) = self.nodes.get(cur) else {
                return Ok(None);
            };
            if node.rank == target_rank {
                return Ok(Some(cur.to_string()));
            }
            if node.parent.as_str() == cur {
                return Ok(None);
            }
            seen.insert(cur);
            if seen.contains(node.parent.as_str()) {
                return Err(TaxonomyError::CycleDetected(node.parent.clone()));
            }
            cur = node.parent.as_str();
        }
    }

    /// Every id that is some other node's parent. Parents dangling outside
    /// the tree are included; a childless self-parented root is not.
    pub fn ancestor_ids(&self) -> AHashSet<TaxId> {
        let mut ancestors = AHashSet::new();
        for (tax_id, node) in &self.nodes {
            if node.parent != *tax_id {
                ancestors.insert(node.parent.clone());
            }
        }
        ancestors
    }
}
