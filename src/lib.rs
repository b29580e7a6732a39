// src/lib.rs
pub mod compare;
pub mod errors;
pub mod readers;
pub mod report;
pub mod taxtree;
pub mod types;

pub use crate::compare::{compare_at_rank, STRAIN_RANK};
pub use crate::errors::TaxonomyError;
pub use crate::report::{evaluate_ranks, format_report, DEFAULT_RANK_LIST};
pub use crate::taxtree::{Rank, TaxId, TaxonNode, TaxonomyTree};
pub use crate::types::{RankCounts, RankReport, ReadAssignment};

use crate::readers::{read_prediction_file, read_taxonomy_file, read_truth_file};

/// Evaluate a classifier's output against a truth table, straight from
/// file paths.
///
/// Reads the taxonomy, truth, and prediction tables (gzip-transparent),
/// then compares the two assignment lists at every rank in `ranks`.
/// Returns one `RankReport` per requested rank, in order; render them with
/// [`format_report`] for the classic text block.
pub fn evaluate_files(
    prediction_path: &str,
    truth_path: &str,
    taxonomy_path: &str,
    ranks: &[String],
) -> Result<Vec<RankReport>, Box<dyn std::error::Error>> {
    // 1. Build the taxonomy tree
    let tree = read_taxonomy_file(taxonomy_path)?;

    // 2. Load both assignment tables
    let truth = read_truth_file(truth_path)?;
    let predicted = read_prediction_file(prediction_path)?;
    log::info!(
        "loaded {} truth and {} predicted assignments",
        truth.len(),
        predicted.len()
    );

    // 3. Compare at every requested rank
    let reports = evaluate_ranks(&predicted, &truth, &tree, ranks)?;
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_fixture(dir: &PathBuf, name: &str, contents: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, contents).expect("could not write fixture");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_evaluate_files_api() {
        let dir = std::env::temp_dir().join("taxeval_rs_lib_test");
        fs::create_dir_all(&dir).expect("could not create fixture dir");

        let tree_path = write_fixture(
            &dir,
            "nodes.dmp",
            "1\t|\t1\t|\troot\t|\n2\t|\t1\t|\tphylum\t|\n3\t|\t2\t|\tspecies\t|\n4\t|\t2\t|\tspecies\t|\n",
        );
        let truth_path = write_fixture(&dir, "truth.tsv", "r1 3\nr2 4\n");
        let prediction_path = write_fixture(
            &dir,
            "predictions.tsv",
            "readID\tseqID\tscore\nr1\t3\t255\nr2\t3\t201\n",
        );

        let ranks: Vec<String> = ["species", "phylum"].iter().map(|r| r.to_string()).collect();
        let reports = evaluate_files(&prediction_path, &truth_path, &tree_path, &ranks)
            .expect("evaluation failed");

        assert_eq!(reports.len(), 2);

        // species: r1 matches, r2 was predicted as a different species
        assert_eq!(reports[0].rank, "species");
        assert_eq!(reports[0].counts.classified, 1);
        assert_eq!(reports[0].counts.unclassified, 1);
        assert_eq!(reports[0].counts.raw_classified, 2);

        // phylum: both promote to 2, so both reads match
        assert_eq!(reports[1].rank, "phylum");
        assert_eq!(reports[1].counts.classified, 2);
        assert_eq!(reports[1].sensitivity, Some(1.0));

        let text = format_report(&reports);
        assert!(text.contains("\t\tspecies\n"));
        assert!(text.contains("\t\tphylum\n"));

        fs::remove_dir_all(&dir).ok();
    }
}
