// src/report.rs

use std::fmt::Write as FmtWrite;

use rayon::prelude::*;

use crate::compare::compare_at_rank;
use crate::errors::TaxonomyError;
use crate::taxtree::TaxonomyTree;
use crate::types::{RankCounts, RankReport, ReadAssignment};

/// Ranks evaluated when the caller does not ask for a specific list.
pub const DEFAULT_RANK_LIST: &str = "strain,species,genus,family,order,class,phylum";

/// Run the comparator for every rank in `ranks` and derive the ratios.
///
/// Ranks are evaluated in parallel: each comparison is read-only over the
/// shared tree and the collect preserves the requested order.
pub fn evaluate_ranks(
    predicted: &[ReadAssignment],
    truth: &[ReadAssignment],
    tree: &TaxonomyTree,
    ranks: &[String],
) -> Result<Vec<RankReport>, TaxonomyError> {
    ranks
        .par_iter()
        .map(|rank| {
            let counts = compare_at_rank(predicted, truth, tree, rank)?;
            log::info!(
                "rank {}: {} classified, {} unclassified, {} predicted reads",
                rank,
                counts.classified,
                counts.unclassified,
                counts.raw_classified
            );
            Ok(build_report(rank.clone(), counts))
        })
        .collect()
}

/// Derive the four sensitivity/precision ratios from raw counts.
/// A zero denominator yields `None` rather than aborting the report.
pub fn build_report(rank: String, counts: RankCounts) -> RankReport {
    let num_cases = counts.num_cases();
    RankReport {
        rank,
        counts,
        sensitivity: ratio(counts.classified, num_cases),
        precision: ratio(counts.classified, counts.raw_classified),
        unique_sensitivity: ratio(counts.unique_classified, num_cases),
        unique_precision: ratio(counts.unique_classified, counts.raw_unique_classified),
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Render the classic indented per-rank evaluation block.
pub fn format_report(reports: &[RankReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let counts = &report.counts;
        let num_cases = counts.num_cases();
        writeln!(out, "\t\t{}", report.rank).unwrap();
        writeln!(
            out,
            "\t\t\tsensitivity: {} / {} ({})",
            with_commas(counts.classified),
            with_commas(num_cases),
            percent(report.sensitivity)
        )
        .unwrap();
        writeln!(
            out,
            "\t\t\tprecision  : {} / {} ({})",
            with_commas(counts.classified),
            with_commas(counts.raw_classified),
            percent(report.precision)
        )
        .unwrap();
        writeln!(out, "\n\t\t\tfor uniquely classified").unwrap();
        writeln!(
            out,
            "\t\t\t\t\tsensitivity: {} / {} ({})",
            with_commas(counts.unique_classified),
            with_commas(num_cases),
            percent(report.unique_sensitivity)
        )
        .unwrap();
        writeln!(
            out,
            "\t\t\t\t\tprecision  : {} / {} ({})",
            with_commas(counts.unique_classified),
            with_commas(counts.raw_unique_classified),
            percent(report.unique_precision)
        )
        .unwrap();
    }
    out
}

fn percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => "N/A".to_string(),
    }
}

/// Group digits in threes: 1234567 -> "1,234,567".
fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxtree::TaxonomyTree;
    use crate::types::ReadAssignment;

    fn small_tree() -> TaxonomyTree {
        TaxonomyTree::from_records(
            [
                ("1", "1", "root"),
                ("2", "1", "phylum"),
                ("3", "2", "species"),
            ]
            .into_iter()
            .map(|(t, p, r)| (t.to_string(), p.to_string(), r.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn ratios_follow_the_counts() {
        let counts = RankCounts {
            classified: 3,
            unique_classified: 2,
            unclassified: 1,
            raw_classified: 4,
            raw_unique_classified: 2,
        };
        let report = build_report("species".to_string(), counts);
        assert_eq!(report.sensitivity, Some(0.75));
        assert_eq!(report.precision, Some(0.75));
        assert_eq!(report.unique_sensitivity, Some(0.5));
        assert_eq!(report.unique_precision, Some(1.0));
    }

    #[test]
    fn zero_denominators_are_not_applicable() {
        let report = build_report("genus".to_string(), RankCounts::default());
        assert_eq!(report.sensitivity, None);
        assert_eq!(report.precision, None);
        assert_eq!(report.unique_sensitivity, None);
        assert_eq!(report.unique_precision, None);

        let text = format_report(&[report]);
        assert!(text.contains("N/A"));
    }

    #[test]
    fn evaluate_ranks_keeps_request_order() {
        let tree = small_tree();
        let predicted = vec![ReadAssignment::new("r1", "3")];
        let truth = vec![ReadAssignment::new("r1", "3")];
        let ranks: Vec<String> = ["species", "phylum", "genus"]
            .iter()
            .map(|r| r.to_string())
            .collect();
        let reports = evaluate_ranks(&predicted, &truth, &tree, &ranks).unwrap();
        let got: Vec<_> = reports.iter().map(|r| r.rank.as_str()).collect();
        assert_eq!(got, vec!["species", "phylum", "genus"]);
        assert_eq!(reports[0].sensitivity, Some(1.0));
        // nothing promotes to genus in this tree
        assert_eq!(reports[2].sensitivity, None);
    }

    #[test]
    fn report_text_lists_fractions_and_percentages() {
        let counts = RankCounts {
            classified: 1,
            unique_classified: 1,
            unclassified: 0,
            raw_classified: 1,
            raw_unique_classified: 1,
        };
        let text = format_report(&[build_report("species".to_string(), counts)]);
        assert!(text.contains("\t\tspecies\n"));
        assert!(text.contains("sensitivity: 1 / 1 (100.00%)"));
        assert!(text.contains("for uniquely classified"));
    }

    #[test]
    fn commas_group_digits_in_threes() {
        assert_eq!(with_commas(0), "0");
        assert_eq!(with_commas(999), "999");
        assert_eq!(with_commas(1000), "1,000");
        assert_eq!(with_commas(1234567), "1,234,567");
    }
}
