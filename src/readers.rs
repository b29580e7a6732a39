// src/readers.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::TaxonomyError;
use crate::taxtree::{TaxId, TaxonomyTree};
use crate::types::ReadAssignment;

/// Open a file for line-based reading, decoding through gzip when the
/// path ends with ".gz".
pub fn open_reader<P: AsRef<Path>>(path: P) -> std::io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);
    if is_gz {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parse a nodes.dmp-style taxonomy table into a `TaxonomyTree`.
///
/// Expects at least 5 tab-separated fields per line; field 0 is the taxon
/// id, field 2 the parent id, field 4 the rank (the `|` separator columns
/// of a standard dump land in between and are ignored). Shorter lines are
/// skipped with a warning. A duplicated taxon id is fatal.
pub fn parse_taxonomy<R: BufRead>(reader: R) -> Result<TaxonomyTree, TaxonomyError> {
    let mut records: Vec<(TaxId, TaxId, String)> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            if !line.trim().is_empty() {
                log::warn!("skipping taxonomy line with {} fields", fields.len());
            }
            continue;
        }
        records.push((
            fields[0].trim().to_string(),
            fields[2].trim().to_string(),
            fields[4].trim().to_string(),
        ));
    }
    TaxonomyTree::from_records(records)
}

pub fn read_taxonomy_file<P: AsRef<Path>>(path: P) -> Result<TaxonomyTree, TaxonomyError> {
    parse_taxonomy(open_reader(path)?)
}

/// Parse the truth table: whitespace-separated (read id, taxon id) per
/// line. Lines with fewer than two columns are skipped with a warning.
pub fn parse_truth<R: BufRead>(reader: R) -> Result<Vec<ReadAssignment>, TaxonomyError> {
    let mut truth = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let mut cols = line.split_whitespace();
        match (cols.next(), cols.next()) {
            (Some(read_id), Some(tax_id)) => truth.push(ReadAssignment::new(read_id, tax_id)),
            _ => {
                if !line.trim().is_empty() {
                    log::warn!("skipping truth line without two columns");
                }
            }
        }
    }
    Ok(truth)
}

pub fn read_truth_file<P: AsRef<Path>>(path: P) -> Result<Vec<ReadAssignment>, TaxonomyError> {
    parse_truth(open_reader(path)?)
}

/// Parse the classifier output: tab-separated (read id, taxon id, score)
/// per line. Any line carrying the literal token "seqID" is a header and
/// is skipped, as are lines with fewer than two columns.
pub fn parse_predictions<R: BufRead>(reader: R) -> Result<Vec<ReadAssignment>, TaxonomyError> {
    let mut predictions = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.contains("seqID") {
            continue;
        }
        let mut cols = line.trim_end().split('\t');
        match (cols.next(), cols.next()) {
            (Some(read_id), Some(tax_id)) if !read_id.is_empty() => {
                predictions.push(ReadAssignment::new(read_id, tax_id));
            }
            _ => {
                if !line.trim().is_empty() {
                    log::warn!("skipping prediction line without two columns");
                }
            }
        }
    }
    Ok(predictions)
}

pub fn read_prediction_file<P: AsRef<Path>>(path: P) -> Result<Vec<ReadAssignment>, TaxonomyError> {
    parse_predictions(open_reader(path)?)
}

/// Read one taxon id per line, trimming trailing whitespace and skipping
/// empty lines.
pub fn read_taxid_list_file<P: AsRef<Path>>(path: P) -> Result<Vec<TaxId>, TaxonomyError> {
    let mut ids = Vec::new();
    for line in open_reader(path)?.lines() {
        let line = line?;
        let id = line.trim_end();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn taxonomy_lines_use_fields_zero_two_and_four() {
        let input = "1\t|\t1\t|\troot\t|\n2\t|\t1\t|\tphylum\t|\n";
        let tree = parse_taxonomy(Cursor::new(input)).unwrap();
        assert_eq!(tree.len(), 2);
        let node = tree.get("2").unwrap();
        assert_eq!(node.parent, "1");
        assert_eq!(node.rank, "phylum");
    }

    #[test]
    fn short_taxonomy_lines_are_skipped() {
        let input = "1\t|\t1\t|\troot\t|\nmalformed line\n\n";
        let tree = parse_taxonomy(Cursor::new(input)).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn duplicate_taxonomy_id_aborts() {
        let input = "1\t|\t1\t|\troot\t|\n1\t|\t1\t|\troot\t|\n";
        assert!(matches!(
            parse_taxonomy(Cursor::new(input)),
            Err(TaxonomyError::DuplicateId(id)) if id == "1"
        ));
    }

    #[test]
    fn truth_splits_on_any_whitespace() {
        let input = "r1 3\nr2\t4\n";
        let truth = parse_truth(Cursor::new(input)).unwrap();
        assert_eq!(truth.len(), 2);
        assert_eq!(truth[0], ReadAssignment::new("r1", "3"));
        assert_eq!(truth[1], ReadAssignment::new("r2", "4"));
    }

    #[test]
    fn predictions_skip_the_seqid_header() {
        let input = "readID\tseqID\ttaxID\tscore\nr1\t3\t42\nr2\t4\t17\n";
        let predictions = parse_predictions(Cursor::new(input)).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0], ReadAssignment::new("r1", "3"));
    }

    #[test]
    fn gzipped_and_plain_taxonomies_agree() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let input = b"1\t|\t1\t|\troot\t|\n2\t|\t1\t|\tphylum\t|\n";
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(input).unwrap();
        let gz = encoder.finish().unwrap();

        let plain = parse_taxonomy(Cursor::new(&input[..])).unwrap();
        let unzipped =
            parse_taxonomy(BufReader::new(MultiGzDecoder::new(Cursor::new(gz)))).unwrap();
        assert_eq!(plain.len(), unzipped.len());
        assert_eq!(plain.get("2"), unzipped.get("2"));
    }
}
