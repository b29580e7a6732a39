use std::collections::HashSet;

use clap::{Parser, ValueEnum};

use taxeval_rs::readers::{read_taxid_list_file, read_taxonomy_file};
use taxeval_rs::TaxonomyTree;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Op {
    /// All ids in the subtree rooted at each given id
    Subtree,
    /// All ids on the path from the root to each given id
    Ancestors,
    /// The ancestor of each given id at the requested rank
    Promote,
}

/// Query ancestor paths, subtree membership and rank promotion in a
/// taxonomy tree.
#[derive(Parser)]
#[command(name = "taxquery")]
struct Args {
    /// Operation to run
    #[arg(long, value_enum)]
    op: Op,

    /// Taxonomy tree, usually nodes.dmp
    #[arg(long)]
    tree: String,

    /// Comma-separated taxonomy ids
    #[arg(long)]
    taxid: Option<String>,

    /// File with one taxonomy id per line
    #[arg(long = "taxid-list")]
    taxid_list: Option<String>,

    /// Target rank (species, genus, ...)
    #[arg(long, required_if_eq("op", "promote"))]
    rank: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let tree = read_taxonomy_file(&args.tree)?;

    let mut taxids: Vec<String> = Vec::new();
    if let Some(csv) = &args.taxid {
        taxids.extend(
            csv.split(',')
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        );
    }
    if let Some(path) = &args.taxid_list {
        taxids.extend(read_taxid_list_file(path)?);
    }

    match args.op {
        Op::Subtree => {
            let members = tree.subtree(&taxids)?;
            for id in sorted_ids(members) {
                print_tax(&tree, &id);
            }
        }
        Op::Ancestors => {
            let mut ids: HashSet<String> = HashSet::new();
            for taxid in &taxids {
                ids.extend(tree.ancestors_of(taxid)?);
            }
            for id in sorted_ids(ids) {
                print_tax(&tree, &id);
            }
        }
        Op::Promote => {
            let rank = args.rank.as_deref().unwrap_or_default();
            for taxid in &taxids {
                match tree.promote(taxid, rank)? {
                    Some(id) => print_tax(&tree, &id),
                    None => print_tax(&tree, "-1"),
                }
            }
        }
    }

    Ok(())
}

/// One `id | parent | rank |` row; parent and rank stay empty for ids the
/// tree does not contain.
fn print_tax(tree: &TaxonomyTree, taxid: &str) {
    match tree.get(taxid) {
        Some(node) => println!("{}\t|\t{}\t|\t{}\t|", taxid, node.parent, node.rank),
        None => println!("{}\t|\t\t|\t\t|", taxid),
    }
}

/// Sort numerically when every id parses as an integer, lexicographically
/// otherwise.
fn sorted_ids<I: IntoIterator<Item = String>>(ids: I) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().collect();
    if ids.iter().all(|id| id.parse::<u64>().is_ok()) {
        ids.sort_by_key(|id| id.parse::<u64>().unwrap_or(u64::MAX));
    } else {
        ids.sort_unstable();
    }
    ids
}
