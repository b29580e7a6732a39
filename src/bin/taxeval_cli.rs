use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use taxeval_rs::{evaluate_files, format_report, DEFAULT_RANK_LIST};

/// Evaluate a read classifier's output against a truth table, per rank.
#[derive(Parser)]
#[command(name = "taxeval")]
struct Args {
    /// Truth table: read id and taxon id per line
    #[arg(long)]
    truth: String,

    /// Classification result: read id, taxon id and score per line
    #[arg(short = 'c', long = "classification")]
    classification: String,

    /// Taxonomy tree, usually nodes.dmp
    #[arg(long)]
    tree: String,

    /// Name of the classification method (report provenance only)
    #[arg(long, default_value = "centrifuge")]
    tool: String,

    /// Comma-separated list of ranks to evaluate
    #[arg(long = "rank-list", default_value = DEFAULT_RANK_LIST)]
    rank_list: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let ranks: Vec<String> = args
        .rank_list
        .split(',')
        .map(|rank| rank.trim().to_string())
        .filter(|rank| !rank.is_empty())
        .collect();

    log::info!("evaluating {} results at {} ranks", args.tool, ranks.len());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid spinner template"),
    );
    spinner.set_message(format!("Evaluating ranks: {}...", args.rank_list));

    let reports = evaluate_files(&args.classification, &args.truth, &args.tree, &ranks)?;

    spinner.finish_with_message(format!("Evaluated {} rank(s).", reports.len()));

    print!("{}", format_report(&reports));
    Ok(())
}
