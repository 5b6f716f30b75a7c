use std::{fs::File, io::BufReader, path::PathBuf};

use clap::{Parser, Subcommand};
use page_relevance::{load_corpus, PageRank, PageRankConfig, Result, TfIdf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the crawled data
    #[arg(long, default_value = "data")]
    crawled_data_path: PathBuf,

    /// JSON file with page rank settings, overridden by the flags below
    #[arg(long)]
    config: Option<PathBuf>,

    /// Share of rank passed along links
    #[arg(long)]
    decay: Option<f64>,

    /// Convergence threshold
    #[arg(long)]
    epsilon: Option<f64>,

    /// Maximum page rank iterations
    #[arg(long)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the page rank of every page
    Rank,
    /// Score every page against a query
    Query {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

impl Args {
    fn page_rank_config(&self) -> Result<PageRankConfig> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
            None => PageRankConfig::default(),
        };

        if let Some(decay) = self.decay {
            config.decay = decay;
        }
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run(Args::parse()) {
        error!(error = %e, "Failed");
        std::process::exit(1);
    }
}

/// Splits the query arguments on whitespace. Words are matched as given.
fn query_words(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split_whitespace())
        .map(ToString::to_string)
        .collect()
}

fn run(args: Args) -> Result<()> {
    let config = args.page_rank_config()?;
    let webpages = load_corpus(&args.crawled_data_path)?;

    // Time the analysis
    let start = std::time::Instant::now();
    let page_rank = PageRank::with_config(&webpages, config)?;
    info!(
        rounds = page_rank.rounds(),
        converged = page_rank.converged(),
        elapsed = ?start.elapsed(),
        "Page rank ready"
    );

    match args.command {
        Command::Rank => {
            let mut ranks: Vec<_> = page_rank.ranks().iter().collect();
            ranks.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (uri, score) in ranks {
                println!("{score:.6}\t{uri}");
            }
        }
        Command::Query { words } => {
            let start = std::time::Instant::now();
            let tf_idf = TfIdf::new(&webpages);
            let query = query_words(&words);

            let mut results = Vec::new();
            for page in &webpages {
                let relevance = tf_idf.relevance(&query, &page.uri)?;
                if relevance > 0.0 {
                    results.push((page.uri.as_str(), relevance, page_rank.score(&page.uri)?));
                }
            }
            results.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            println!("Results for '{}':", query.join(" "));
            for (uri, relevance, rank) in &results {
                println!("{relevance:.6}\t{rank:.6}\t{uri}");
            }
            println!("Number of results: {}", results.len());
            println!("Time taken: {:?}", start.elapsed());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_words_keep_their_case() {
        let args = vec!["Cats  and".to_string(), "DOGS".to_string()];

        assert_eq!(query_words(&args), vec!["Cats", "and", "DOGS"]);
    }
}
