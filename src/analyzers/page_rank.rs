use super::link_graph::{build_link_graph, LinkGraph};
use crate::{
    corpus::{Uri, Webpage},
    error::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub type RankVector = HashMap<Uri, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Share of rank passed along links rather than teleported.
    pub decay: f64,
    /// Iteration stops once no score moves by `epsilon` or more.
    pub epsilon: f64,
    /// Maximum number of update rounds.
    pub limit: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            decay: 0.85,
            epsilon: 0.0001,
            limit: 100,
        }
    }
}

impl PageRankConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "decay must be in (0, 1), got {}",
                self.decay
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.limit == 0 {
            return Err(Error::InvalidParameter(
                "limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// How the update loop ended, carrying the ranks it settled on.
#[derive(Debug)]
enum Iteration {
    Converged { ranks: Vec<f64>, rounds: usize },
    Exhausted { ranks: Vec<f64>, rounds: usize },
}

/// The graph flattened to indices, nodes sorted by uri so summation order
/// does not depend on how the input pages were ordered.
struct IndexedGraph {
    uris: Vec<Uri>,
    edges: Vec<Vec<usize>>,
}

impl IndexedGraph {
    fn new(graph: &LinkGraph) -> Self {
        let mut uris: Vec<Uri> = graph.keys().cloned().collect();
        uris.sort_unstable();

        let index: HashMap<&str, usize> = uris
            .iter()
            .enumerate()
            .map(|(i, uri)| (uri.as_str(), i))
            .collect();

        let edges = uris
            .iter()
            .map(|uri| {
                let mut targets: Vec<usize> = graph
                    .get(uri)
                    .into_iter()
                    .flatten()
                    .filter_map(|target| index.get(target.as_str()).copied())
                    .collect();
                targets.sort_unstable();
                targets
            })
            .collect();

        Self { uris, edges }
    }

    fn len(&self) -> usize {
        self.uris.len()
    }

    /// One update round. Always writes into a fresh vector.
    fn step(&self, previous: &[f64], decay: f64) -> Vec<f64> {
        let n = self.len() as f64;
        let mut next = vec![0.0; self.len()];
        let mut dangling_mass = 0.0;

        for (rank, targets) in previous.iter().zip(&self.edges) {
            if targets.is_empty() {
                dangling_mass += rank;
            } else {
                let share = decay * rank / targets.len() as f64;
                for &target in targets {
                    next[target] += share;
                }
            }
        }

        let uniform = decay * dangling_mass / n + (1.0 - decay) / n;
        for rank in &mut next {
            *rank += uniform;
        }

        next
    }

    fn iterate(&self, config: &PageRankConfig) -> Iteration {
        if self.len() == 0 {
            return Iteration::Converged {
                ranks: Vec::new(),
                rounds: 0,
            };
        }

        let mut previous = vec![1.0 / self.len() as f64; self.len()];

        for round in 1..=config.limit {
            let next = self.step(&previous, config.decay);

            let settled = previous
                .iter()
                .zip(&next)
                .all(|(old, new)| (new - old).abs() < config.epsilon);

            if settled {
                return Iteration::Converged {
                    ranks: previous,
                    rounds: round,
                };
            }

            previous = next;
        }

        Iteration::Exhausted {
            ranks: previous,
            rounds: config.limit,
        }
    }
}

/// Iterative PageRank over the closed link graph of a corpus. Dangling pages
/// spread their rank over every page, themselves included, and every page
/// receives the `(1 - decay) / N` teleport share. Scores are not renormalised.
#[derive(Debug, Clone)]
pub struct PageRank {
    ranks: RankVector,
    rounds: usize,
    converged: bool,
}

impl PageRank {
    pub fn new(webpages: &[Webpage], decay: f64, epsilon: f64, limit: usize) -> Result<Self> {
        Self::with_config(
            webpages,
            PageRankConfig {
                decay,
                epsilon,
                limit,
            },
        )
    }

    pub fn with_config(webpages: &[Webpage], config: PageRankConfig) -> Result<Self> {
        Self::from_graph(&build_link_graph(webpages), config)
    }

    pub fn from_graph(graph: &LinkGraph, config: PageRankConfig) -> Result<Self> {
        config.validate()?;

        let indexed = IndexedGraph::new(graph);

        let (ranks, rounds, converged) = match indexed.iterate(&config) {
            Iteration::Converged { ranks, rounds } => (ranks, rounds, true),
            Iteration::Exhausted { ranks, rounds } => (ranks, rounds, false),
        };

        debug!(
            pages = indexed.len(),
            rounds, converged, "Computed page ranks"
        );

        Ok(Self {
            ranks: indexed.uris.into_iter().zip(ranks).collect(),
            rounds,
            converged,
        })
    }

    /// Rank of a page from the original corpus.
    pub fn score(&self, uri: &str) -> Result<f64> {
        self.ranks
            .get(uri)
            .copied()
            .ok_or_else(|| Error::UnknownKey(uri.to_string()))
    }

    pub const fn ranks(&self) -> &RankVector {
        &self.ranks
    }

    /// Number of update rounds run.
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    /// `false` when `limit` was reached before the ranks settled.
    pub const fn converged(&self) -> bool {
        self.converged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECAY: f64 = 0.85;
    const EPSILON: f64 = 0.0001;
    const LIMIT: usize = 100;

    fn page(uri: &str, links: &[&str]) -> Webpage {
        Webpage::new(uri, [uri], links.iter().copied())
    }

    fn rank(pages: &[Webpage]) -> PageRank {
        PageRank::new(pages, DECAY, EPSILON, LIMIT).expect("Failed to compute page ranks")
    }

    #[test]
    fn single_page_keeps_all_mass() {
        let ranks = rank(&[page("a", &[])]);

        assert!((ranks.score("a").expect("Missing rank") - 1.0).abs() < 1e-12);
        assert!(ranks.converged());
    }

    #[test]
    fn complete_graph_is_uniform() {
        let uris = ["a", "b", "c", "d"];
        let pages: Vec<_> = uris.iter().map(|uri| page(uri, &uris)).collect();

        let ranks = rank(&pages);

        for uri in uris {
            let score = ranks.score(uri).expect("Missing rank");
            assert!((score - 0.25).abs() < EPSILON, "{uri} = {score}");
        }
    }

    #[test]
    fn dangling_target_outranks_source() {
        let ranks = rank(&[page("a", &["b"]), page("b", &[])]);

        let a = ranks.score("a").expect("Missing rank");
        let b = ranks.score("b").expect("Missing rank");

        assert!(b > a, "a = {a}, b = {b}");
        assert!(ranks.converged());
    }

    #[test]
    fn limit_of_one_returns_first_update() {
        let ranks = PageRank::new(&[page("a", &["b"]), page("b", &[])], DECAY, EPSILON, 1)
            .expect("Failed to compute page ranks");

        assert!(!ranks.converged());
        assert_eq!(ranks.rounds(), 1);
        assert!((ranks.score("a").expect("Missing rank") - 0.2875).abs() < 1e-12);
        assert!((ranks.score("b").expect("Missing rank") - 0.7125).abs() < 1e-12);
    }

    #[test]
    fn links_outside_corpus_are_ignored() {
        let with_external = rank(&[page("a", &["b", "http://x.com"]), page("b", &["a"])]);
        let without = rank(&[page("a", &["b"]), page("b", &["a"])]);

        for uri in ["a", "b"] {
            assert_eq!(
                with_external.score(uri).expect("Missing rank"),
                without.score(uri).expect("Missing rank")
            );
        }
    }

    #[test]
    fn unknown_uri_is_an_error() {
        let ranks = rank(&[page("a", &[])]);

        assert!(matches!(ranks.score("b"), Err(Error::UnknownKey(uri)) if uri == "b"));
    }

    #[test]
    fn empty_corpus_has_no_ranks() {
        let ranks = rank(&[]);

        assert!(ranks.ranks().is_empty());
        assert!(matches!(ranks.score("a"), Err(Error::UnknownKey(_))));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let pages = [page("a", &[])];

        for (decay, epsilon, limit) in [
            (0.0, EPSILON, LIMIT),
            (1.0, EPSILON, LIMIT),
            (f64::NAN, EPSILON, LIMIT),
            (DECAY, 0.0, LIMIT),
            (DECAY, -1.0, LIMIT),
            (DECAY, EPSILON, 0),
        ] {
            assert!(matches!(
                PageRank::new(&pages, decay, epsilon, limit),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: PageRankConfig =
            serde_json::from_str(r#"{"decay": 0.5}"#).expect("Failed to parse config");

        assert_eq!(
            config,
            PageRankConfig {
                decay: 0.5,
                ..PageRankConfig::default()
            }
        );
    }
}
