use super::vector::{cosine, dot, norm, SparseVector};
use crate::{
    corpus::{Uri, Webpage},
    error::{Error, Result},
};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct DocumentVector {
    weights: SparseVector,
    norm: f64,
}

/// TF-IDF vectors of a corpus, with `idf(word) = ln(N / df(word))` and
/// `tf(word) = count / total`. Relevance is the cosine similarity between the
/// query's vector and the cached document vector.
#[derive(Debug, Clone)]
pub struct TfIdf {
    idf_scores: HashMap<String, f64>,
    documents: HashMap<Uri, DocumentVector>,
}

impl TfIdf {
    pub fn new(webpages: &[Webpage]) -> Self {
        let mut seen = HashSet::new();
        let corpus: Vec<&Webpage> = webpages
            .iter()
            .filter(|page| {
                let fresh = seen.insert(page.uri.as_str());
                if !fresh {
                    warn!(uri = %page.uri, "Ignoring duplicate webpage in tf-idf corpus");
                }
                fresh
            })
            .collect();

        let idf_scores = idf_scores(&corpus);

        let documents: HashMap<_, _> = corpus
            .iter()
            .map(|page| {
                let weights: SparseVector = term_frequencies(&page.words)
                    .into_iter()
                    .map(|(word, tf)| (word.to_string(), tf * lookup(&idf_scores, word)))
                    .collect();
                let norm = norm(weights.values().copied());

                (page.uri.clone(), DocumentVector { weights, norm })
            })
            .collect();

        debug!(
            documents = documents.len(),
            vocabulary = idf_scores.len(),
            "Computed tf-idf vectors"
        );

        Self {
            idf_scores,
            documents,
        }
    }

    /// IDF of `word`, `0.0` for words that appear nowhere in the corpus.
    pub fn idf(&self, word: &str) -> f64 {
        lookup(&self.idf_scores, word)
    }

    /// Cached TF-IDF vector for a corpus page.
    pub fn document_vector(&self, uri: &str) -> Result<&SparseVector> {
        self.document(uri).map(|doc| &doc.weights)
    }

    /// Cosine similarity between `query` and the page at `uri`.
    pub fn relevance<S: AsRef<str>>(&self, query: &[S], uri: &str) -> Result<f64> {
        let document = self.document(uri)?;

        let query_weights: Vec<(&str, f64)> = term_frequencies(query)
            .into_iter()
            .map(|(word, tf)| (word, tf * self.idf(word)))
            .collect();

        let product = dot(query_weights.iter().copied(), &document.weights);
        let query_norm = norm(query_weights.iter().map(|(_, weight)| *weight));

        Ok(cosine(product, document.norm, query_norm))
    }

    fn document(&self, uri: &str) -> Result<&DocumentVector> {
        self.documents
            .get(uri)
            .ok_or_else(|| Error::UnknownKey(uri.to_string()))
    }
}

fn lookup(idf_scores: &HashMap<String, f64>, word: &str) -> f64 {
    idf_scores.get(word).copied().unwrap_or(0.0)
}

/// Document frequency counts each page at most once per word.
fn idf_scores(corpus: &[&Webpage]) -> HashMap<String, f64> {
    let mut document_frequency: HashMap<&str, usize> = HashMap::new();

    for page in corpus {
        let unique: HashSet<&str> = page.words.iter().map(String::as_str).collect();
        for word in unique {
            *document_frequency.entry(word).or_insert(0) += 1;
        }
    }

    let size = corpus.len() as f64;

    document_frequency
        .into_iter()
        .map(|(word, df)| (word.to_string(), (size / df as f64).ln()))
        .collect()
}

/// Term frequencies keyed in word order, so sums over them are reproducible.
fn term_frequencies<S: AsRef<str>>(words: &[S]) -> BTreeMap<&str, f64> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for word in words {
        *counts.entry(word.as_ref()).or_insert(0) += 1;
    }

    let total = words.len() as f64;

    counts
        .into_iter()
        .map(|(word, count)| (word, count as f64 / total))
        .collect()
}
