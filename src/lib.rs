pub mod analyzers;
pub mod corpus;
pub mod error;

pub use analyzers::{
    link_graph::{build_link_graph, LinkGraph},
    page_rank::{PageRank, PageRankConfig},
    tf_idf::TfIdf,
};
pub use corpus::{load_corpus, Uri, Webpage};
pub use error::{Error, Result};
