pub mod link_graph;
pub mod page_rank;
pub mod tf_idf;
pub mod vector;
