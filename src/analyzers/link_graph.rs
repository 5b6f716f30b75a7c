use crate::corpus::{Uri, Webpage};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Adjacency list of the corpus. Every edge points at another key of the map.
pub type LinkGraph = HashMap<Uri, HashSet<Uri>>;

/// Builds a self-contained link graph: links to pages outside `webpages`
/// are dropped. Pages without surviving links map to an empty edge set.
pub fn build_link_graph(webpages: &[Webpage]) -> LinkGraph {
    let known: HashSet<&str> = webpages.iter().map(|page| page.uri.as_str()).collect();

    let mut graph = LinkGraph::with_capacity(known.len());

    for page in webpages {
        if graph.contains_key(&page.uri) {
            warn!(uri = %page.uri, "Ignoring duplicate webpage in link graph");
            continue;
        }

        let edges = page
            .links
            .iter()
            .filter(|link| known.contains(link.as_str()))
            .cloned()
            .collect();

        graph.insert(page.uri.clone(), edges);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(uris: &[&str]) -> HashSet<Uri> {
        uris.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_input_gives_empty_graph() {
        assert!(build_link_graph(&[]).is_empty());
    }

    #[test]
    fn drops_links_outside_corpus() {
        let pages = vec![
            Webpage::new("a", ["x"], ["b", "http://elsewhere.com", "b"]),
            Webpage::new("b", ["y"], ["a", "b"]),
            Webpage::new("c", ["z"], ["http://elsewhere.com"]),
        ];

        let graph = build_link_graph(&pages);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph["a"], set(&["b"]));
        assert_eq!(graph["b"], set(&["a", "b"]));
        assert!(graph["c"].is_empty());
    }

    #[test]
    fn first_duplicate_wins() {
        let pages = vec![
            Webpage::new("a", ["x"], ["b"]),
            Webpage::new("b", ["y"], Vec::<Uri>::new()),
            Webpage::new("a", ["x"], ["a"]),
        ];

        let graph = build_link_graph(&pages);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph["a"], set(&["b"]));
    }
}
