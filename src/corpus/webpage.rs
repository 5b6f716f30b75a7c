use serde::{Deserialize, Serialize};

pub type Uri = String;

/// A crawled page, already reduced to its words and outbound links.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Webpage {
    pub uri: Uri,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub links: Vec<Uri>,
}

impl Webpage {
    pub fn new<W, L>(uri: impl Into<Uri>, words: W, links: L) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<Uri>,
    {
        Self {
            uri: uri.into(),
            words: words.into_iter().map(Into::into).collect(),
            links: links.into_iter().map(Into::into).collect(),
        }
    }
}
