use super::webpage::Webpage;
use crate::error::{Error, Result};
use std::{collections::HashSet, fs::File, io::BufReader, path::Path};
use tracing::{info, warn};
use walkdir::WalkDir;

const PAGE_EXTENSION: &str = "json";

/// Reads every `*.json` crawl record under `data_path` into a duplicate-free
/// list of webpages. Records that fail to parse are skipped; the first page
/// seen for a uri wins.
pub fn load_corpus(data_path: impl AsRef<Path>) -> Result<Vec<Webpage>> {
    let mut seen = HashSet::new();
    let mut webpages = Vec::new();

    let mut entries = WalkDir::new(data_path.as_ref())
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| !e.file_type().is_dir())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == PAGE_EXTENSION))
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| a.path().cmp(b.path()));

    for entry in entries {
        let page = match read_page(entry.path()) {
            Ok(page) => page,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Skipping unreadable crawl file");
                continue;
            }
        };

        if !seen.insert(page.uri.clone()) {
            warn!(uri = %page.uri, path = %entry.path().display(), "Skipping duplicate uri");
            continue;
        }

        webpages.push(page);
    }

    if webpages.is_empty() {
        return Err(Error::EmptyCorpus);
    }

    info!(
        pages = webpages.len(),
        path = %data_path.as_ref().display(),
        "Loaded corpus"
    );

    Ok(webpages)
}

fn read_page(path: &Path) -> Result<Webpage> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}
