mod loader;
mod webpage;

pub use loader::load_corpus;
pub use webpage::{Uri, Webpage};
