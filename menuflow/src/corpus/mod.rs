//! The menu corpus: sources, the filter scanner and plain-text search.

mod evidence;
mod scanner;
mod source;
pub mod text_search;

pub use evidence::{restaurant_start_id, Evidence, RESTAURANT_END, RESTAURANT_START_PREFIX};
pub use scanner::{CorpusScanner, ScanResult};
pub use source::{
    identifier_from_file_name, CorpusEntry, CorpusSource, DirectoryCorpus, InMemoryCorpus,
};
pub use text_search::{keyword_contexts, KeywordHits, TextMenuSearch};
