//! Project discovery, file classification and raw reference extraction

pub mod classify;
pub mod coordinator;
pub mod discovery;
pub mod extractor;
pub mod file_type;
pub mod languages;


pub use classify::Classifier;
pub use coordinator::{Coordinator, index_project};
pub use discovery::{SourceFile, discover_files};
pub use extractor::{ReferenceExtractor, normalize_references};
pub use file_type::{classify_file_type, language_for};
pub use languages::get_extractor;
