//! Language classification and complexity heuristics.
//!
//! Pure building blocks for the ingestion pipeline: mapping file paths to
//! language tags, deciding which files are worth fetching, and scoring a
//! file's complexity when the reviewing model does not supply a score.

pub mod classify;
pub mod complexity;

pub use classify::{detect_language, is_eligible, relevant_extensions};
pub use complexity::complexity_score;
