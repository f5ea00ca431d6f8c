/// In-memory search over the archive collections.
pub mod engine;

pub use engine::{person_summary, PhotoField, SearchEngine};
