/// Record persistence.
///
/// Every collection lives in one JSON array file that is read fully on open
/// and rewritten wholesale on each mutation.
mod json_store;

pub use json_store::{JsonStore, RecordStore};
