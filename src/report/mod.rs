// src/report/mod.rs
// =============================================================================
// Report persistence: the ReportStore trait, the JSON file store, and the
// checkpointer that decides when to write.
// =============================================================================

mod checkpoint;

pub use checkpoint::{Checkpointer, JsonFileStore, ReportStore};

#[cfg(test)]
pub(crate) use checkpoint::tests::MemoryStore;
