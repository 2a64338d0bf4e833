//! Boundaries to the outside world: where collation reports come from, where
//! decisions go and where the variation-type list lives.
//!
//! Each boundary is a trait with three implementations:
//!
//! - [`HttpBackend`] talks to the collation and storage services.
//! - [`FileDecisionStore`], [`FileTypeStore`] and [`FileCollationSource`]
//!   work against local files.
//! - [`MemoryStore`] keeps everything in process and can simulate failures.

mod file;
mod http;
mod memory;
mod provider;

pub use file::{
    FileCollationSource, FileDecisionStore, FileTypeStore, decisions_path, read_decisions,
};
pub use http::HttpBackend;
pub use memory::MemoryStore;
pub use provider::{CollationSource, DecisionStore, VariationTypeStore};
