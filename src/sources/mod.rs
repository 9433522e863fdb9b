//! Source registry.
//!
//! Sources are kept in an ordered JSON array on disk. The list is always read
//! and written as a whole; edits go through [`SourceRegistry`], which validates
//! the list before saving.

mod registry;
mod types;

pub use registry::{select_sources, SourceRegistry};
pub use types::{FetchStrategy, OriginType, SourceConfig, SourceSelection};
