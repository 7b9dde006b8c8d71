//! Persistence port consumed by the api core, plus two reference stores.
//! - The core only ever talks to `DocumentStore`; concrete databases are
//!   collaborators implementing the same trait.
//! - Absence is expressed in return types; errors mean the store itself
//!   misbehaved.

pub mod errors;
pub mod json_file;
pub mod memory;
pub mod port;

pub use errors::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use port::{DocumentStore, Filter, PageRequest, QueryResults};
