//! JSON definition documents: stores, typed entry extraction, and the loader that
//! assembles them into raw definition tables.

pub mod document;
pub mod loader;
pub mod store;

pub use loader::{DOCUMENTS, DefinitionLoader};
pub use store::{DirectoryStore, DocumentStore, MemoryStore, RawDocument};
