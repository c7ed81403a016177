// Adapters layer: concrete implementations of the domain ports (header parsing, storage backends).

pub mod filesystem;
pub mod header;
pub mod memory;

pub use filesystem::{FileBoundaryStore, FileReferenceListStore};
pub use header::FullModelHeaderReader;
pub use memory::{InMemoryBoundaryStore, InMemoryReferenceListStore};
