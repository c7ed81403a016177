pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{
    FileBoundaryStore, FileReferenceListStore, FullModelHeaderReader, InMemoryBoundaryStore,
    InMemoryReferenceListStore,
};
pub use core::{catalog::BoundaryCatalog, reference_lists::ReferenceListCatalog, service::CatalogService};
pub use domain::model::{
    BoundaryContent, BoundaryInfo, BoundaryRecord, CaseInsensitiveSet, ModelHeader,
    ReferenceListKind,
};
pub use utils::error::{CatalogError, Result};
