pub mod catalog;
pub mod profile;
pub mod reference_lists;
pub mod service;

pub use crate::domain::model::{BoundaryInfo, BoundaryRecord, CaseInsensitiveSet, ReferenceListKind};
pub use crate::domain::ports::{BoundaryStore, ConfigProvider, HeaderReader, ReferenceListStore};
pub use crate::utils::error::Result;
