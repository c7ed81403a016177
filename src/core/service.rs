use crate::core::catalog::BoundaryCatalog;
use crate::core::reference_lists::ReferenceListCatalog;
use crate::domain::model::BoundaryRecord;
use crate::domain::ports::{BoundaryStore, HeaderReader, ReferenceListStore};
use crate::utils::error::Result;

pub const DEFAULT_PROFILES: [&str; 2] = ["EQ", "TP"];

/// 對外的單一入口，組合 boundary 目錄與參考清單
pub struct CatalogService<S: BoundaryStore, L: ReferenceListStore, H: HeaderReader> {
    boundaries: BoundaryCatalog<S, H>,
    reference_lists: ReferenceListCatalog<L>,
    profiles: Vec<String>,
}

impl<S: BoundaryStore, L: ReferenceListStore, H: HeaderReader> CatalogService<S, L, H> {
    pub fn new(boundary_store: S, list_store: L, header_reader: H) -> Self {
        Self {
            boundaries: BoundaryCatalog::new(boundary_store, header_reader),
            reference_lists: ReferenceListCatalog::new(list_store),
            profiles: DEFAULT_PROFILES.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_profiles(mut self, profiles: Vec<String>) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn boundaries(&self) -> &BoundaryCatalog<S, H> {
        &self.boundaries
    }

    pub fn reference_lists(&self) -> &ReferenceListCatalog<L> {
        &self.reference_lists
    }

    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// 依設定的 profile 順序取各自最新的 boundary，任一 profile 無資料即失敗
    pub async fn last_boundaries(&self) -> Result<Vec<BoundaryRecord>> {
        let mut latest = Vec::with_capacity(self.profiles.len());
        for profile in &self.profiles {
            latest.push(self.boundaries.most_recent(profile).await?);
        }
        Ok(latest)
    }
}
