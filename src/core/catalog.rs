use crate::core::profile::ProfileMatcher;
use crate::domain::model::{BoundaryInfo, BoundaryRecord};
use crate::domain::ports::{BoundaryStore, HeaderReader};
use crate::utils::error::{CatalogError, Result};

pub struct BoundaryCatalog<S: BoundaryStore, H: HeaderReader> {
    store: S,
    header_reader: H,
}

impl<S: BoundaryStore, H: HeaderReader> BoundaryCatalog<S, H> {
    pub fn new(store: S, header_reader: H) -> Self {
        Self {
            store,
            header_reader,
        }
    }

    /// 匯入 boundary 檔案，回傳標頭中的 id。
    ///
    /// 同一 id 重複匯入時整筆覆蓋；標頭無法解析時不寫入任何資料。
    pub async fn import(&self, content: Vec<u8>, filename: &str) -> Result<String> {
        let header = self.header_reader.read_header(&content)?;
        tracing::debug!(
            "Parsed header of {}: id={}, scenario_time={:?}",
            filename,
            header.id,
            header.scenario_time
        );

        let record = BoundaryRecord {
            id: header.id.clone(),
            filename: filename.to_string(),
            content,
            scenario_time: header.scenario_time,
        };
        self.store.put(record).await?;

        tracing::info!("📥 Imported boundary {} as {}", filename, header.id);
        Ok(header.id)
    }

    pub async fn get(&self, id: &str) -> Result<BoundaryRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    pub async fn list(&self) -> Result<Vec<BoundaryRecord>> {
        self.store.get_all().await
    }

    pub async fn list_infos(&self) -> Result<Vec<BoundaryInfo>> {
        self.store.get_all_infos().await
    }

    pub async fn list_ids(&self) -> Result<Vec<String>> {
        let infos = self.store.get_all_infos().await?;
        Ok(infos.into_iter().map(|info| info.id).collect())
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        self.store.exists(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        // 不存在時由儲存層回傳 NotFound
        self.store.delete(id).await?;

        tracing::info!("🗑️ Deleted boundary {}", id);
        Ok(())
    }

    /// 取得某 profile 目前的 boundary：檔名符合標記者之中 scenario time 最新的一筆。
    ///
    /// 只走訪中繼資料，最後才讀取勝出記錄的內容。
    pub async fn most_recent(&self, profile: &str) -> Result<BoundaryRecord> {
        let matcher = ProfileMatcher::new(profile);
        let not_found = || CatalogError::ProfileNotFound {
            profile: profile.to_string(),
        };

        let infos = self.store.get_all_infos().await?;
        let best = select_most_recent(infos, &matcher).ok_or_else(not_found)?;

        // 走訪後被並行刪除時視同沒有資料
        self.store.get(&best.id).await?.ok_or_else(not_found)
    }
}

/// 單次走訪，同時間或缺時間時先出現者勝出
fn select_most_recent(infos: Vec<BoundaryInfo>, matcher: &ProfileMatcher) -> Option<BoundaryInfo> {
    let mut best: Option<BoundaryInfo> = None;

    for info in infos {
        if !matcher.matches(&info.filename) {
            continue;
        }
        let replace = match &best {
            None => true,
            // None < Some(_)，沒有時間的記錄贏不過有時間的
            Some(current) => info.scenario_time > current.scenario_time,
        };
        if replace {
            best = Some(info);
        }
    }

    if let Some(info) = &best {
        tracing::debug!(
            "Most recent {} boundary (marker {}) is {} ({:?})",
            matcher.profile(),
            matcher.marker(),
            info.id,
            info.scenario_time
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBoundaryStore;
    use crate::domain::model::ModelHeader;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 以 "id|yyyy-mm-dd" 格式的假文件取代 XML 解析
    struct PipeHeaderReader;

    impl HeaderReader for PipeHeaderReader {
        fn read_header(&self, content: &[u8]) -> Result<ModelHeader> {
            let text = std::str::from_utf8(content)
                .map_err(|e| CatalogError::malformed(e.to_string()))?;
            let mut parts = text.splitn(2, '|');
            let id = parts
                .next()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| CatalogError::malformed("missing id"))?;
            let scenario_time = parts.next().map(day);
            Ok(ModelHeader {
                id: id.to_string(),
                scenario_time,
            })
        }
    }

    fn day(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn catalog() -> BoundaryCatalog<InMemoryBoundaryStore, PipeHeaderReader> {
        BoundaryCatalog::new(InMemoryBoundaryStore::new(), PipeHeaderReader)
    }

    #[tokio::test]
    async fn test_import_returns_header_id() {
        let catalog = catalog();

        let id = catalog
            .import(b"urn:uuid:a|2020-06-29".to_vec(), "a__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();

        assert_eq!(id, "urn:uuid:a");
        let record = catalog.get(&id).await.unwrap();
        assert_eq!(record.filename, "a__ENTSOE_EQBD_001.xml");
        assert_eq!(record.content, b"urn:uuid:a|2020-06-29");
        assert_eq!(record.scenario_time, Some(day("2020-06-29")));
    }

    #[tokio::test]
    async fn test_reimport_overwrites_single_record() {
        let catalog = catalog();

        let first = catalog.import(b"urn:uuid:a|2020-06-29".to_vec(), "old.xml").await.unwrap();
        let second = catalog.import(b"urn:uuid:a|2020-11-29".to_vec(), "new.xml").await.unwrap();

        assert_eq!(first, second);
        let all = catalog.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].filename, "new.xml");
        assert_eq!(all[0].scenario_time, Some(day("2020-11-29")));
    }

    #[tokio::test]
    async fn test_malformed_document_persists_nothing() {
        let catalog = catalog();

        let err = catalog.import(b"|2020-06-29".to_vec(), "bad.xml").await.unwrap_err();

        assert!(matches!(err, CatalogError::MalformedDocument { .. }));
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_absence_semantics() {
        let catalog = catalog();

        assert!(!catalog.exists("urn:uuid:unknown").await.unwrap());
        assert!(matches!(
            catalog.get("urn:uuid:unknown").await,
            Err(CatalogError::NotFound { .. })
        ));
        assert!(matches!(
            catalog.delete("urn:uuid:unknown").await,
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent() {
        let catalog = catalog();
        let id = catalog.import(b"urn:uuid:a|2020-06-29".to_vec(), "a.xml").await.unwrap();

        catalog.delete(&id).await.unwrap();

        assert!(!catalog.exists(&id).await.unwrap());
        assert!(catalog.delete(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_most_recent_ignores_insertion_order() {
        let catalog = catalog();
        catalog
            .import(b"urn:uuid:new|2020-11-29".to_vec(), "2020__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();
        catalog
            .import(b"urn:uuid:old|2020-06-29".to_vec(), "2019__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();

        let recent = catalog.most_recent("EQ").await.unwrap();
        assert_eq!(recent.id, "urn:uuid:new");
    }

    #[tokio::test]
    async fn test_most_recent_filters_by_profile() {
        let catalog = catalog();
        catalog
            .import(b"urn:uuid:eq|2020-06-29".to_vec(), "x__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();
        catalog
            .import(b"urn:uuid:tp|2021-01-01".to_vec(), "x__ENTSOE_TPBD_001.xml")
            .await
            .unwrap();
        catalog
            .import(b"urn:uuid:other|2022-01-01".to_vec(), "unrelated.xml")
            .await
            .unwrap();

        assert_eq!(catalog.most_recent("EQ").await.unwrap().id, "urn:uuid:eq");
        assert_eq!(catalog.most_recent("TP").await.unwrap().id, "urn:uuid:tp");
        assert!(matches!(
            catalog.most_recent("SSH").await,
            Err(CatalogError::ProfileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_most_recent_tie_keeps_first_encountered() {
        let catalog = catalog();
        catalog
            .import(b"urn:uuid:first|2020-06-29".to_vec(), "a__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();
        catalog
            .import(b"urn:uuid:second|2020-06-29".to_vec(), "b__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();

        assert_eq!(catalog.most_recent("EQ").await.unwrap().id, "urn:uuid:first");
    }

    #[tokio::test]
    async fn test_legacy_record_without_time() {
        let catalog = catalog();
        catalog
            .import(b"urn:uuid:legacy".to_vec(), "a__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();

        // 只有無時間記錄時仍可被選中
        assert_eq!(catalog.most_recent("EQ").await.unwrap().id, "urn:uuid:legacy");

        catalog
            .import(b"urn:uuid:dated|2020-06-29".to_vec(), "b__ENTSOE_EQBD_001.xml")
            .await
            .unwrap();
        assert_eq!(catalog.most_recent("EQ").await.unwrap().id, "urn:uuid:dated");
    }

    #[tokio::test]
    async fn test_list_ids_and_infos_follow_store_order() {
        let catalog = catalog();
        catalog.import(b"urn:uuid:b|2020-06-29".to_vec(), "b.xml").await.unwrap();
        catalog.import(b"urn:uuid:a".to_vec(), "a.xml").await.unwrap();

        assert_eq!(
            catalog.list_ids().await.unwrap(),
            vec!["urn:uuid:b".to_string(), "urn:uuid:a".to_string()]
        );
        let infos = catalog.list_infos().await.unwrap();
        assert_eq!(infos[1].filename, "a.xml");
        assert_eq!(infos[1].scenario_time, None);
    }

    /// 記錄讀取內容的次數
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryBoundaryStore,
        content_reads: AtomicUsize,
    }

    impl BoundaryStore for CountingStore {
        async fn put(&self, record: BoundaryRecord) -> Result<()> {
            self.inner.put(record).await
        }

        async fn get(&self, id: &str) -> Result<Option<BoundaryRecord>> {
            self.content_reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(id).await
        }

        async fn get_all(&self) -> Result<Vec<BoundaryRecord>> {
            let all = self.inner.get_all().await?;
            self.content_reads.fetch_add(all.len(), Ordering::SeqCst);
            Ok(all)
        }

        async fn get_all_infos(&self) -> Result<Vec<BoundaryInfo>> {
            self.inner.get_all_infos().await
        }

        async fn exists(&self, id: &str) -> Result<bool> {
            self.inner.exists(id).await
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_most_recent_loads_only_the_winner() {
        let catalog = BoundaryCatalog::new(CountingStore::default(), PipeHeaderReader);
        for (content, filename) in [
            ("urn:uuid:a|2020-06-29", "a__ENTSOE_EQBD_001.xml"),
            ("urn:uuid:b|2020-11-29", "b__ENTSOE_EQBD_001.xml"),
            ("urn:uuid:c|2021-01-01", "c__ENTSOE_TPBD_001.xml"),
            ("urn:uuid:d|2020-11-29", "d__ENTSOE_EQBD_001.xml"),
        ] {
            catalog.import(content.as_bytes().to_vec(), filename).await.unwrap();
        }

        let recent = catalog.most_recent("EQ").await.unwrap();

        assert_eq!(recent.id, "urn:uuid:b");
        assert_eq!(recent.content, b"urn:uuid:b|2020-11-29");
        assert_eq!(catalog.store.content_reads.load(Ordering::SeqCst), 1);
    }
}
