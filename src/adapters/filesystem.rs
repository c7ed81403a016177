use crate::domain::model::{BoundaryInfo, BoundaryRecord};
use crate::domain::ports::{BoundaryStore, ReferenceListStore};
use crate::utils::error::{CatalogError, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

const BOUNDARIES_DIR: &str = "boundaries";
const BLOBS_DIR: &str = "blobs";
const STAGING_DIR: &str = "staging";
const INDEX_FILE: &str = "index.json";
const LOCK_FILE: &str = "index.lock";
const LISTS_DIR: &str = "lists";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    #[serde(flatten)]
    info: BoundaryInfo,
    blob: String,
}

/// 目錄式儲存：`index.json` 保存有序的中繼資料，內容另存於 `blobs/`。
///
/// 索引的讀改寫由 `index.lock` 檔案鎖保護，多個行程共用同一目錄也不會遺失項目。
/// 每次寫入內容都用新的 blob 檔名，索引提交成功後才刪除舊 blob，
/// 所以索引永遠指向完整的內容。
#[derive(Debug, Clone)]
pub struct FileBoundaryStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileBoundaryStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join(BOUNDARIES_DIR),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn blob_path(&self, blob: &str) -> PathBuf {
        self.root.join(BLOBS_DIR).join(blob)
    }

    async fn read_index(&self) -> Result<Vec<IndexEntry>> {
        match fs::read(self.index_path()).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_index(&self, entries: &[IndexEntry]) -> Result<()> {
        let data = serde_json::to_vec_pretty(entries)?;
        replace_file(self.root.join(STAGING_DIR), self.index_path(), data).await
    }

    async fn load(&self, entry: IndexEntry) -> Result<BoundaryRecord> {
        let content = fs::read(self.blob_path(&entry.blob)).await.map_err(|e| {
            CatalogError::storage(format!(
                "content of boundary {} is unreadable: {}",
                entry.info.id, e
            ))
        })?;
        Ok(BoundaryRecord {
            id: entry.info.id,
            filename: entry.info.filename,
            content,
            scenario_time: entry.info.scenario_time,
        })
    }

    /// 索引已不再引用的 blob，刪除失敗只留下孤兒檔
    async fn remove_blob(&self, blob: &str) {
        match fs::remove_file(self.blob_path(blob)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("⚠️ Blob {} was already missing", blob);
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not remove blob {}: {}", blob, e);
            }
        }
    }
}

impl BoundaryStore for FileBoundaryStore {
    async fn put(&self, record: BoundaryRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let _lock = IndexLock::acquire(&self.root).await?;

        let mut entries = self.read_index().await?;

        let info = record.info();
        let size = record.content.len();
        let blob = write_unique(
            self.root.join(BLOBS_DIR),
            blob_prefix(&record.id),
            record.content,
        )
        .await?;

        let entry = IndexEntry {
            info,
            blob: blob.clone(),
        };
        let replaced = match entries.iter_mut().find(|e| e.info.id == entry.info.id) {
            Some(existing) => Some(std::mem::replace(existing, entry).blob),
            None => {
                entries.push(entry);
                None
            }
        };

        if let Err(e) = self.write_index(&entries).await {
            // 索引沒有提交，舊的 blob 仍然有效
            self.remove_blob(&blob).await;
            return Err(e);
        }
        if let Some(old) = replaced {
            self.remove_blob(&old).await;
        }

        tracing::debug!(
            "Stored boundary {} ({} bytes) as {} under {}",
            record.id,
            size,
            blob,
            self.root.display()
        );
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<BoundaryRecord>> {
        let entry = self
            .read_index()
            .await?
            .into_iter()
            .find(|e| e.info.id == id);
        match entry {
            Some(entry) => Ok(Some(self.load(entry).await?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<BoundaryRecord>> {
        let entries = self.read_index().await?;
        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            records.push(self.load(entry).await?);
        }
        Ok(records)
    }

    async fn get_all_infos(&self) -> Result<Vec<BoundaryInfo>> {
        let entries = self.read_index().await?;
        Ok(entries.into_iter().map(|e| e.info).collect())
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let entries = self.read_index().await?;
        Ok(entries.iter().any(|e| e.info.id == id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let _lock = IndexLock::acquire(&self.root).await?;

        let mut entries = self.read_index().await?;
        let position = entries
            .iter()
            .position(|e| e.info.id == id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;
        let removed = entries.remove(position);
        self.write_index(&entries).await?;

        self.remove_blob(&removed.blob).await;
        Ok(())
    }
}

/// 參考清單以原始位元組存成 `lists/<key>.dat`
#[derive(Debug, Clone)]
pub struct FileReferenceListStore {
    root: PathBuf,
}

impl FileReferenceListStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root: data_dir.as_ref().join(LISTS_DIR),
        }
    }

    fn list_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.dat", key))
    }
}

impl ReferenceListStore for FileReferenceListStore {
    /// 整檔替換，同時寫入時以最後改名者為準
    async fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        replace_file(self.root.clone(), self.list_path(key), payload.to_vec()).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.list_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// 持有期間獨佔 `index.lock`，drop 時解鎖
struct IndexLock {
    file: std::fs::File,
}

impl IndexLock {
    async fn acquire(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).await?;
        let path = root.join(LOCK_FILE);

        blocking(move || {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&path)
                .map_err(|e| {
                    CatalogError::storage(format!(
                        "cannot open index lock {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            file.lock_exclusive().map_err(|e| {
                CatalogError::storage(format!(
                    "cannot acquire index lock {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(IndexLock { file })
        })
        .await
    }
}

impl Drop for IndexLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| CatalogError::storage(format!("file task panicked: {}", e)))?
}

/// id 可能含有 `:` 等不適合當檔名的字元，以十六進位編碼
fn blob_prefix(id: &str) -> String {
    let mut prefix: String = id.bytes().map(|b| format!("{:02x}", b)).collect();
    prefix.push('-');
    prefix
}

/// 寫入 `dir` 下一個不會與既有檔案衝突的新檔，回傳檔名
async fn write_unique(dir: PathBuf, prefix: String, data: Vec<u8>) -> Result<String> {
    fs::create_dir_all(&dir).await?;

    blocking(move || {
        let mut file = tempfile::Builder::new().prefix(&prefix).tempfile_in(&dir)?;
        file.write_all(&data)?;
        file.as_file().sync_all()?;
        let (_, path) = file.keep().map_err(|e| e.error)?;

        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| CatalogError::storage(format!("unnamed blob in {}", dir.display())))
    })
    .await
}

/// 先寫 `staging` 中的暫存檔再改名覆蓋 `target`，暫存檔名各不相同
async fn replace_file(staging: PathBuf, target: PathBuf, data: Vec<u8>) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::create_dir_all(&staging).await?;

    blocking(move || {
        let mut tmp = tempfile::NamedTempFile::new_in(&staging)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
}
