use crate::domain::model::{BoundaryInfo, BoundaryRecord, ModelHeader};
use crate::utils::error::Result;
use std::future::Future;

/// 從原始文件內容讀出標頭；無法辨識時回傳 `MalformedDocument`
pub trait HeaderReader: Send + Sync {
    fn read_header(&self, content: &[u8]) -> Result<ModelHeader>;
}

/// Boundary 記錄的鍵值儲存，鍵為記錄 id
pub trait BoundaryStore: Send + Sync {
    /// 新增或整筆覆蓋
    fn put(&self, record: BoundaryRecord) -> impl Future<Output = Result<()>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Option<BoundaryRecord>>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<BoundaryRecord>>> + Send;

    /// 與 `get_all` 相同順序，但不讀取內容
    fn get_all_infos(&self) -> impl Future<Output = Result<Vec<BoundaryInfo>>> + Send;

    fn exists(&self, id: &str) -> impl Future<Output = Result<bool>> + Send;

    /// 記錄不存在時回傳 `NotFound`
    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// 參考清單的原始 blob 儲存，鍵為固定名稱
pub trait ReferenceListStore: Send + Sync {
    fn put(&self, key: &str, payload: &[u8]) -> impl Future<Output = Result<()>> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn backend(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn profiles(&self) -> &[String];
}
