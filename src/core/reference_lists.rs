use crate::domain::model::{CaseInsensitiveSet, ReferenceListKind};
use crate::domain::ports::ReferenceListStore;
use crate::utils::error::Result;

const BOM: char = '\u{feff}';

/// TSO 與 business process 清單。
///
/// 標準格式為 JSON 字串陣列，也接受以換行分隔的純文字。
/// 匯入時原樣保存位元組，格式只在讀取時解讀。
pub struct ReferenceListCatalog<L: ReferenceListStore> {
    store: L,
}

impl<L: ReferenceListStore> ReferenceListCatalog<L> {
    pub fn new(store: L) -> Self {
        Self { store }
    }

    /// 整份取代既有清單
    pub async fn import(&self, kind: ReferenceListKind, payload: Vec<u8>) -> Result<()> {
        let entries = parse_payload(&payload);
        self.store.put(kind.key(), &payload).await?;

        tracing::info!("📥 Imported {} list ({} entries)", kind, entries.len());
        Ok(())
    }

    /// 清單不存在時回傳空集合，而非錯誤
    pub async fn get(&self, kind: ReferenceListKind) -> Result<CaseInsensitiveSet> {
        match self.store.get(kind.key()).await? {
            Some(payload) => Ok(parse_payload(&payload)),
            None => {
                tracing::debug!("No {} list stored, returning empty set", kind);
                Ok(CaseInsensitiveSet::new())
            }
        }
    }
}

fn looks_like_json(text: &str) -> bool {
    text.trim_start().starts_with('[')
}

fn parse_lines(text: &str) -> CaseInsensitiveSet {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// 解讀清單 blob，不會失敗。
///
/// 開頭的 BOM 會被略過；看起來像 JSON 但不是字串陣列時改以逐行解讀。
pub fn parse_payload(payload: &[u8]) -> CaseInsensitiveSet {
    let decoded = String::from_utf8_lossy(payload);
    let text = decoded.trim_start_matches(BOM);

    if looks_like_json(text) {
        match serde_json::from_str::<Vec<String>>(text) {
            Ok(entries) => return entries.into_iter().collect(),
            Err(e) => {
                tracing::warn!("⚠️ Reference list is not a JSON string array ({}), reading it as lines", e);
            }
        }
    }
    parse_lines(text)
}
