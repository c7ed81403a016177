use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// 從文件 `md:FullModel` 標頭取出的識別資訊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHeader {
    pub id: String,
    pub scenario_time: Option<NaiveDateTime>,
}

/// 已匯入的 boundary 檔案，以標頭 id 為唯一鍵
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRecord {
    pub id: String,
    pub filename: String,
    pub content: Vec<u8>,
    pub scenario_time: Option<NaiveDateTime>,
}

impl BoundaryRecord {
    pub fn info(&self) -> BoundaryInfo {
        BoundaryInfo {
            id: self.id.clone(),
            filename: self.filename.clone(),
            scenario_time: self.scenario_time,
        }
    }

    /// 解碼成文字，只在輸出邊界使用；非 UTF-8 位元組以替代字元呈現
    pub fn into_content(self) -> BoundaryContent {
        let boundary = match String::from_utf8(self.content) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        BoundaryContent {
            info: BoundaryInfo {
                id: self.id,
                filename: self.filename,
                scenario_time: self.scenario_time,
            },
            boundary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryInfo {
    pub id: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryContent {
    #[serde(flatten)]
    pub info: BoundaryInfo,
    pub boundary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceListKind {
    Tsos,
    BusinessProcesses,
}

impl ReferenceListKind {
    pub const ALL: [ReferenceListKind; 2] =
        [ReferenceListKind::Tsos, ReferenceListKind::BusinessProcesses];

    /// 儲存層使用的固定鍵
    pub fn key(&self) -> &'static str {
        match self {
            ReferenceListKind::Tsos => "tsos",
            ReferenceListKind::BusinessProcesses => "businessProcesses",
        }
    }
}

impl fmt::Display for ReferenceListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 保留原始大小寫、以忽略大小寫方式比較的字串
#[derive(Debug, Clone)]
struct CaseInsensitiveString(String);

impl CaseInsensitiveString {
    fn folded(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().flat_map(char::to_lowercase)
    }
}

impl Ord for CaseInsensitiveString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for CaseInsensitiveString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CaseInsensitiveString {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CaseInsensitiveString {}

/// 忽略大小寫去重、排序的字串集合。
///
/// 重複項目保留第一次出現時的寫法，例如先插入 "RTE" 再插入 "rte"，
/// 集合中只有 "RTE"。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveSet {
    entries: BTreeSet<CaseInsensitiveString>,
}

impl CaseInsensitiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 回傳 false 表示已存在同名（忽略大小寫）項目
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        self.entries.insert(CaseInsensitiveString(value.into()))
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries
            .contains(&CaseInsensitiveString(value.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.0.as_str())
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CaseInsensitiveSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CaseInsensitiveSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl Serialize for CaseInsensitiveSet {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.iter())
    }
}
