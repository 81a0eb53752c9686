use serde::{Deserialize, Serialize};

/// 分组（文献库中的集合）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// 作者
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// 单字段姓名（机构作者等）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Creator {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// 文献条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    #[serde(default = "default_item_type")]
    pub item_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creators: Vec<Creator>,
    /// 所属分组的 key
    #[serde(default)]
    pub collections: Vec<String>,
}

fn default_item_type() -> String {
    "journalArticle".to_string()
}

impl Item {
    /// 笔记、附件不是常规条目
    pub fn is_regular(&self) -> bool {
        self.item_type != "note" && self.item_type != "attachment"
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    pub fn author_names(&self) -> Vec<String> {
        self.creators.iter().map(Creator::display_name).collect()
    }

    pub fn in_collection(&self, collection_key: &str) -> bool {
        self.collections.iter().any(|c| c == collection_key)
    }
}

/// 笔记（审稿投票的载体），内容为 HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub key: String,
    #[serde(default)]
    pub html: String,
}

/// 附件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub key: String,
    #[serde(default)]
    pub content_type: String,
    /// 快照内联的全文
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 快照旁的全文缓存文件，相对快照目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_path: Option<String>,
}
