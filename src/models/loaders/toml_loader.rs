use crate::models::item::{Attachment, Collection, Creator, Item, Note};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// 本地文献库快照（TOML）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

/// 快照中的条目，笔记和附件内嵌保存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub key: String,
    #[serde(default = "default_item_type")]
    pub item_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

fn default_item_type() -> String {
    "journalArticle".to_string()
}

impl SnapshotItem {
    pub fn to_item(&self) -> Item {
        Item {
            key: self.key.clone(),
            item_type: self.item_type.clone(),
            title: self.title.clone(),
            creators: self.creators.clone(),
            collections: self.collections.clone(),
        }
    }
}

/// 从 TOML 文件加载文献库快照
pub async fn load_snapshot(path: &Path) -> Result<LibrarySnapshot> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取快照文件: {}", path.display()))?;

    let snapshot: LibrarySnapshot = toml::from_str(&content)
        .with_context(|| format!("无法解析快照文件: {}", path.display()))?;

    tracing::info!(
        "已加载快照 {}: {} 个分组, {} 个条目",
        path.file_name().unwrap_or_default().to_string_lossy(),
        snapshot.collections.len(),
        snapshot.items.len()
    );

    Ok(snapshot)
}

/// 把快照写回 TOML 文件（整体覆盖）
pub async fn save_snapshot(path: &Path, snapshot: &LibrarySnapshot) -> Result<()> {
    let content = toml::to_string_pretty(snapshot).context("无法序列化快照")?;
    fs::write(path, content)
        .await
        .with_context(|| format!("无法写入快照文件: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"
[[collections]]
key = "C1"
name = "SOURCE"

[[items]]
key = "I1"
title = "Datafication of schools"
collections = ["C1"]

[[items.creators]]
first_name = "Ada"
last_name = "Lovelace"

[[items.notes]]
key = "N1"
html = "<p>Y-approve</p>"

[[items.attachments]]
key = "A1"
content_type = "application/pdf"
text = "full text"
"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot: LibrarySnapshot = toml::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.collections.len(), 1);
        let item = &snapshot.items[0];
        assert_eq!(item.item_type, "journalArticle");
        assert_eq!(item.notes[0].html, "<p>Y-approve</p>");
        assert_eq!(item.attachments[0].text.as_deref(), Some("full text"));
        assert_eq!(item.to_item().author_names(), vec!["Ada Lovelace"]);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("library.toml");
        let snapshot: LibrarySnapshot = toml::from_str(SNAPSHOT).unwrap();

        tokio_test::block_on(save_snapshot(&path, &snapshot)).unwrap();
        let reloaded = tokio_test::block_on(load_snapshot(&path)).unwrap();

        assert_eq!(reloaded.items[0].key, "I1");
        assert_eq!(reloaded.items[0].collections, vec!["C1"]);
    }
}
