/// 本地快照文献库
///
/// 从 TOML 快照加载；附件全文来自内联文本或快照旁的全文缓存文件
use crate::clients::item_store::ItemStore;
use crate::error::{StoreError, StoreResult};
use crate::models::item::{Attachment, Collection, Item, Note};
use crate::models::loaders::{load_snapshot, save_snapshot, LibrarySnapshot};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

pub struct LocalLibrary {
    /// 快照文件路径，None 表示只在内存中
    path: Option<PathBuf>,
    /// 全文缓存文件的相对路径基准
    base_dir: PathBuf,
    snapshot: RwLock<LibrarySnapshot>,
}

impl LocalLibrary {
    /// 打开快照文件
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let snapshot = load_snapshot(path)
            .await
            .map_err(|e| StoreError::Snapshot {
                path: path.display().to_string(),
                reason: format!("{e:#}"),
            })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            path: Some(path.to_path_buf()),
            base_dir,
            snapshot: RwLock::new(snapshot),
        })
    }

    /// 纯内存文献库，save_item 不落盘
    pub fn in_memory(snapshot: LibrarySnapshot, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: None,
            base_dir: base_dir.into(),
            snapshot: RwLock::new(snapshot),
        }
    }

    pub async fn snapshot(&self) -> LibrarySnapshot {
        self.snapshot.read().await.clone()
    }
}

impl ItemStore for LocalLibrary {
    async fn collections(&self) -> StoreResult<Vec<Collection>> {
        Ok(self.snapshot.read().await.collections.clone())
    }

    async fn collection_items(&self, collection_key: &str) -> StoreResult<Vec<Item>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .items
            .iter()
            .filter(|item| item.collections.iter().any(|c| c == collection_key))
            .map(|item| item.to_item())
            .collect())
    }

    async fn item(&self, item_key: &str) -> StoreResult<Option<Item>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .items
            .iter()
            .find(|item| item.key == item_key)
            .map(|item| item.to_item()))
    }

    async fn notes(&self, item_key: &str) -> StoreResult<Vec<Note>> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .items
            .iter()
            .find(|item| item.key == item_key)
            .map(|item| item.notes.clone())
            .ok_or_else(|| StoreError::ItemNotFound {
                key: item_key.to_string(),
            })
    }

    async fn attachments(&self, item_key: &str) -> StoreResult<Vec<Attachment>> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .items
            .iter()
            .find(|item| item.key == item_key)
            .map(|item| item.attachments.clone())
            .ok_or_else(|| StoreError::ItemNotFound {
                key: item_key.to_string(),
            })
    }

    async fn attachment_text(&self, attachment: &Attachment) -> StoreResult<Option<String>> {
        if let Some(text) = attachment.text.as_ref().filter(|t| !t.trim().is_empty()) {
            return Ok(Some(text.clone()));
        }

        let Some(relative) = attachment.text_path.as_deref() else {
            return Ok(None);
        };

        let path = self.base_dir.join(relative);
        match fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("全文缓存不存在: {}", path.display());
                Ok(None)
            }
            Err(source) => Err(StoreError::Extraction {
                key: attachment.key.clone(),
                source,
            }),
        }
    }

    async fn add_to_collection(&self, item_key: &str, collection_key: &str) -> StoreResult<bool> {
        let mut snapshot = self.snapshot.write().await;
        let item = snapshot
            .items
            .iter_mut()
            .find(|item| item.key == item_key)
            .ok_or_else(|| StoreError::ItemNotFound {
                key: item_key.to_string(),
            })?;

        if item.collections.iter().any(|c| c == collection_key) {
            return Ok(false);
        }
        item.collections.push(collection_key.to_string());

        let Some(path) = &self.path else {
            return Ok(true);
        };

        // 落盘失败时撤销内存中的修改，保证内存与文件一致
        if let Err(e) = save_snapshot(path, &snapshot).await {
            if let Some(item) = snapshot.items.iter_mut().find(|item| item.key == item_key) {
                item.collections.retain(|c| c != collection_key);
            }
            return Err(StoreError::Snapshot {
                path: path.display().to_string(),
                reason: format!("{e:#}"),
            });
        }
        Ok(true)
    }

    /// 成员关系在 add_to_collection 中已经落盘，这里只确认条目存在
    async fn save_item(&self, item_key: &str) -> StoreResult<()> {
        let snapshot = self.snapshot.read().await;
        if snapshot.items.iter().any(|item| item.key == item_key) {
            Ok(())
        } else {
            Err(StoreError::ItemNotFound {
                key: item_key.to_string(),
            })
        }
    }
}
