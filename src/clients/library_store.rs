/// 按配置选择的文献库
///
/// `ItemStore` 含 async 方法，不能做成 trait object，这里用枚举分派
use crate::clients::item_store::ItemStore;
use crate::clients::local_library::LocalLibrary;
use crate::clients::web_library_client::WebLibraryClient;
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::models::item::{Attachment, Collection, Item, Note};
use std::path::Path;
use tracing::info;

pub enum LibraryStore {
    Local(LocalLibrary),
    Web(WebLibraryClient),
}

impl LibraryStore {
    /// 打开配置中的文献库
    pub async fn open(config: &StoreConfig) -> StoreResult<Self> {
        match config {
            StoreConfig::Snapshot { path } => {
                info!("📚 打开本地快照: {}", path);
                Ok(Self::Local(LocalLibrary::open(Path::new(path)).await?))
            }
            StoreConfig::Web {
                base_url,
                library_type,
                library_id,
                api_key,
            } => {
                let client =
                    WebLibraryClient::new(base_url, *library_type, library_id, api_key.clone());
                info!("🌐 连接文献库: {}", client.library_url());
                Ok(Self::Web(client))
            }
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            LibraryStore::Local($store) => $call.await,
            LibraryStore::Web($store) => $call.await,
        }
    };
}

impl ItemStore for LibraryStore {
    async fn collections(&self) -> StoreResult<Vec<Collection>> {
        dispatch!(self, s => s.collections())
    }

    async fn collection_items(&self, collection_key: &str) -> StoreResult<Vec<Item>> {
        dispatch!(self, s => s.collection_items(collection_key))
    }

    async fn item(&self, item_key: &str) -> StoreResult<Option<Item>> {
        dispatch!(self, s => s.item(item_key))
    }

    async fn notes(&self, item_key: &str) -> StoreResult<Vec<Note>> {
        dispatch!(self, s => s.notes(item_key))
    }

    async fn attachments(&self, item_key: &str) -> StoreResult<Vec<Attachment>> {
        dispatch!(self, s => s.attachments(item_key))
    }

    async fn attachment_text(&self, attachment: &Attachment) -> StoreResult<Option<String>> {
        dispatch!(self, s => s.attachment_text(attachment))
    }

    async fn add_to_collection(&self, item_key: &str, collection_key: &str) -> StoreResult<bool> {
        dispatch!(self, s => s.add_to_collection(item_key, collection_key))
    }

    async fn save_item(&self, item_key: &str) -> StoreResult<()> {
        dispatch!(self, s => s.save_item(item_key))
    }
}
