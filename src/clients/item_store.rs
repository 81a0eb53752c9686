/// 文献库访问接口
///
/// 文献库本身是外部协作方：读分组/条目/笔记/附件，写分组成员关系
use crate::error::{StoreError, StoreResult};
use crate::models::item::{Attachment, Collection, Item, Note};

/// 文献库
///
/// 所有调用都在单个任务中顺序执行，不要求 `Send` future
#[allow(async_fn_in_trait)]
pub trait ItemStore {
    /// 列出库中全部分组
    async fn collections(&self) -> StoreResult<Vec<Collection>>;

    /// 列出分组中的条目
    async fn collection_items(&self, collection_key: &str) -> StoreResult<Vec<Item>>;

    /// 按 key 获取条目
    async fn item(&self, item_key: &str) -> StoreResult<Option<Item>>;

    /// 条目下的笔记
    async fn notes(&self, item_key: &str) -> StoreResult<Vec<Note>>;

    /// 条目下的附件
    async fn attachments(&self, item_key: &str) -> StoreResult<Vec<Attachment>>;

    /// 附件全文（按需抽取），没有可用文本时返回 `Ok(None)`
    async fn attachment_text(&self, attachment: &Attachment) -> StoreResult<Option<String>>;

    /// 把条目加入分组；已经是成员时什么都不做并返回 `false`
    async fn add_to_collection(&self, item_key: &str, collection_key: &str) -> StoreResult<bool>;

    /// 持久化条目元数据
    async fn save_item(&self, item_key: &str) -> StoreResult<()>;
}

/// 按名称查找分组，找不到视为致命错误
pub async fn find_collection<S: ItemStore>(store: &S, name: &str) -> StoreResult<Collection> {
    store
        .collections()
        .await?
        .into_iter()
        .find(|c| c.name == name)
        .ok_or_else(|| StoreError::CollectionNotFound {
            name: name.to_string(),
        })
}
