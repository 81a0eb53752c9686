/// 文献库 Web API 客户端（v3）
///
/// 封装分组、条目、子条目、全文和分组成员修改的调用
use crate::clients::item_store::ItemStore;
use crate::config::LibraryType;
use crate::error::{StoreError, StoreResult};
use crate::models::item::{Attachment, Collection, Creator, Item, Note};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// 单页最大条数（API 上限 100）
const PAGE_SIZE: usize = 100;
const API_VERSION: &str = "3";

#[derive(Debug, Deserialize)]
struct ApiObject<T> {
    key: String,
    #[serde(default)]
    version: u64,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionData {
    name: String,
    /// 顶层分组为 false，否则为父分组 key
    #[serde(default)]
    parent_collection: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemData {
    #[serde(default)]
    item_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    creators: Vec<ApiCreator>,
    #[serde(default)]
    collections: Vec<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCreator {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FullText {
    #[serde(default)]
    content: String,
}

/// Web API 文献库
pub struct WebLibraryClient {
    http: reqwest::Client,
    /// 例如 https://api.zotero.org/groups/12345
    library_url: String,
    api_key: Option<String>,
}

impl WebLibraryClient {
    pub fn new(
        base_url: &str,
        library_type: LibraryType,
        library_id: &str,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            library_url: format!(
                "{}/{}/{}",
                base_url.trim_end_matches('/'),
                library_type.path_segment(),
                library_id
            ),
            api_key,
        }
    }

    pub fn library_url(&self) -> &str {
        &self.library_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}/{}", self.library_url, path))
            .header("Zotero-API-Version", API_VERSION);
        match &self.api_key {
            Some(key) => builder.header("Zotero-API-Key", key),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> StoreResult<Response> {
        debug!("请求 {}", endpoint);
        builder.send().await.map_err(|source| StoreError::Request {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response, endpoint: &str) -> StoreResult<T> {
        if !response.status().is_success() {
            return Err(StoreError::BadResponse {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }
        response.json::<T>().await.map_err(|source| StoreError::Request {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// GET 单个资源，404 返回 None
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Option<T>> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read_json(response, path).await.map(Some)
    }

    /// 按 limit/start 翻页直到取完
    async fn get_paged<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Vec<T>> {
        let mut all = Vec::new();
        let mut start = 0usize;

        loop {
            let builder = self.request(Method::GET, path).query(&[
                ("limit", PAGE_SIZE.to_string()),
                ("start", start.to_string()),
            ]);
            let response = self.send(builder, path).await?;
            let page: Vec<T> = Self::read_json(response, path).await?;
            let fetched = page.len();
            all.extend(page);

            if fetched < PAGE_SIZE {
                break;
            }
            start += fetched;
        }

        Ok(all)
    }

    async fn children(&self, item_key: &str) -> StoreResult<Vec<ApiObject<ItemData>>> {
        self.get_paged(&format!("items/{}/children", item_key)).await
    }
}

fn to_collection(obj: ApiObject<CollectionData>) -> Collection {
    Collection {
        key: obj.key,
        name: obj.data.name,
        parent: obj.data.parent_collection.as_str().map(str::to_string),
    }
}

fn to_item(obj: ApiObject<ItemData>) -> Item {
    Item {
        key: obj.key,
        item_type: obj.data.item_type,
        title: obj.data.title,
        creators: obj
            .data
            .creators
            .into_iter()
            .map(|c| Creator {
                first_name: c.first_name,
                last_name: c.last_name,
                name: c.name,
            })
            .collect(),
        collections: obj.data.collections,
    }
}

impl ItemStore for WebLibraryClient {
    async fn collections(&self) -> StoreResult<Vec<Collection>> {
        let objects: Vec<ApiObject<CollectionData>> = self.get_paged("collections").await?;
        Ok(objects.into_iter().map(to_collection).collect())
    }

    async fn collection_items(&self, collection_key: &str) -> StoreResult<Vec<Item>> {
        let objects: Vec<ApiObject<ItemData>> = self
            .get_paged(&format!("collections/{}/items/top", collection_key))
            .await?;
        Ok(objects.into_iter().map(to_item).collect())
    }

    async fn item(&self, item_key: &str) -> StoreResult<Option<Item>> {
        let object: Option<ApiObject<ItemData>> =
            self.get_optional(&format!("items/{}", item_key)).await?;
        Ok(object.map(to_item))
    }

    async fn notes(&self, item_key: &str) -> StoreResult<Vec<Note>> {
        Ok(self
            .children(item_key)
            .await?
            .into_iter()
            .filter(|child| child.data.item_type == "note")
            .map(|child| Note {
                key: child.key,
                html: child.data.note.unwrap_or_default(),
            })
            .collect())
    }

    async fn attachments(&self, item_key: &str) -> StoreResult<Vec<Attachment>> {
        Ok(self
            .children(item_key)
            .await?
            .into_iter()
            .filter(|child| child.data.item_type == "attachment")
            .map(|child| Attachment {
                key: child.key,
                content_type: child.data.content_type.unwrap_or_default(),
                text: None,
                text_path: None,
            })
            .collect())
    }

    async fn attachment_text(&self, attachment: &Attachment) -> StoreResult<Option<String>> {
        let full_text: Option<FullText> = self
            .get_optional(&format!("items/{}/fulltext", attachment.key))
            .await?;
        Ok(full_text
            .map(|ft| ft.content)
            .filter(|content| !content.trim().is_empty()))
    }

    async fn add_to_collection(&self, item_key: &str, collection_key: &str) -> StoreResult<bool> {
        let path = format!("items/{}", item_key);
        let object: ApiObject<ItemData> =
            self.get_optional(&path)
                .await?
                .ok_or_else(|| StoreError::ItemNotFound {
                    key: item_key.to_string(),
                })?;

        if object.data.collections.iter().any(|c| c == collection_key) {
            return Ok(false);
        }

        let mut collections = object.data.collections;
        collections.push(collection_key.to_string());

        let builder = self
            .request(Method::PATCH, &path)
            .header("If-Unmodified-Since-Version", object.version.to_string())
            .json(&json!({ "collections": collections }));
        let response = self.send(builder, &path).await?;

        if response.status().is_success() {
            Ok(true)
        } else {
            Err(StoreError::BadResponse {
                endpoint: path,
                status: response.status().as_u16(),
            })
        }
    }

    async fn save_item(&self, item_key: &str) -> StoreResult<()> {
        // PATCH 已经提交，无需再次写入
        debug!("条目 {} 已通过 API 提交", item_key);
        Ok(())
    }
}
