use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文献库访问错误
    #[error("文献库错误: {0}")]
    Store(#[from] StoreError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 字段取值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: String, reason: String },

    /// 关键词正则无法编译
    #[error("关键词 '{label}' 的正则无法编译: {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    /// 关键词标签重复
    #[error("关键词标签重复: '{label}'")]
    DuplicateLabel { label: String },

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 文献库访问错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 按名称找不到分组
    #[error("找不到分组: \"{name}\"")]
    CollectionNotFound { name: String },

    /// 找不到条目
    #[error("找不到条目: {key}")]
    ItemNotFound { key: String },

    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回非成功状态
    #[error("服务端返回错误 ({endpoint}): HTTP {status}")]
    BadResponse { endpoint: String, status: u16 },

    /// 快照文件读写失败
    #[error("快照文件错误 ({path}): {reason}")]
    Snapshot { path: String, reason: String },

    /// 附件文本读取失败
    #[error("附件 {key} 文本读取失败: {source}")]
    Extraction {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 单篇文献处理错误，只跳过当前条目，不中断批次
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// 没有可用的全文
    #[error("条目 {key} 没有可用的全文")]
    NoText { key: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
