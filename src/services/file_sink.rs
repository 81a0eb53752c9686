//! 文件写入服务 - 业务能力层
//!
//! 只负责"整文件覆盖写入"能力，不关心流程

use crate::error::FileError;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// 文件写入服务
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        Self
    }

    /// 确保目录存在
    pub async fn ensure_dir(&self, dir: &Path) -> Result<(), FileError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|source| FileError::CreateDirFailed {
                path: dir.display().to_string(),
                source,
            })
    }

    /// 整文件覆盖写入，必要时创建父目录
    pub async fn write(&self, path: &Path, contents: &str) -> Result<(), FileError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.ensure_dir(parent).await?;
        }

        debug!("写入文件: {} ({} 字节)", path.display(), contents.len());

        fs::write(path, contents)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: path.display().to_string(),
                source,
            })
    }
}

/// 标题转文件名：空格变 `--`，冒号分号和路径分隔符变 `-`，去掉引号和括号
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len() + 8);
    for c in title.chars() {
        match c {
            ' ' => out.push_str("--"),
            ':' | ';' | '/' | '\\' => out.push('-'),
            '"' | '\'' | '(' | ')' => {}
            _ => out.push(c),
        }
    }
    out
}

/// 单篇文章输出文件名
pub fn article_file_name(item_key: &str, title: &str) -> String {
    format!("{}-{}.txt", item_key, sanitize_title(title))
}
