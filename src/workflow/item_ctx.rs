//! 条目处理上下文
//!
//! 封装"我正在处理分组里的第几个条目"这一信息

use std::fmt::Display;

/// 条目处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 条目 key
    pub item_key: String,

    /// 条目在批次中的序号（从1开始，仅用于日志）
    pub item_index: usize,

    /// 批次条目总数
    pub total: usize,

    /// 条目标题
    pub title: String,
}

impl ItemCtx {
    pub fn new(item_key: String, item_index: usize, total: usize, title: String) -> Self {
        Self {
            item_key,
            item_index,
            total,
            title,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[条目 {}/{} #{}]",
            self.item_index, self.total, self.item_key
        )
    }
}
