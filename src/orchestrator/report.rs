//! 批次结果
//!
//! 每个作业返回一个 `BatchReport`，跳过的条目集中记录在 `SkipLog` 中

use crate::workflow::ItemCtx;
use std::fmt;
use std::path::PathBuf;

/// 批处理作业
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// 按投票把条目推送到目标分组
    Promote,
    /// 导出清洗并格式化后的全文
    Extract,
    /// 统计关键词命中
    Stats,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Job::Promote => "promote",
            Job::Extract => "extract",
            Job::Stats => "stats",
        };
        f.write_str(name)
    }
}

/// 被跳过的条目
#[derive(Debug, Clone)]
pub struct SkippedItem {
    pub key: String,
    pub title: String,
    pub reason: String,
}

/// 跳过记录，按发生顺序保存
#[derive(Debug, Clone, Default)]
pub struct SkipLog {
    entries: Vec<SkippedItem>,
}

impl SkipLog {
    pub fn record(&mut self, ctx: &ItemCtx, reason: impl fmt::Display) {
        self.entries.push(SkippedItem {
            key: ctx.item_key.clone(),
            title: ctx.title.clone(),
            reason: reason.to_string(),
        });
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkippedItem> {
        self.entries.iter()
    }
}

/// 一次作业的汇总
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub job: Job,
    /// 源分组中的常规条目数
    pub total: usize,
    /// 成功处理的条目数
    pub processed: usize,
    /// 新加入目标分组的条目数（仅 promote）
    pub promoted: usize,
    pub skipped: SkipLog,
    /// 成功写出的文件
    pub outputs: Vec<PathBuf>,
}

impl BatchReport {
    pub fn new(job: Job, total: usize) -> Self {
        Self {
            job,
            total,
            processed: 0,
            promoted: 0,
            skipped: SkipLog::default(),
            outputs: Vec::new(),
        }
    }
}
