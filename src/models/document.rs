use crate::models::pattern::MatchCounts;

/// 一次批处理中抽取出的单篇文献
///
/// 构造后不再修改，批次结束即丢弃
#[derive(Debug, Clone)]
pub struct Document {
    pub key: String,
    pub title: String,
    pub authors: Vec<String>,
    /// 每个附件一段原始文本，保持附件顺序
    pub segments: Vec<String>,
}

impl Document {
    pub fn combined_text(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}

/// 全文整理后的文章
#[derive(Debug, Clone)]
pub struct FormattedArticle {
    pub key: String,
    pub title: String,
    pub authors: Vec<String>,
    pub body: String,
}

/// 单篇文献的关键词统计结果
#[derive(Debug, Clone)]
pub struct DocumentCounts {
    pub key: String,
    pub title: String,
    pub counts: MatchCounts,
}
