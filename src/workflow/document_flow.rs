//! 单篇文献处理流程 - 流程层
//!
//! 核心职责：定义"一个条目"从取全文到产出结果的流程
//!
//! 流程顺序：
//! 1. 列出附件 → 按类型过滤 → 取全文（HTML 先转纯文本）
//! 2. 清洗 → 章节格式化（extract）或 关键词计数（stats）
//! 3. 读取笔记 → 转纯文本（promote）
//!
//! 每一步失败都只返回 `ProcessingError`，由编排层决定跳过

use std::sync::Arc;

use crate::clients::ItemStore;
use crate::config::ValidatedConfig;
use crate::error::ProcessingError;
use crate::models::document::{Document, DocumentCounts, FormattedArticle};
use crate::models::item::Item;
use crate::services::{
    count_matches, EventSink, HtmlStripper, QuorumFilter, SectionFormatter, Stage,
    TextNormalizer,
};
use crate::workflow::item_ctx::ItemCtx;

/// 全文整理时各附件之间的分隔
const ARTICLE_SEPARATOR: &str = "\n\n";
/// 关键词统计时各附件之间的分隔
const COUNT_SEPARATOR: &str = " ";

/// 单篇文献处理流程
///
/// - 不持有文献库，只借用
/// - 不写文件，写入由编排层负责
pub struct DocumentFlow<'a, S: ItemStore> {
    store: &'a S,
    config: &'a ValidatedConfig,
    stripper: Arc<dyn HtmlStripper>,
    events: Arc<dyn EventSink>,
}

impl<'a, S: ItemStore> DocumentFlow<'a, S> {
    pub fn new(
        store: &'a S,
        config: &'a ValidatedConfig,
        stripper: Arc<dyn HtmlStripper>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            config,
            stripper,
            events,
        }
    }

    /// 收集条目所有可用附件的全文
    pub async fn load_document(
        &self,
        item: &Item,
        ctx: &ItemCtx,
    ) -> Result<Document, ProcessingError> {
        let attachments = self.store.attachments(&item.key).await?;
        let mut segments = Vec::new();

        for attachment in attachments {
            if !self.config.accepts_content_type(&attachment.content_type) {
                self.events.debug(
                    Stage::Extract,
                    Some(&ctx.item_key),
                    format!(
                        "{} 跳过附件 {} ({})",
                        ctx, attachment.key, attachment.content_type
                    ),
                );
                continue;
            }

            let text = self
                .store
                .attachment_text(&attachment)
                .await
                .map(|text| text.map(|t| self.visible_text(&attachment.content_type, t)));

            match text {
                Ok(Some(text)) if !text.trim().is_empty() => segments.push(text),
                Ok(_) => {
                    self.events.debug(
                        Stage::Extract,
                        Some(&ctx.item_key),
                        format!("{} 附件 {} 没有全文", ctx, attachment.key),
                    );
                }
                Err(e) => {
                    self.events.warn(
                        Stage::Extract,
                        Some(&ctx.item_key),
                        format!("{} 附件 {} 全文读取失败: {}", ctx, attachment.key, e),
                    );
                }
            }
        }

        if segments.is_empty() {
            return Err(ProcessingError::NoText {
                key: item.key.clone(),
            });
        }

        Ok(Document {
            key: item.key.clone(),
            title: item.display_title().to_string(),
            authors: item.author_names(),
            segments,
        })
    }

    /// HTML 附件只保留可见文本
    fn visible_text(&self, content_type: &str, text: String) -> String {
        if content_type.eq_ignore_ascii_case("text/html") {
            self.stripper.strip(&text)
        } else {
            text
        }
    }

    /// 取全文 → 清洗 → 章节格式化
    pub async fn extract_article(
        &self,
        item: &Item,
        ctx: &ItemCtx,
        normalizer: &TextNormalizer,
        formatter: &SectionFormatter,
    ) -> Result<FormattedArticle, ProcessingError> {
        let document = self.load_document(item, ctx).await?;
        let combined = document.combined_text(ARTICLE_SEPARATOR);

        let normalized = normalizer.normalize(&combined);
        self.events.debug(
            Stage::Normalize,
            Some(&ctx.item_key),
            format!(
                "{} 清洗完成: {} → {} 字符",
                ctx,
                combined.len(),
                normalized.len()
            ),
        );

        Ok(FormattedArticle {
            key: document.key,
            title: document.title,
            authors: document.authors,
            body: formatter.format(&normalized),
        })
    }

    /// 取全文 → 关键词计数
    pub async fn count_keywords(
        &self,
        item: &Item,
        ctx: &ItemCtx,
    ) -> Result<DocumentCounts, ProcessingError> {
        let document = self.load_document(item, ctx).await?;
        let combined = document.combined_text(COUNT_SEPARATOR);
        let counts = count_matches(&combined, &self.config.patterns);

        for (label, count) in counts.iter() {
            self.events.debug(
                Stage::Count,
                Some(&ctx.item_key),
                format!("{}   - '{}': {}", ctx, label, count),
            );
        }

        Ok(DocumentCounts {
            key: document.key,
            title: document.title,
            counts,
        })
    }

    /// 读取条目笔记的纯文本
    pub async fn note_texts(
        &self,
        item: &Item,
        ctx: &ItemCtx,
        filter: &QuorumFilter,
    ) -> Result<Vec<String>, ProcessingError> {
        let notes = self.store.notes(&item.key).await?;

        if notes.is_empty() {
            self.events.info(
                Stage::Vote,
                Some(&ctx.item_key),
                format!("{} 📄 {} 没有笔记", ctx, ctx.title),
            );
            return Ok(Vec::new());
        }

        self.events.info(
            Stage::Vote,
            Some(&ctx.item_key),
            format!("{} 📄 {} 有 {} 条笔记", ctx, ctx.title, notes.len()),
        );

        let texts: Vec<String> = notes.iter().map(|note| filter.note_text(note)).collect();
        for (index, text) in texts.iter().enumerate() {
            self.events.debug(
                Stage::Vote,
                Some(&ctx.item_key),
                format!("{} 📝 笔记 {}: {}", ctx, index + 1, text),
            );
        }

        Ok(texts)
    }
}
