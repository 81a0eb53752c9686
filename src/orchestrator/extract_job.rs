//! extract 作业 - 编排层
//!
//! 每个条目：取全文 → 清洗 → 章节格式化 → 写单篇文件，
//! 同时拼接所有文章写出一个合集文件。
//! 单篇写入失败只丢失该文件，文章仍计入合集。

use crate::clients::ItemStore;
use crate::orchestrator::batch_processor::{load_source_items, App};
use crate::orchestrator::report::{BatchReport, Job};
use crate::services::{
    article_file_name, render_article, render_corpus_entry, SectionFormatter, Stage,
    TextNormalizer,
};
use crate::workflow::{DocumentFlow, ItemCtx};
use anyhow::{Context, Result};
use std::path::Path;

pub async fn run<S: ItemStore>(app: &App, store: &S) -> Result<BatchReport> {
    let config = app.config();
    let events = app.events();
    let files = app.files();

    let items = load_source_items(app, store).await?;

    let output_dir = Path::new(&config.config.output_dir);
    files
        .ensure_dir(output_dir)
        .await
        .context("创建输出目录失败")?;

    let normalizer = TextNormalizer::new().context("清洗规则编译失败")?;
    let formatter = SectionFormatter::new().context("章节规则编译失败")?;
    let flow = DocumentFlow::new(store, config, app.stripper(), events.clone());

    let total = items.len();
    let mut report = BatchReport::new(Job::Extract, total);
    let mut corpus = String::new();

    for (index, item) in items.iter().enumerate() {
        let ctx = ItemCtx::new(
            item.key.clone(),
            index + 1,
            total,
            item.display_title().to_string(),
        );

        let article = match flow
            .extract_article(item, &ctx, &normalizer, &formatter)
            .await
        {
            Ok(article) => article,
            Err(e) => {
                events.warn(
                    Stage::Extract,
                    Some(&ctx.item_key),
                    format!("{} ⚠️ 跳过: {}", ctx, e),
                );
                report.skipped.record(&ctx, e);
                continue;
            }
        };

        let path = output_dir.join(article_file_name(&article.key, &article.title));
        match files
            .write(&path, &render_article(&article.title, &article.body))
            .await
        {
            Ok(()) => {
                events.info(
                    Stage::Write,
                    Some(&ctx.item_key),
                    format!("{} ✓ 已写入 {}", ctx, path.display()),
                );
                report.outputs.push(path);
            }
            Err(e) => {
                events.error(Stage::Write, Some(&ctx.item_key), format!("{} {}", ctx, e));
            }
        }

        corpus.push_str(&render_corpus_entry(
            &article.title,
            &article.authors,
            &article.body,
        ));
        report.processed += 1;
    }

    let combined = config.config.output_path(&config.config.combined_file);
    match files.write(&combined, &corpus).await {
        Ok(()) => {
            events.info(
                Stage::Write,
                None,
                format!("✓ 合集已写入 {} ({} 篇)", combined.display(), report.processed),
            );
            report.outputs.push(combined);
        }
        Err(e) => events.error(Stage::Write, None, e.to_string()),
    }

    Ok(report)
}
