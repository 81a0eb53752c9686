//! stats 作业 - 编排层
//!
//! 每个条目：取全文 → 关键词计数 → 计入累加器；
//! 最后输出每篇的命中数和每个关键词的均值/标准差。
//! 没有全文的条目不计入统计。

use crate::clients::ItemStore;
use crate::orchestrator::batch_processor::{load_source_items, App};
use crate::orchestrator::report::{BatchReport, Job};
use crate::services::{render_document_block, render_final_block, Stage, StatsAccumulator};
use crate::workflow::{DocumentFlow, ItemCtx};
use anyhow::Result;

pub async fn run<S: ItemStore>(app: &App, store: &S) -> Result<BatchReport> {
    let config = app.config();
    let events = app.events();

    let items = load_source_items(app, store).await?;
    let flow = DocumentFlow::new(store, config, app.stripper(), events.clone());

    let total = items.len();
    let mut report = BatchReport::new(Job::Stats, total);
    let mut accumulator = StatsAccumulator::new(&config.patterns);
    let mut output = String::new();

    for (index, item) in items.iter().enumerate() {
        let ctx = ItemCtx::new(
            item.key.clone(),
            index + 1,
            total,
            item.display_title().to_string(),
        );

        match flow.count_keywords(item, &ctx).await {
            Ok(doc) => {
                accumulator.record(&doc.counts);
                output.push_str(&render_document_block(&doc));
                events.info(
                    Stage::Count,
                    Some(&ctx.item_key),
                    format!("{} ✓ 统计完成: {}", ctx, doc.title),
                );
                report.processed += 1;
            }
            Err(e) => {
                events.warn(
                    Stage::Count,
                    Some(&ctx.item_key),
                    format!("{} ⚠️ 跳过: {}", ctx, e),
                );
                report.skipped.record(&ctx, e);
            }
        }
    }

    let stats = accumulator.finalize();
    for stat in &stats {
        events.info(Stage::Summary, None, format!("  - {}", stat));
    }
    output.push_str(&render_final_block(&stats));

    let path = config.config.output_path(&config.config.stats_file);
    match app.files().write(&path, &output).await {
        Ok(()) => {
            events.info(
                Stage::Write,
                None,
                format!("✓ 统计结果已写入 {}", path.display()),
            );
            report.outputs.push(path);
        }
        Err(e) => events.error(Stage::Write, None, e.to_string()),
    }

    Ok(report)
}
