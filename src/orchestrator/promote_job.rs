//! promote 作业 - 编排层
//!
//! 遍历源分组，读取每个条目的笔记；票数达到门槛的条目加入目标分组。
//! 目标分组不存在时在处理任何条目之前终止。

use crate::clients::{find_collection, ItemStore};
use crate::error::{StoreError, StoreResult};
use crate::orchestrator::batch_processor::{load_source_items, App};
use crate::orchestrator::report::{BatchReport, Job};
use crate::services::{QuorumFilter, Stage};
use crate::workflow::{DocumentFlow, ItemCtx};
use anyhow::{Context, Result};

pub async fn run<S: ItemStore>(app: &App, store: &S) -> Result<BatchReport> {
    let config = app.config();
    let events = app.events();

    let target_name = &config.config.target_collection;
    let target = find_collection(store, target_name)
        .await
        .with_context(|| format!("查找目标分组 \"{}\" 失败", target_name))?;
    let items = load_source_items(app, store).await?;

    let total = items.len();
    let mut report = BatchReport::new(Job::Promote, total);

    if items.is_empty() {
        events.warn(Stage::Fetch, None, "⚠️ 源分组中没有条目");
        return Ok(report);
    }

    let filter = QuorumFilter::new(
        app.stripper(),
        config.vote_pattern.clone(),
        config.config.quorum,
    );
    let flow = DocumentFlow::new(store, config, app.stripper(), events.clone());

    // 第一轮：统计票数
    let mut selected = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let ctx = ItemCtx::new(
            item.key.clone(),
            index + 1,
            total,
            item.display_title().to_string(),
        );

        match flow.note_texts(item, &ctx, &filter).await {
            Ok(texts) => {
                report.processed += 1;
                let votes = filter.count_votes(&texts);
                if filter.is_selected(&texts) {
                    events.info(
                        Stage::Vote,
                        Some(&ctx.item_key),
                        format!("{} ✓ {}/{} 条笔记投了赞成票", ctx, votes, texts.len()),
                    );
                    selected.push(ctx);
                } else {
                    events.debug(
                        Stage::Vote,
                        Some(&ctx.item_key),
                        format!("{} 票数不足: {}/{}", ctx, votes, texts.len()),
                    );
                }
            }
            Err(e) => {
                events.error(
                    Stage::Fetch,
                    Some(&ctx.item_key),
                    format!("{} 读取笔记失败: {}", ctx, e),
                );
                report.skipped.record(&ctx, e);
            }
        }
    }

    if selected.is_empty() {
        events.info(Stage::Vote, None, "没有条目满足投票条件");
        return Ok(report);
    }

    events.info(
        Stage::Promote,
        None,
        format!(
            "📤 {} 个条目满足条件，加入分组 \"{}\"",
            selected.len(),
            target.name
        ),
    );

    // 第二轮：加入目标分组
    for ctx in &selected {
        match promote(store, &ctx.item_key, &target.key).await {
            Ok(true) => {
                report.promoted += 1;
                events.info(
                    Stage::Promote,
                    Some(&ctx.item_key),
                    format!("{} ✓ 已加入 \"{}\"", ctx, target.name),
                );
            }
            Ok(false) => {
                events.info(
                    Stage::Promote,
                    Some(&ctx.item_key),
                    format!("{} 已在 \"{}\" 中", ctx, target.name),
                );
            }
            Err(e) => {
                events.error(
                    Stage::Promote,
                    Some(&ctx.item_key),
                    format!("{} 加入分组失败: {}", ctx, e),
                );
                report.skipped.record(ctx, e);
            }
        }
    }

    Ok(report)
}

/// 重新读取条目后加入分组并保存；已是成员时不写入
async fn promote<S: ItemStore>(store: &S, item_key: &str, target_key: &str) -> StoreResult<bool> {
    let item = store
        .item(item_key)
        .await?
        .ok_or_else(|| StoreError::ItemNotFound {
            key: item_key.to_string(),
        })?;
    if item.in_collection(target_key) {
        return Ok(false);
    }

    let added = store.add_to_collection(item_key, target_key).await?;
    if added {
        store.save_item(item_key).await?;
    }
    Ok(added)
}
