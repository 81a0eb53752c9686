//! 批处理入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责配置校验、文献库连接和作业分派。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置，编译全部规则
//! 2. **打开文献库**：按 `store` 配置打开本地快照或 Web API
//! 3. **加载条目**：按名称找到源分组，过滤掉非常规条目
//! 4. **作业分派**：委托 promote / extract / stats 作业
//! 5. **全局统计**：输出作业汇总
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个条目的细节
//! - **可替换观察者**：事件经由 `EventSink` 输出，测试中可换成 `MemorySink`

use crate::clients::{find_collection, ItemStore, LibraryStore};
use crate::config::{Config, ValidatedConfig};
use crate::error::AppResult;
use crate::models::item::Item;
use crate::orchestrator::report::{BatchReport, Job};
use crate::orchestrator::{extract_job, promote_job, stats_job};
use crate::services::{EventSink, FileSink, HtmlStripper, ScraperStripper, Stage, TracingSink};
use crate::utils::logging::{log_items_loaded, log_startup, print_final_stats};
use anyhow::{Context, Result};
use std::sync::Arc;

/// 应用主结构
pub struct App {
    config: ValidatedConfig,
    events: Arc<dyn EventSink>,
    stripper: Arc<dyn HtmlStripper>,
    files: FileSink,
}

impl App {
    /// 初始化应用：校验配置，失败即终止
    pub fn initialize(config: Config) -> AppResult<Self> {
        let config = config.validate()?;

        Ok(Self {
            config,
            events: Arc::new(TracingSink),
            stripper: Arc::new(ScraperStripper),
            files: FileSink::new(),
        })
    }

    /// 替换事件观察者
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// 替换 HTML 转文本实现
    pub fn with_stripper(mut self, stripper: Arc<dyn HtmlStripper>) -> Self {
        self.stripper = stripper;
        self
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn events(&self) -> Arc<dyn EventSink> {
        self.events.clone()
    }

    pub fn stripper(&self) -> Arc<dyn HtmlStripper> {
        self.stripper.clone()
    }

    pub fn files(&self) -> FileSink {
        self.files
    }

    /// 打开配置中的文献库并运行作业
    pub async fn run(&self, job: Job) -> Result<BatchReport> {
        let store = LibraryStore::open(&self.config.config.store)
            .await
            .context("打开文献库失败")?;
        self.run_with(&store, job).await
    }

    /// 在给定文献库上运行作业
    pub async fn run_with<S: ItemStore>(&self, store: &S, job: Job) -> Result<BatchReport> {
        log_startup(job, &self.config);
        self.events.info(Stage::Setup, None, format!("开始作业 {}", job));

        let report = match job {
            Job::Promote => promote_job::run(self, store).await?,
            Job::Extract => extract_job::run(self, store).await?,
            Job::Stats => stats_job::run(self, store).await?,
        };

        self.events.info(
            Stage::Summary,
            None,
            format!(
                "{} 完成: 成功 {}/{}，跳过 {}",
                job,
                report.processed,
                report.total,
                report.skipped.len()
            ),
        );
        print_final_stats(&report);

        Ok(report)
    }
}

/// 加载源分组中的常规条目；分组不存在或无法列出都视为致命错误
pub(crate) async fn load_source_items<S: ItemStore>(app: &App, store: &S) -> Result<Vec<Item>> {
    let name = &app.config.config.source_collection;
    let source = find_collection(store, name)
        .await
        .with_context(|| format!("查找源分组 \"{}\" 失败", name))?;

    let items = store
        .collection_items(&source.key)
        .await
        .with_context(|| format!("列出分组 \"{}\" 的条目失败", name))?;

    let all = items.len();
    let regular: Vec<Item> = items.into_iter().filter(Item::is_regular).collect();
    log_items_loaded(name, regular.len(), all - regular.len());

    app.events.info(
        Stage::Fetch,
        None,
        format!("分组 \"{}\" ({}) 中有 {} 个条目", name, source.key, regular.len()),
    );

    Ok(regular)
}
