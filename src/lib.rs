//! # Ref Batch
//!
//! 对文献库中一个分组做批处理的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 文献库访问层（Clients）
//! - `clients/` - 文献库是外部协作方，统一通过 `ItemStore` 访问
//! - `LocalLibrary` - TOML 快照 + 全文缓存文件
//! - `WebLibraryClient` - Web API（v3）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单段文本或单个条目
//! - `TextNormalizer` / `SectionFormatter` - 全文清洗与章节标题
//! - `count_matches` / `StatsAccumulator` - 关键词计数与统计
//! - `QuorumFilter` - 笔记投票
//! - `FileSink` / `EventSink` - 写文件与事件输出
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个条目"的完整处理流程
//! - `ItemCtx` - 上下文封装（key + 序号 + 标题）
//! - `DocumentFlow` - 取全文 → 清洗/计数，读笔记
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，打开文献库并分派作业
//! - `orchestrator/*_job` - promote / extract / stats 三个作业
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ItemStore, LibraryStore, LocalLibrary, WebLibraryClient};
pub use config::{Config, ValidatedConfig};
pub use error::{AppError, AppResult};
pub use orchestrator::{App, BatchReport, Job};
pub use workflow::{DocumentFlow, ItemCtx};
