//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和作业调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 校验配置，打开文献库
//! - 按名称加载源分组的常规条目
//! - 分派作业并输出汇总
//!
//! ### `promote_job` / `extract_job` / `stats_job` - 三个作业
//! - 逐个条目顺序处理，单个条目失败只跳过
//! - 结果汇总到 `BatchReport`
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App)
//!     ↓
//! promote_job / extract_job / stats_job (遍历 Vec<Item>)
//!     ↓
//! workflow::DocumentFlow (处理单个 Item)
//!     ↓
//! services (能力层：清洗 / 格式化 / 计数 / 投票 / 写文件)
//!     ↓
//! clients (文献库：本地快照 / Web API)
//! ```

pub mod batch_processor;
pub mod extract_job;
pub mod promote_job;
pub mod report;
pub mod stats_job;

// 重新导出主要类型
pub use batch_processor::App;
pub use report::{BatchReport, Job, SkipLog, SkippedItem};
