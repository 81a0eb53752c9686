//! 批处理事件 - 结构化日志观察者
//!
//! 每条事件携带 (级别, 阶段, 条目 key, 消息)，调用方可以挂任意 sink

use std::fmt;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// 处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    Fetch,
    Extract,
    Normalize,
    Count,
    Vote,
    Promote,
    Write,
    Summary,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Setup => "setup",
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Normalize => "normalize",
            Stage::Count => "count",
            Stage::Vote => "vote",
            Stage::Promote => "promote",
            Stage::Write => "write",
            Stage::Summary => "summary",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEvent {
    pub level: EventLevel,
    pub stage: Stage,
    pub item_key: Option<String>,
    pub message: String,
}

impl BatchEvent {
    pub fn new(
        level: EventLevel,
        stage: Stage,
        item_key: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            stage,
            item_key: item_key.map(str::to_string),
            message: message.into(),
        }
    }
}

/// 事件接收者
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BatchEvent);
}

impl dyn EventSink + '_ {
    pub fn debug(&self, stage: Stage, item_key: Option<&str>, message: impl Into<String>) {
        self.emit(BatchEvent::new(EventLevel::Debug, stage, item_key, message));
    }

    pub fn info(&self, stage: Stage, item_key: Option<&str>, message: impl Into<String>) {
        self.emit(BatchEvent::new(EventLevel::Info, stage, item_key, message));
    }

    pub fn warn(&self, stage: Stage, item_key: Option<&str>, message: impl Into<String>) {
        self.emit(BatchEvent::new(EventLevel::Warn, stage, item_key, message));
    }

    pub fn error(&self, stage: Stage, item_key: Option<&str>, message: impl Into<String>) {
        self.emit(BatchEvent::new(EventLevel::Error, stage, item_key, message));
    }
}

/// 转发到 tracing，阶段和条目作为结构化字段
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: BatchEvent) {
        let item = event.item_key.as_deref().unwrap_or("-");
        match event.level {
            EventLevel::Debug => debug!(stage = %event.stage, item, "{}", event.message),
            EventLevel::Info => info!(stage = %event.stage, item, "{}", event.message),
            EventLevel::Warn => warn!(stage = %event.stage, item, "{}", event.message),
            EventLevel::Error => error!(stage = %event.stage, item, "{}", event.message),
        }
    }
}

/// 记录全部事件，用于测试和事后检查
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<BatchEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BatchEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: BatchEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
