pub mod document_flow;
pub mod item_ctx;

pub use document_flow::DocumentFlow;
pub use item_ctx::ItemCtx;
