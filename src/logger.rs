//! 日志初始化
//!
//! `RUST_LOG` 优先；否则默认 info，`verbose` 时为 debug

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "ref_batch=debug"
        } else {
            "ref_batch=info"
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
