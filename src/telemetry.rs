//! 日志初始化

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::InfraResult;

/// 初始化全局日志
///
/// `RUST_LOG` 优先于配置中的级别
pub fn init_tracing(log: &LogConfig) -> InfraResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let result = if log.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to init tracing: {}", e))
}
