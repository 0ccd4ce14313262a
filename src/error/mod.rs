//! 错误处理模块
//!
//! 发现链路使用 `DiscoveryError`，外围基础设施（配置加载、文件输出）使用 `anyhow`

pub mod discovery_error;

pub use discovery_error::{BoxError, DiscoveryError, Result};

/// 基础设施层默认使用的结果类型
pub type InfraResult<T> = anyhow::Result<T>;
