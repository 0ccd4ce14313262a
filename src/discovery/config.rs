//! Nacos 服务发现配置

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// 默认刷新间隔（秒）
pub const DEFAULT_REFRESH_INTERVAL: u64 = 15;

/// 最大刷新间隔（秒），一天
pub const MAX_REFRESH_INTERVAL: u64 = 24 * 60 * 60;

/// Nacos 服务发现配置
///
/// 构造后不可变；地址解析在 [`DiscovererFactory`](crate::discovery::DiscovererFactory) 中完成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NacosSdConfig {
    /// Nacos 服务地址，格式 `host:port`
    #[serde(default)]
    pub server: String,

    /// 命名空间（可选，为空时使用 Nacos 默认命名空间）
    #[serde(default, alias = "nameSpace", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// 需要发现的服务名（有序，可以为空）
    #[serde(default)]
    pub services: Vec<String>,

    /// 刷新间隔（秒）
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// 是否输出调试日志
    #[serde(default)]
    pub debug: bool,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL
}

impl Default for NacosSdConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            namespace: None,
            services: Vec::new(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            debug: false,
        }
    }
}

impl NacosSdConfig {
    /// 创建配置
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Default::default()
        }
    }

    /// 设置命名空间
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// 设置服务列表
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services = services.into_iter().map(Into::into).collect();
        self
    }

    /// 设置刷新间隔（秒）
    pub fn with_refresh_interval(mut self, secs: u64) -> Self {
        self.refresh_interval = secs;
        self
    }

    /// 开启调试日志
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 刷新间隔
    pub fn refresh_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval)
    }

    /// 有效命名空间（空字符串视为未设置）
    pub fn effective_namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval == 0 {
            return Err(DiscoveryError::config("refresh_interval must be greater than 0"));
        }
        if self.refresh_interval > MAX_REFRESH_INTERVAL {
            return Err(DiscoveryError::config(format!(
                "refresh_interval must not exceed {} seconds",
                MAX_REFRESH_INTERVAL
            )));
        }
        Ok(())
    }
}
