//! 发现器工厂
//!
//! 唯一负责解析服务地址、建立命名服务连接的地方

use std::fmt;
use std::sync::Arc;

use tracing::{Dispatch, info};

use crate::discovery::backend::{HttpNamingConnector, NamingConnector};
use crate::discovery::config::NacosSdConfig;
use crate::discovery::discoverer::NacosDiscoverer;
use crate::discovery::metrics::NacosMetrics;
use crate::error::{DiscoveryError, Result};

/// 解析后的命名服务地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddr {
    pub host: String,
    pub port: u16,
}

impl ServerAddr {
    /// 解析 `host:port`
    ///
    /// 缺少端口、端口为空或非数字、主机为空时返回配置错误
    pub fn parse(server: &str) -> Result<Self> {
        let (host, port) = server.split_once(':').ok_or_else(|| {
            DiscoveryError::config(format!("server address `{}` is missing a port", server))
        })?;

        if host.is_empty() {
            return Err(DiscoveryError::config(format!(
                "server address `{}` is missing a host",
                server
            )));
        }

        let port = port.parse::<u16>().map_err(|e| {
            DiscoveryError::config(format!("server address `{}` has invalid port: {}", server, e))
        })?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// 构造发现器所需的外部依赖
#[derive(Clone)]
pub struct DiscovererOptions {
    /// 指标（由调用方负责注册）
    pub metrics: Arc<NacosMetrics>,

    /// 日志输出；为 `None` 时发现器不输出任何日志
    pub logger: Option<Dispatch>,
}

impl DiscovererOptions {
    pub fn new(metrics: Arc<NacosMetrics>) -> Self {
        Self {
            metrics,
            logger: None,
        }
    }

    /// 设置日志输出
    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }
}

/// 发现器工厂
#[derive(Clone)]
pub struct DiscovererFactory {
    connector: Arc<dyn NamingConnector>,
}

impl Default for DiscovererFactory {
    fn default() -> Self {
        Self::new(Arc::new(HttpNamingConnector))
    }
}

impl DiscovererFactory {
    /// 使用指定连接器创建工厂
    pub fn new(connector: Arc<dyn NamingConnector>) -> Self {
        Self { connector }
    }

    /// 从配置创建发现器
    ///
    /// 地址或刷新间隔非法时返回配置错误；连接失败时原样返回连接器的错误，不会创建发现器
    pub async fn new_discoverer(
        &self,
        config: NacosSdConfig,
        options: DiscovererOptions,
    ) -> Result<NacosDiscoverer> {
        config.validate()?;
        let server = ServerAddr::parse(&config.server)?;

        let client = self
            .connector
            .connect(&server, config.effective_namespace())
            .await?;

        let logger = options.logger.unwrap_or_else(Dispatch::none);
        tracing::dispatcher::with_default(&logger, || {
            info!(
                server = %server,
                services = config.services.len(),
                refresh_interval = config.refresh_interval,
                "✅ Nacos discoverer created"
            );
        });

        Ok(NacosDiscoverer::new(config, client, options.metrics, logger))
    }
}

/// 使用默认 HTTP 连接器创建发现器
pub async fn new_discoverer(
    config: NacosSdConfig,
    options: DiscovererOptions,
) -> Result<NacosDiscoverer> {
    DiscovererFactory::default()
        .new_discoverer(config, options)
        .await
}
