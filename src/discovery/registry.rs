//! 发现插件注册表
//!
//! 后端名称到构造器的映射，只通过显式调用填充，启动顺序可控

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use async_trait::async_trait;
use prometheus::Registry;
use tracing::Dispatch;

use crate::discovery::backend::{HttpNamingConnector, NamingConnector};
use crate::discovery::config::NacosSdConfig;
use crate::discovery::discoverer::Discoverer;
use crate::discovery::factory::{DiscovererFactory, DiscovererOptions};
use crate::discovery::metrics::{DiscovererMetrics, NacosMetrics};
use crate::error::{DiscoveryError, Result};

/// Nacos 后端名称
pub const NACOS_BACKEND: &str = "nacos";

/// 插件构造发现器时的参数
#[derive(Clone)]
pub struct PluginOptions {
    /// 由同一插件的 `new_metrics` 创建的指标
    pub metrics: Arc<dyn DiscovererMetrics>,

    /// 日志输出；为 `None` 时不输出日志
    pub logger: Option<Dispatch>,
}

/// 发现插件
#[async_trait]
pub trait DiscoveryPlugin: Send + Sync {
    /// 后端名称（注册表的键）
    fn name(&self) -> &'static str;

    /// 创建该后端的指标
    fn new_metrics(&self, registry: &Registry) -> Result<Arc<dyn DiscovererMetrics>>;

    /// 从原始配置创建发现器
    async fn new_discoverer(
        &self,
        config: serde_json::Value,
        options: PluginOptions,
    ) -> Result<Box<dyn Discoverer>>;
}

/// Nacos 发现插件
#[derive(Clone)]
pub struct NacosPlugin {
    factory: DiscovererFactory,
}

impl Default for NacosPlugin {
    fn default() -> Self {
        Self::with_connector(Arc::new(HttpNamingConnector))
    }
}

impl NacosPlugin {
    pub fn with_connector(connector: Arc<dyn NamingConnector>) -> Self {
        Self {
            factory: DiscovererFactory::new(connector),
        }
    }
}

#[async_trait]
impl DiscoveryPlugin for NacosPlugin {
    fn name(&self) -> &'static str {
        NACOS_BACKEND
    }

    fn new_metrics(&self, registry: &Registry) -> Result<Arc<dyn DiscovererMetrics>> {
        Ok(Arc::new(NacosMetrics::new(registry)?))
    }

    async fn new_discoverer(
        &self,
        config: serde_json::Value,
        options: PluginOptions,
    ) -> Result<Box<dyn Discoverer>> {
        let config: NacosSdConfig = serde_json::from_value(config)?;
        let metrics = options
            .metrics
            .as_any()
            .downcast::<NacosMetrics>()
            .map_err(|_| DiscoveryError::config("nacos metrics not found"))?;

        let mut discoverer_options = DiscovererOptions::new(metrics);
        discoverer_options.logger = options.logger;

        let discoverer = self.factory.new_discoverer(config, discoverer_options).await?;
        Ok(Box::new(discoverer))
    }
}

/// 发现插件注册表
#[derive(Default)]
pub struct DiscovererRegistry {
    plugins: RwLock<HashMap<String, Arc<dyn DiscoveryPlugin>>>,
}

impl DiscovererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册插件；同名插件只能注册一次
    pub fn register(&self, plugin: Arc<dyn DiscoveryPlugin>) -> Result<()> {
        let mut plugins = self.plugins.write().unwrap_or_else(PoisonError::into_inner);
        let name = plugin.name();
        if plugins.contains_key(name) {
            return Err(DiscoveryError::DuplicateBackend(name.to_string()));
        }
        plugins.insert(name.to_string(), plugin);
        tracing::debug!(backend = %name, "discovery backend registered");
        Ok(())
    }

    /// 按名称获取插件
    pub fn get(&self, name: &str) -> Result<Arc<dyn DiscoveryPlugin>> {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| DiscoveryError::UnknownBackend(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// 已注册的后端名称（按字母排序）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

static GLOBAL_REGISTRY: LazyLock<DiscovererRegistry> = LazyLock::new(DiscovererRegistry::new);

/// 进程级注册表（初始为空）
pub fn global() -> &'static DiscovererRegistry {
    &GLOBAL_REGISTRY
}

/// 注册内置插件
pub fn register_builtin_plugins(registry: &DiscovererRegistry) -> Result<()> {
    registry.register(Arc::new(NacosPlugin::default()))
}
