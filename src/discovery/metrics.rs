//! 服务发现指标

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use prometheus::{IntCounter, Registry};

use crate::error::Result;

/// 查询次数指标名
pub const GET_COUNT_METRIC: &str = "nacos_get_count";

/// 发现后端指标
///
/// 每个发现器实例持有一份，`register` 与 `unregister` 需成对调用
pub trait DiscovererMetrics: Send + Sync {
    /// 注册指标；重复注册时返回注册表的错误
    fn register(&self) -> Result<()>;

    /// 注销指标；未注册时调用也是安全的
    fn unregister(&self);

    /// 用于插件层还原具体类型
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Nacos 发现指标
pub struct NacosMetrics {
    get_count: IntCounter,
    registry: Registry,
    registered: AtomicBool,
}

impl NacosMetrics {
    /// 创建指标（不会自动注册）
    pub fn new(registry: &Registry) -> Result<Self> {
        let get_count = IntCounter::new(GET_COUNT_METRIC, "The number of nacos RPC call get count.")?;
        Ok(Self {
            get_count,
            registry: registry.clone(),
            registered: AtomicBool::new(false),
        })
    }

    /// 记录一次成功的命名服务查询
    pub fn record_lookup(&self) {
        self.get_count.inc();
    }

    /// 当前查询次数
    pub fn lookup_count(&self) -> u64 {
        self.get_count.get()
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }
}

impl DiscovererMetrics for NacosMetrics {
    fn register(&self) -> Result<()> {
        // 重复注册由注册表报告 AlreadyReg，这里不做拦截
        self.registry.register(Box::new(self.get_count.clone()))?;
        self.registered.store(true, Ordering::Release);
        Ok(())
    }

    fn unregister(&self) {
        if let Err(e) = self.registry.unregister(Box::new(self.get_count.clone())) {
            tracing::debug!(error = %e, "nacos metrics were not registered");
        }
        self.registered.store(false, Ordering::Release);
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
