//! 命名服务客户端抽象和实现

pub mod nacos;

use std::sync::Arc;

use async_trait::async_trait;

use crate::discovery::factory::ServerAddr;
use crate::discovery::instance::NamingInstance;
use crate::error::Result;

/// 命名服务客户端
///
/// 连接管理、重试和协议细节由实现方负责；发现流程只依赖按服务名查询实例这一个能力
/// 注意：由于需要动态分发（dyn），使用 async-trait
#[async_trait]
pub trait NamingClient: Send + Sync {
    /// 查询服务当前的全部实例
    ///
    /// # 参数
    /// * `service_name` - 服务名
    ///
    /// # 返回
    /// 返回实例列表，服务没有实例时返回空列表
    async fn get_service(&self, service_name: &str) -> Result<Vec<NamingInstance>>;
}

/// 命名服务连接器
///
/// 由 [`DiscovererFactory`](crate::discovery::DiscovererFactory) 在构造时调用一次
#[async_trait]
pub trait NamingConnector: Send + Sync {
    /// 建立命名服务连接
    async fn connect(
        &self,
        server: &ServerAddr,
        namespace: Option<&str>,
    ) -> Result<Arc<dyn NamingClient>>;
}

pub use nacos::{HttpNamingClient, HttpNamingConnector};
