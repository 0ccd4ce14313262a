//! Nacos HTTP 命名服务客户端
//!
//! 基于 Nacos Open API：`GET {context}/v1/ns/instance/list`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

use crate::discovery::backend::{NamingClient, NamingConnector};
use crate::discovery::factory::ServerAddr;
use crate::discovery::instance::NamingInstance;
use crate::error::{DiscoveryError, Result};

/// 固定协议
pub const DEFAULT_SCHEME: &str = "http";

/// 固定上下文路径
pub const DEFAULT_CONTEXT_PATH: &str = "/nacos";

/// 请求超时（毫秒）
const REQUEST_TIMEOUT_MS: u64 = 10 * 1000;

/// 实例列表响应
#[derive(Debug, Deserialize)]
struct InstanceListResponse {
    #[serde(default)]
    hosts: Vec<NamingInstance>,
}

/// Nacos HTTP 命名服务客户端
#[derive(Clone)]
pub struct HttpNamingClient {
    http_client: HttpClient,
    base_url: String,
    namespace: Option<String>,
}

impl HttpNamingClient {
    /// 连接 Nacos 服务
    ///
    /// 构建 HTTP 客户端并检查 `/v1/ns/operator/metrics`，检查失败视为连接失败
    pub async fn connect(server: &ServerAddr, namespace: Option<&str>) -> Result<Self> {
        let base_url = format!(
            "{}://{}:{}{}",
            DEFAULT_SCHEME, server.host, server.port, DEFAULT_CONTEXT_PATH
        );

        let http_client = HttpClient::builder()
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .build()
            .map_err(|e| DiscoveryError::connection(server.to_string(), e))?;

        let health_url = format!("{}/v1/ns/operator/metrics", base_url);
        http_client
            .get(&health_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| DiscoveryError::connection(server.to_string(), e))?;

        debug!(base_url = %base_url, "Nacos naming server reachable");

        Ok(Self {
            http_client,
            base_url,
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NamingClient for HttpNamingClient {
    async fn get_service(&self, service_name: &str) -> Result<Vec<NamingInstance>> {
        let url = format!("{}/v1/ns/instance/list", self.base_url);
        let mut query_params = vec![("serviceName", service_name), ("healthyOnly", "false")];
        if let Some(ns) = &self.namespace {
            query_params.push(("namespaceId", ns.as_str()));
        }

        let resp = self
            .http_client
            .get(&url)
            .query(&query_params)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| DiscoveryError::lookup(service_name, e))?;

        let body: InstanceListResponse = resp
            .json()
            .await
            .map_err(|e| DiscoveryError::lookup(service_name, e))?;

        Ok(body.hosts)
    }
}

/// 默认连接器：通过 HTTP 连接 Nacos
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpNamingConnector;

#[async_trait]
impl NamingConnector for HttpNamingConnector {
    async fn connect(
        &self,
        server: &ServerAddr,
        namespace: Option<&str>,
    ) -> Result<Arc<dyn NamingClient>> {
        let client = HttpNamingClient::connect(server, namespace).await?;
        Ok(Arc::new(client))
    }
}
