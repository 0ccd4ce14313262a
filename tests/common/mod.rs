//! 测试公共工具：可编程的命名服务客户端和连接器

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nacos_sd::discovery::{
    DiscovererFactory, DiscovererOptions, NacosDiscoverer, NacosMetrics, NacosSdConfig,
    NamingClient, NamingConnector, NamingInstance, ServerAddr,
};
use nacos_sd::error::{DiscoveryError, Result};
use prometheus::Registry;
use tokio::time::{Duration, Instant};
use tracing::Dispatch;

type MockResponse = std::result::Result<Vec<NamingInstance>, String>;

/// 按服务名返回预设结果的命名服务客户端
///
/// 未预设的服务返回空实例列表
#[derive(Default)]
pub struct MockNamingClient {
    responses: Mutex<HashMap<String, MockResponse>>,
    calls: Mutex<Vec<(String, Instant)>>,
    delay: Mutex<Option<Duration>>,
}

impl MockNamingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_instances(&self, service: &str, instances: Vec<NamingInstance>) {
        self.responses
            .lock()
            .unwrap()
            .insert(service.to_string(), Ok(instances));
    }

    pub fn set_failure(&self, service: &str, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(service.to_string(), Err(reason.to_string()));
    }

    /// 每次查询前等待的时长
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// 按调用顺序返回被查询的服务名
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// 每次查询开始的时间
    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl NamingClient for MockNamingClient {
    async fn get_service(&self, service_name: &str) -> Result<Vec<NamingInstance>> {
        self.calls
            .lock()
            .unwrap()
            .push((service_name.to_string(), Instant::now()));

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().unwrap().get(service_name).cloned();
        match response {
            Some(Ok(instances)) => Ok(instances),
            Some(Err(reason)) => Err(DiscoveryError::lookup(service_name, reason)),
            None => Ok(Vec::new()),
        }
    }
}

/// 记录连接参数的连接器
pub struct MockConnector {
    client: Arc<MockNamingClient>,
    fail: bool,
    connects: Mutex<Vec<(ServerAddr, Option<String>)>>,
}

impl MockConnector {
    pub fn new(client: Arc<MockNamingClient>) -> Arc<Self> {
        Arc::new(Self {
            client,
            fail: false,
            connects: Mutex::new(Vec::new()),
        })
    }

    /// 每次连接都失败
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            client: MockNamingClient::new(),
            fail: true,
            connects: Mutex::new(Vec::new()),
        })
    }

    pub fn connects(&self) -> Vec<(ServerAddr, Option<String>)> {
        self.connects.lock().unwrap().clone()
    }
}

#[async_trait]
impl NamingConnector for MockConnector {
    async fn connect(
        &self,
        server: &ServerAddr,
        namespace: Option<&str>,
    ) -> Result<Arc<dyn NamingClient>> {
        self.connects
            .lock()
            .unwrap()
            .push((server.clone(), namespace.map(str::to_string)));

        if self.fail {
            return Err(DiscoveryError::connection(
                server.to_string(),
                "connection refused",
            ));
        }
        let client: Arc<dyn NamingClient> = self.client.clone();
        Ok(client)
    }
}

/// 测试配置：`host:8848`，刷新间隔 1 秒
pub fn test_config(services: &[&str]) -> NacosSdConfig {
    NacosSdConfig::new("host:8848")
        .with_services(services.iter().copied())
        .with_refresh_interval(1)
}

/// 通过工厂创建绑定到 mock 客户端的发现器
pub async fn build_discoverer(
    client: Arc<MockNamingClient>,
    config: NacosSdConfig,
) -> (NacosDiscoverer, Arc<NacosMetrics>) {
    let metrics = Arc::new(NacosMetrics::new(&Registry::new()).expect("create metrics"));
    let factory = DiscovererFactory::new(MockConnector::new(client));
    let discoverer = factory
        .new_discoverer(config, DiscovererOptions::new(metrics.clone()))
        .await
        .expect("create discoverer");
    (discoverer, metrics)
}

/// 通过工厂创建发现器，使用指定的日志分发器
pub async fn build_discoverer_with_logger(
    client: Arc<MockNamingClient>,
    config: NacosSdConfig,
    logger: Dispatch,
) -> NacosDiscoverer {
    let metrics = Arc::new(NacosMetrics::new(&Registry::new()).expect("create metrics"));
    DiscovererFactory::new(MockConnector::new(client))
        .new_discoverer(config, DiscovererOptions::new(metrics).with_logger(logger))
        .await
        .expect("create discoverer")
}

/// 收集日志输出的内存缓冲区
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// 写入该缓冲区的 fmt 分发器
    pub fn dispatch(&self) -> Dispatch {
        let logs = self.clone();
        Dispatch::new(
            tracing_subscriber::fmt()
                .with_writer(move || logs.clone())
                .with_ansi(false)
                .finish(),
        )
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// 断言 `actual` 落在 `expected` 附近（允许毫秒级定时器精度误差）
pub fn assert_near(actual: Duration, expected: Duration) {
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(
        diff <= Duration::from_millis(5),
        "expected ~{:?}, got {:?}",
        expected,
        actual
    );
}
