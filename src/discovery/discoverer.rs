//! Nacos 发现器
//!
//! 定时轮询命名服务，把每个服务的实例转换为抓取目标组，按周期整体发布

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, debug, info, warn};

use crate::discovery::backend::NamingClient;
use crate::discovery::config::NacosSdConfig;
use crate::discovery::metrics::NacosMetrics;
use crate::discovery::target::TargetGroup;
use crate::error::Result;

/// 目标组批次的发送端
pub type TargetGroupSender = mpsc::Sender<Vec<TargetGroup>>;

/// 发现器
///
/// 与后端无关的运行接口，由插件注册表统一创建
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// 运行发现循环，直到 `cancel` 被触发
    ///
    /// 每个刷新周期成功后向 `up` 发送一个完整批次；发送是阻塞的，
    /// 消费者处理不过来时会直接拖慢刷新节奏（没有内部缓冲）
    async fn run(&self, cancel: CancellationToken, up: TargetGroupSender);
}

/// Nacos 发现器
pub struct NacosDiscoverer {
    config: NacosSdConfig,
    client: Arc<dyn NamingClient>,
    metrics: Arc<NacosMetrics>,
    logger: Dispatch,
}

impl fmt::Debug for NacosDiscoverer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NacosDiscoverer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NacosDiscoverer {
    pub(crate) fn new(
        config: NacosSdConfig,
        client: Arc<dyn NamingClient>,
        metrics: Arc<NacosMetrics>,
        logger: Dispatch,
    ) -> Self {
        Self {
            config,
            client,
            metrics,
            logger,
        }
    }

    pub fn config(&self) -> &NacosSdConfig {
        &self.config
    }

    /// 按配置顺序查询全部服务
    ///
    /// 任一服务失败立即返回该错误，不继续查询剩余服务，也不返回已收集的部分结果
    pub async fn lookup_services(&self) -> Result<Vec<TargetGroup>> {
        if self.config.debug {
            info!(services = ?self.config.services, "start lookup services");
        }

        let mut groups = Vec::with_capacity(self.config.services.len());
        for service in &self.config.services {
            groups.push(self.lookup_service(service).await?);
        }
        Ok(groups)
    }

    /// 查询单个服务并转换为目标组
    ///
    /// 客户端错误原样返回，不做重试
    pub async fn lookup_service(&self, service_name: &str) -> Result<TargetGroup> {
        let instances = match self.client.get_service(service_name).await {
            Ok(instances) => instances,
            Err(e) => {
                if self.config.debug {
                    info!(service = %service_name, error = %e, "lookup service failed");
                }
                return Err(e);
            }
        };
        self.metrics.record_lookup();

        debug!(
            service = %service_name,
            instances = instances.len(),
            "service looked up"
        );
        Ok(TargetGroup::from_instances(service_name, &instances))
    }

    async fn refresh_loop(&self, cancel: CancellationToken, up: TargetGroupSender) {
        if cancel.is_cancelled() {
            return;
        }
        info!(
            services = self.config.services.len(),
            refresh_interval = self.config.refresh_interval,
            "🚀 Nacos discoverer started"
        );

        // 整个生命周期只用一个定时器，避免相位漂移；
        // 周期超时后顺延下一次触发，不会连续补发
        let period = self.config.refresh_period();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("🛑 Nacos discoverer stopped");
                    return;
                }
                _ = ticker.tick() => {}
            }

            let groups = match self.lookup_services().await {
                Ok(groups) => groups,
                Err(e) => {
                    // 失败的周期不发布任何结果
                    warn!(error = %e, "⚠️ Nacos refresh failed, skipping this cycle");
                    continue;
                }
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("🛑 Nacos discoverer stopped");
                    return;
                }
                sent = up.send(groups) => {
                    if sent.is_err() {
                        warn!("⚠️ Target group receiver dropped, stopping Nacos discoverer");
                        return;
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Discoverer for NacosDiscoverer {
    async fn run(&self, cancel: CancellationToken, up: TargetGroupSender) {
        self.refresh_loop(cancel, up)
            .with_subscriber(self.logger.clone())
            .await
    }
}
