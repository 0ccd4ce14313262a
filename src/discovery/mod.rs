//! Nacos 服务发现模块
//!
//! 定时从 Nacos 拉取服务实例，转换为 Prometheus 风格的抓取目标组并按批次发布。

pub mod backend;
pub mod config;
pub mod discoverer;
pub mod factory;
pub mod instance;
pub mod metrics;
pub mod registry;
pub mod target;

pub use backend::{HttpNamingClient, HttpNamingConnector, NamingClient, NamingConnector};
pub use config::{DEFAULT_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL, NacosSdConfig};
pub use discoverer::{Discoverer, NacosDiscoverer, TargetGroupSender};
pub use factory::{DiscovererFactory, DiscovererOptions, ServerAddr, new_discoverer};
pub use instance::NamingInstance;
pub use metrics::{DiscovererMetrics, GET_COUNT_METRIC, NacosMetrics};
pub use registry::{
    DiscovererRegistry, DiscoveryPlugin, NACOS_BACKEND, NacosPlugin, PluginOptions,
    register_builtin_plugins,
};
pub use target::{ADDRESS_LABEL, INSTANCE_ID_LABEL, LabelSet, TargetGroup};
