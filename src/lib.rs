//! Nacos Service Discovery
//!
//! Polls a Nacos naming registry for the live instances of a configured set of services
//! and publishes them as Prometheus-style scrape target groups on a fixed cadence.

pub mod config;
pub mod discovery;
pub mod error;
pub mod file_sd;
pub mod telemetry;

// Re-exports
pub use config::{AppConfig, LogConfig, OutputConfig};
pub use discovery::{
    Discoverer, DiscovererFactory, DiscovererMetrics, DiscovererOptions, DiscovererRegistry,
    DiscoveryPlugin, LabelSet, NacosDiscoverer, NacosMetrics, NacosPlugin, NacosSdConfig,
    NamingClient, NamingConnector, NamingInstance, PluginOptions, ServerAddr, TargetGroup,
};
pub use error::{DiscoveryError, InfraResult, Result};
