//! nacos-sd：把 Nacos 服务实例写成 Prometheus `file_sd` 文件

use anyhow::Context;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use nacos_sd::discovery::registry::{self, NACOS_BACKEND, PluginOptions};
use nacos_sd::discovery::{Discoverer, DiscovererMetrics};
use nacos_sd::file_sd::write_batches;
use nacos_sd::telemetry::init_tracing;
use nacos_sd::AppConfig;

const DEFAULT_CONFIG_PATH: &str = "nacos-sd.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load_from_file(&config_path)?;
    init_tracing(&config.log)?;

    let plugins = registry::global();
    registry::register_builtin_plugins(plugins)?;
    let plugin = plugins.get(NACOS_BACKEND)?;

    let metrics_registry = prometheus::Registry::new();
    let metrics = plugin.new_metrics(&metrics_registry)?;
    metrics.register()?;

    let logger = tracing::dispatcher::get_default(|dispatch| dispatch.clone());
    let discoverer = plugin
        .new_discoverer(
            serde_json::to_value(&config.nacos)?,
            PluginOptions {
                metrics: metrics.clone(),
                logger: Some(logger),
            },
        )
        .await
        .context("failed to create nacos discoverer")?;

    let (tx, mut rx) = mpsc::channel(config.output.channel_capacity.max(1));
    let cancel = CancellationToken::new();
    let run_handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { discoverer.run(cancel, tx).await }
    });

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "❌ Failed to listen for Ctrl+C");
        }
    };
    if write_batches(&config.output.file, &mut rx, shutdown).await {
        cancel.cancel();
    }

    drop(rx);
    run_handle.await?;
    metrics.unregister();
    info!("👋 nacos-sd exited");
    Ok(())
}
