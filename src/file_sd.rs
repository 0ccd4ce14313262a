//! Prometheus `file_sd` 输出
//!
//! 每个标签集合输出一条记录：`targets` 为实例地址，其余标签放入 `labels`

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::discovery::{ADDRESS_LABEL, TargetGroup};
use crate::error::InfraResult;

/// 服务名标签
pub const SERVICE_LABEL: &str = "__meta_nacos_service";

/// `file_sd` 文件中的一条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSdEntry {
    pub targets: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

/// 将一个批次转换为 `file_sd` 记录，缺少地址的标签集合会被跳过
pub fn to_file_sd(groups: &[TargetGroup]) -> Vec<FileSdEntry> {
    groups
        .iter()
        .flat_map(|group| {
            group.targets.iter().filter_map(move |target| {
                let address = target.address()?;
                let mut labels: BTreeMap<String, String> = target
                    .iter()
                    .filter(|(name, _)| *name != ADDRESS_LABEL)
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                labels.insert(SERVICE_LABEL.to_string(), group.source.clone());
                Some(FileSdEntry {
                    targets: vec![address.to_string()],
                    labels,
                })
            })
        })
        .collect()
}

/// 原子写入 `file_sd` 文件（先写临时文件再重命名）
pub async fn write_file_sd(path: &Path, groups: &[TargetGroup]) -> InfraResult<()> {
    let entries = to_file_sd(groups);
    let content = serde_json::to_vec_pretty(&entries)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp, &content)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to rename {} to {}", tmp.display(), path.display()))?;

    tracing::debug!(path = %path.display(), targets = entries.len(), "file_sd written");
    Ok(())
}

/// 把收到的批次依次写入 `path`，直到 `shutdown` 完成或所有发送端关闭
///
/// `shutdown` 只创建一次，写文件期间到达的关闭信号不会丢失。
/// 返回 `true` 表示因关闭信号退出。写入失败只记录日志，不中断循环。
pub async fn write_batches<F>(
    path: &Path,
    rx: &mut mpsc::Receiver<Vec<TargetGroup>>,
    shutdown: F,
) -> bool
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown signal received");
                return true;
            }
            batch = rx.recv() => {
                let Some(groups) = batch else { return false };
                match write_file_sd(path, &groups).await {
                    Ok(()) => info!(
                        groups = groups.len(),
                        path = %path.display(),
                        "✅ Targets updated"
                    ),
                    Err(e) => error!(error = %e, "❌ Failed to write file_sd output"),
                }
            }
        }
    }
}
