//! 命名服务实例定义

use serde::{Deserialize, Serialize};

/// 命名服务返回的实例
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingInstance {
    /// 实例 IP
    pub ip: String,

    /// 实例端口
    pub port: u16,

    /// 实例 ID
    #[serde(rename = "instanceId", default)]
    pub instance_id: String,
}

impl NamingInstance {
    /// 创建新的实例
    pub fn new(ip: impl Into<String>, port: u16, instance_id: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port,
            instance_id: instance_id.into(),
        }
    }

    /// `ip:port` 形式的地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
