//! 服务发现统一错误类型

use thiserror::Error;

/// 底层来源错误（HTTP 客户端、外部命名服务等）
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 服务发现错误
///
/// - `Config` / `Connection`：构造阶段错误，直接返回给调用方，不做重试
/// - `Lookup`：单个服务查询失败，只作废当前刷新周期
/// - `Metrics`：指标注册失败（如重复注册）
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// 配置错误（服务地址格式错误、刷新间隔非法等）
    #[error("invalid discovery config: {0}")]
    Config(String),

    /// 命名服务客户端连接失败
    #[error("failed to connect naming server {server}: {source}")]
    Connection {
        server: String,
        #[source]
        source: BoxError,
    },

    /// 服务查询失败
    #[error("failed to look up service `{service}`: {source}")]
    Lookup {
        service: String,
        #[source]
        source: BoxError,
    },

    /// 指标创建或注册失败
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// 插件配置解析失败
    #[error("failed to decode discovery config: {0}")]
    Decode(#[from] serde_json::Error),

    /// 未注册的发现后端
    #[error("unknown discovery backend: {0}")]
    UnknownBackend(String),

    /// 发现后端重复注册
    #[error("discovery backend already registered: {0}")]
    DuplicateBackend(String),
}

impl DiscoveryError {
    /// 创建配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        DiscoveryError::Config(msg.into())
    }

    /// 创建连接错误
    pub fn connection(server: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DiscoveryError::Connection {
            server: server.into(),
            source: source.into(),
        }
    }

    /// 创建查询错误
    pub fn lookup(service: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DiscoveryError::Lookup {
            service: service.into(),
            source: source.into(),
        }
    }
}

/// 服务发现结果类型
pub type Result<T> = std::result::Result<T, DiscoveryError>;
