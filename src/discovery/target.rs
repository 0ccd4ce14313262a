//! 抓取目标定义

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::discovery::instance::NamingInstance;

/// 地址标签
pub const ADDRESS_LABEL: &str = "__address__";

/// 实例 ID 标签
pub const INSTANCE_ID_LABEL: &str = "instanceId";

/// 单个实例的标签集合
///
/// 使用 `BTreeMap` 保证序列化和比较的顺序稳定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加标签
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// `__address__` 标签
    pub fn address(&self) -> Option<&str> {
        self.get(ADDRESS_LABEL)
    }

    /// `instanceId` 标签
    pub fn instance_id(&self) -> Option<&str> {
        self.get(INSTANCE_ID_LABEL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&NamingInstance> for LabelSet {
    fn from(instance: &NamingInstance) -> Self {
        LabelSet::new()
            .with_label(ADDRESS_LABEL, instance.address())
            .with_label(INSTANCE_ID_LABEL, instance.instance_id.clone())
    }
}

/// 一个服务在某一时刻的全部存活实例
///
/// 每次查询成功后新建，发送到输出通道后所有权转交给消费者
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroup {
    /// 来源标识（服务名）
    pub source: String,

    /// 每个实例一个标签集合，保持命名服务返回的顺序
    pub targets: Vec<LabelSet>,
}

impl TargetGroup {
    /// 从命名服务实例列表构建目标组
    pub fn from_instances(source: impl Into<String>, instances: &[NamingInstance]) -> Self {
        Self {
            source: source.into(),
            targets: instances.iter().map(LabelSet::from).collect(),
        }
    }
}
