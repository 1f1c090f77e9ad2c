//! Bean 容器抽象接口
//!
//! 提供按名称解析实例的容器门面，以及容器配置与统计信息

use crate::factory::Instance;
use crate::resolver::Overrides;
use infrastructure_common::DependencyResult;
use serde::{Deserialize, Serialize};

/// Bean 容器 trait
pub trait BeanContainer: Send + Sync {
    /// 使用覆盖值解析实例
    fn resolve_with(&self, name: &str, overrides: &Overrides) -> DependencyResult<Instance>;

    /// 解析实例
    fn resolve(&self, name: &str) -> DependencyResult<Instance> {
        self.resolve_with(name, &Overrides::new())
    }

    /// 检查是否存在定义，从不失败
    fn has(&self, name: &str) -> bool;

    /// 所有已注册的 Bean 名称
    fn definition_names(&self) -> Vec<String>;

    /// 获取统计信息
    fn stats(&self) -> ContainerStats;
}

/// 重名定义处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// 后注册的定义覆盖先注册的定义（记录警告）
    #[default]
    LastWins,
    /// 重名视为配置错误
    Reject,
}

/// 单例构造保护策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionGuard {
    /// 竞争时允许重复构造，只保留第一个提交的实例
    #[default]
    Optimistic,
    /// 按名称串行化构造，保证每个单例只构造一次
    PerName,
}

/// 容器配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 重名定义处理策略
    pub duplicate_policy: DuplicatePolicy,
    /// 单例构造保护策略
    pub construction_guard: ConstructionGuard,
}

impl ContainerConfig {
    /// 严格配置：拒绝重名定义并保证单例只构造一次
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            construction_guard: ConstructionGuard::PerName,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册定义数量
    pub registered_definitions: usize,
    /// 已缓存单例数量
    pub cached_singletons: usize,
    /// 解析次数
    pub resolutions: u64,
    /// 构造次数
    pub constructions: u64,
    /// 单例缓存命中次数
    pub cache_hits: u64,
    /// 竞争失败被丢弃的实例数量
    pub discarded_candidates: u64,
}
