//! 应用上下文
//!
//! 组合定义注册表、合并逻辑与单例缓存，按作用域把 Bean 名称解析为实例。

use crate::cache::{Commit, InstanceCache};
use crate::merge::merge;
use crate::registry::DefinitionRegistryImpl;
use di_abstractions::{
    BeanContainer, BeanDefinition, ConstructionGuard, ContainerConfig, ContainerStats,
    DefinitionRegistry, Instance, InstanceFactory, Overrides,
};
use infrastructure_common::{DependencyError, DependencyResult};
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 解析计数
#[derive(Debug, Default)]
struct Counters {
    resolutions: AtomicU64,
    constructions: AtomicU64,
    cache_hits: AtomicU64,
    discarded_candidates: AtomicU64,
}

/// 应用上下文
///
/// 单例以 Bean 名称缓存：第一次成功解析的实例永久生效，之后的覆盖值不再影响结果。
/// 原型每次解析都调用构造机制。
pub struct ApplicationContext {
    /// 上下文标识，用于日志
    id: Uuid,
    /// 定义注册表
    registry: Arc<DefinitionRegistryImpl>,
    /// 单例缓存
    instances: InstanceCache,
    /// 构造机制
    factory: Arc<dyn InstanceFactory>,
    /// 容器配置
    config: ContainerConfig,
    counters: Counters,
}

impl ApplicationContext {
    /// 使用默认配置创建上下文
    pub fn new<I, F>(definitions: I, factory: F) -> DependencyResult<Self>
    where
        I: IntoIterator<Item = BeanDefinition>,
        F: InstanceFactory + 'static,
    {
        Self::with_config(definitions, Arc::new(factory), ContainerConfig::default())
    }

    /// 使用指定配置创建上下文
    pub fn with_config<I>(
        definitions: I,
        factory: Arc<dyn InstanceFactory>,
        config: ContainerConfig,
    ) -> DependencyResult<Self>
    where
        I: IntoIterator<Item = BeanDefinition>,
    {
        let id = Uuid::new_v4();
        let registry = DefinitionRegistryImpl::build(definitions, config.duplicate_policy)?;

        info!(
            "[{}] 应用上下文初始化完成，共 {} 个定义，构造保护策略: {:?}",
            id,
            registry.len(),
            config.construction_guard
        );

        Ok(Self {
            id,
            registry,
            instances: InstanceCache::new(),
            factory,
            config,
            counters: Counters::default(),
        })
    }

    /// 上下文标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 定义注册表
    pub fn registry(&self) -> Arc<dyn DefinitionRegistry> {
        self.registry.clone()
    }

    /// 查找已注册的定义
    pub fn definition(&self, name: &str) -> DependencyResult<Arc<BeanDefinition>> {
        self.registry.lookup(name)
    }

    /// 单例是否已经缓存
    pub fn is_singleton_cached(&self, name: &str) -> bool {
        self.instances.contains(name)
    }

    /// 解析并转换为具体类型
    pub fn get<T>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get_with(name, &Overrides::new())
    }

    /// 使用覆盖值解析并转换为具体类型
    pub fn get_with<T>(&self, name: &str, overrides: &Overrides) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.resolve_with(name, overrides)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    fn resolve_singleton(
        &self,
        name: &str,
        definition: &BeanDefinition,
    ) -> DependencyResult<Instance> {
        if let Some(instance) = self.cached(name) {
            return Ok(instance);
        }

        match self.config.construction_guard {
            ConstructionGuard::Optimistic => self.construct_and_commit(name, definition),
            ConstructionGuard::PerName => {
                let lock = self.instances.construction_lock(name);
                let _guard = lock.lock();
                // 等锁期间其他调用方可能已经提交
                if let Some(instance) = self.cached(name) {
                    return Ok(instance);
                }
                self.construct_and_commit(name, definition)
            }
        }
    }

    fn cached(&self, name: &str) -> Option<Instance> {
        let instance = self.instances.get(name)?;
        self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
        debug!("[{}] 单例缓存命中: {}", self.id, name);
        Some(instance)
    }

    fn construct_and_commit(
        &self,
        name: &str,
        definition: &BeanDefinition,
    ) -> DependencyResult<Instance> {
        let candidate = self.construct(definition)?;

        match self.instances.commit(name, candidate) {
            Commit::Stored(instance) => {
                debug!("[{}] 单例已提交: {}", self.id, name);
                Ok(instance)
            }
            Commit::Existing(instance) => {
                self.counters.discarded_candidates.fetch_add(1, Ordering::Relaxed);
                warn!("[{}] 单例已被并发提交，丢弃本次构造结果: {}", self.id, name);
                Ok(instance)
            }
        }
    }

    fn construct(&self, definition: &BeanDefinition) -> DependencyResult<Instance> {
        self.counters.constructions.fetch_add(1, Ordering::Relaxed);
        debug!(
            "[{}] 构造 Bean: {} ({}, {})",
            self.id, definition.name, definition.type_info, definition.scope
        );

        self.factory.construct(definition).map_err(|e| {
            debug!("[{}] Bean 构造失败: {}, 原因: {}", self.id, definition.name, e);
            DependencyError::from(e)
        })
    }
}

impl BeanContainer for ApplicationContext {
    fn resolve_with(&self, name: &str, overrides: &Overrides) -> DependencyResult<Instance> {
        self.counters.resolutions.fetch_add(1, Ordering::Relaxed);

        let definition = self.registry.lookup(name)?;
        let effective = merge(&definition, overrides);

        if effective.is_singleton() {
            self.resolve_singleton(name, &effective)
        } else {
            self.construct(&effective)
        }
    }

    fn has(&self, name: &str) -> bool {
        self.registry.exists(name)
    }

    fn definition_names(&self) -> Vec<String> {
        self.registry.names()
    }

    fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_definitions: self.registry.len(),
            cached_singletons: self.instances.len(),
            resolutions: self.counters.resolutions.load(Ordering::Relaxed),
            constructions: self.counters.constructions.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            discarded_candidates: self.counters.discarded_candidates.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("id", &self.id)
            .field("registry", &self.registry)
            .field("instances", &self.instances)
            .field("config", &self.config)
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}
