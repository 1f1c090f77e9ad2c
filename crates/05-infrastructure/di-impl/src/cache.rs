//! 单例实例缓存
//!
//! 以 Bean 名称为键，只在没有值时写入，写入后不再替换或淘汰。

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use di_abstractions::Instance;
use parking_lot::Mutex;
use std::sync::Arc;

/// 提交结果
#[derive(Clone)]
pub enum Commit {
    /// 候选实例被写入缓存
    Stored(Instance),
    /// 缓存中已有实例，候选实例被丢弃
    Existing(Instance),
}

impl Commit {
    /// 缓存中最终生效的实例
    pub fn into_instance(self) -> Instance {
        match self {
            Self::Stored(instance) | Self::Existing(instance) => instance,
        }
    }

    /// 候选实例是否被写入
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

impl std::fmt::Debug for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored(_) => f.write_str("Stored(..)"),
            Self::Existing(_) => f.write_str("Existing(..)"),
        }
    }
}

/// 单例实例缓存
#[derive(Default)]
pub struct InstanceCache {
    /// 已提交的单例
    instances: DashMap<String, Instance>,
    /// 按名称串行化构造用的锁
    construction_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl InstanceCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询已提交的实例
    pub fn get(&self, name: &str) -> Option<Instance> {
        self.instances.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// 仅在没有值时写入候选实例
    ///
    /// 检查与写入在同一个分片锁内完成。
    pub fn commit(&self, name: &str, candidate: Instance) -> Commit {
        match self.instances.entry(name.to_string()) {
            Entry::Occupied(entry) => Commit::Existing(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&candidate));
                Commit::Stored(candidate)
            }
        }
    }

    /// 获取指定名称的构造锁
    pub fn construction_lock(&self, name: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.construction_locks.get(name) {
            return Arc::clone(lock.value());
        }
        Arc::clone(
            self.construction_locks
                .entry(name.to_string())
                .or_default()
                .value(),
        )
    }

    /// 是否已缓存
    pub fn contains(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// 已缓存单例数量
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl std::fmt::Debug for InstanceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.instances.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("InstanceCache").field("instances", &names).finish()
    }
}
