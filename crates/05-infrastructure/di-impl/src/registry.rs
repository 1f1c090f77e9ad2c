//! Bean 定义注册表实现

use di_abstractions::{BeanDefinition, DefinitionRegistry, DuplicatePolicy};
use infrastructure_common::{DependencyError, DependencyResult};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// 只读 Bean 定义注册表
///
/// 构建完成后不再写入，并发读取无需加锁。
#[derive(Debug)]
pub struct DefinitionRegistryImpl {
    definitions: HashMap<String, Arc<BeanDefinition>>,
}

impl DefinitionRegistryImpl {
    /// 从定义序列构建注册表
    ///
    /// 重名定义按 `policy` 处理：`LastWins` 时保留最后一个，`Reject` 时返回错误。
    /// 每个定义都会绑定回所属注册表。
    pub fn build<I>(definitions: I, policy: DuplicatePolicy) -> DependencyResult<Arc<Self>>
    where
        I: IntoIterator<Item = BeanDefinition>,
    {
        let mut tidy: HashMap<String, BeanDefinition> = HashMap::new();

        for definition in definitions {
            let name = definition.name.clone();
            if tidy.insert(name.clone(), definition).is_some() {
                match policy {
                    DuplicatePolicy::LastWins => {
                        warn!("Bean 定义重复，后注册的定义生效: {}", name);
                    }
                    DuplicatePolicy::Reject => {
                        return Err(DependencyError::DuplicateDefinition { name });
                    }
                }
            }
        }

        // 只校验最终生效的定义
        for definition in tidy.values() {
            if let Some(key) = definition.constructor_args.first_duplicate_key() {
                return Err(DependencyError::InvalidDefinition {
                    name: definition.name.clone(),
                    message: format!("构造参数键重复: {}", key),
                });
            }
        }

        let registry = Arc::new_cyclic(|weak: &Weak<Self>| {
            let owner: Weak<dyn DefinitionRegistry> = weak.clone();
            let definitions = tidy
                .into_iter()
                .map(|(name, mut definition)| {
                    definition.attach_registry(owner.clone());
                    (name, Arc::new(definition))
                })
                .collect();
            Self { definitions }
        });

        info!("Bean 定义注册表构建完成，共 {} 个定义", registry.definitions.len());
        Ok(registry)
    }
}

impl DefinitionRegistry for DefinitionRegistryImpl {
    fn lookup(&self, name: &str) -> DependencyResult<Arc<BeanDefinition>> {
        self.definitions.get(name).cloned().ok_or_else(|| {
            debug!("Bean 定义不存在: {}", name);
            DependencyError::not_found(name)
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }

    fn len(&self) -> usize {
        self.definitions.len()
    }
}
