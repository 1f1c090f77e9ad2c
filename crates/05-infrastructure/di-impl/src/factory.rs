//! 基于类型名称的构造机制
//!
//! 把类型名称映射到构造函数，把 `(类型, 初始化方法)` 映射到初始化钩子。
//! 上下文只通过 [`InstanceFactory`] 使用它，可以替换为任意其他实现。

use di_abstractions::{ArgKey, BeanDefinition, Instance, InstanceFactory};
use infrastructure_common::ConstructionError;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type Constructor =
    Box<dyn Fn(&BeanDefinition) -> Result<Instance, ConstructionError> + Send + Sync>;

type Initializer =
    Box<dyn Fn(&Instance, &BeanDefinition) -> Result<(), ConstructionError> + Send + Sync>;

/// 类型工厂注册表
#[derive(Default)]
pub struct TypeFactoryRegistry {
    constructors: HashMap<String, Constructor>,
    initializers: HashMap<String, HashMap<String, Initializer>>,
}

impl TypeFactoryRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型名称对应的构造函数
    pub fn register<T, F>(mut self, type_name: impl Into<String>, constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&BeanDefinition) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        debug!("注册构造函数: {} -> {}", type_name, std::any::type_name::<T>());
        self.constructors.insert(
            type_name,
            Box::new(move |definition: &BeanDefinition| {
                constructor(definition).map(|t| Arc::new(t) as Instance)
            }),
        );
        self
    }

    /// 以 Rust 类型全名注册构造函数
    pub fn register_type<T, F>(self, constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&BeanDefinition) -> Result<T, ConstructionError> + Send + Sync + 'static,
    {
        self.register(std::any::type_name::<T>(), constructor)
    }

    /// 注册初始化方法
    pub fn register_initializer<T, F>(
        mut self,
        type_name: impl Into<String>,
        method: impl Into<String>,
        initializer: F,
    ) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, &BeanDefinition) -> Result<(), ConstructionError> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        let method = method.into();
        debug!("注册初始化方法: {}::{}", type_name, method);

        let hook: Initializer = Box::new(move |instance: &Instance, definition: &BeanDefinition| {
            let typed = instance.downcast_ref::<T>().ok_or_else(|| {
                ConstructionError::msg(format!(
                    "初始化方法期望类型 {}，Bean: {}",
                    std::any::type_name::<T>(),
                    definition.name
                ))
            })?;
            initializer(typed, definition)
        });
        self.initializers.entry(type_name).or_default().insert(method, hook);
        self
    }

    /// 是否支持指定类型
    pub fn supports(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }
}

impl InstanceFactory for TypeFactoryRegistry {
    fn construct(&self, definition: &BeanDefinition) -> Result<Instance, ConstructionError> {
        let type_name = definition.type_info.name.as_str();
        let constructor = self.constructors.get(type_name).ok_or_else(|| {
            ConstructionError::msg(format!("未注册的类型: {}，Bean: {}", type_name, definition.name))
        })?;

        let instance = constructor(definition)?;

        if let Some(method) = &definition.init_method {
            let initializer = self
                .initializers
                .get(type_name)
                .and_then(|methods| methods.get(method))
                .ok_or_else(|| {
                    ConstructionError::msg(format!("未找到初始化方法: {}::{}", type_name, method))
                })?;
            debug!("调用初始化方法: {}::{}，Bean: {}", type_name, method, definition.name);
            initializer(&instance, definition)?;
        }

        Ok(instance)
    }
}

impl std::fmt::Debug for TypeFactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&String> = self.constructors.keys().collect();
        types.sort();
        f.debug_struct("TypeFactoryRegistry").field("types", &types).finish()
    }
}

/// 读取构造参数并反序列化
pub fn arg<T: DeserializeOwned>(
    definition: &BeanDefinition,
    key: impl Into<ArgKey>,
) -> Result<T, ConstructionError> {
    let key = key.into();
    let value = definition.constructor_args.get(&key).ok_or_else(|| {
        ConstructionError::msg(format!("缺少构造参数: {}，Bean: {}", key, definition.name))
    })?;
    serde_json::from_value(value.clone()).map_err(ConstructionError::new)
}

/// 读取字段注入值并反序列化，未设置时返回 `None`
pub fn field<T: DeserializeOwned>(
    definition: &BeanDefinition,
    name: &str,
) -> Result<Option<T>, ConstructionError> {
    definition
        .fields
        .get(name)
        .map(|value| serde_json::from_value(value.clone()).map_err(ConstructionError::new))
        .transpose()
}
