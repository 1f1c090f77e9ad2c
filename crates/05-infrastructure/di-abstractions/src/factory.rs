//! 实例构造抽象接口
//!
//! 容器只依赖这里的构造能力，具体如何根据类型描述产生实例由调用方提供。

use crate::definition::BeanDefinition;
use infrastructure_common::ConstructionError;
use std::any::Any;
use std::sync::Arc;

/// 容器管理的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 实例工厂 trait
///
/// 根据定义的类型描述、有序构造参数、字段注入值和初始化方法产生实例。
/// 同一个单例在竞争下可能被调用多次。
pub trait InstanceFactory: Send + Sync {
    /// 构造实例
    fn construct(&self, definition: &BeanDefinition) -> Result<Instance, ConstructionError>;
}

impl<F> InstanceFactory for F
where
    F: Fn(&BeanDefinition) -> Result<Instance, ConstructionError> + Send + Sync,
{
    fn construct(&self, definition: &BeanDefinition) -> Result<Instance, ConstructionError> {
        self(definition)
    }
}
