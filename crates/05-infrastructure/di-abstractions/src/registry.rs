//! Bean 定义注册表抽象接口

use crate::definition::BeanDefinition;
use infrastructure_common::DependencyResult;
use std::sync::Arc;

/// Bean 定义注册表 trait
///
/// 初始化后只读，按名称提供定义查找与存在性检查。
pub trait DefinitionRegistry: Send + Sync {
    /// 查找定义，未注册时返回 `DependencyError::BeanNotFound`
    fn lookup(&self, name: &str) -> DependencyResult<Arc<BeanDefinition>>;

    /// 检查定义是否存在，从不失败
    fn exists(&self, name: &str) -> bool;

    /// 所有已注册的名称
    fn names(&self) -> Vec<String>;

    /// 已注册定义数量
    fn len(&self) -> usize;

    /// 是否没有任何定义
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
