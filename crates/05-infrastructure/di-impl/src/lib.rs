//! # 依赖注入具体实现
//!
//! 提供 Bean 定义注册表、定义合并、单例缓存与应用上下文的具体实现。
//!
//! 解析流程：按名称查找定义 → 合并覆盖值 → 按作用域分支（单例查缓存或构造后提交，原型直接构造）。

pub mod cache;
pub mod context;
pub mod factory;
pub mod merge;
pub mod registry;

pub use cache::{Commit, InstanceCache};
pub use context::ApplicationContext;
pub use factory::TypeFactoryRegistry;
pub use merge::merge;
pub use registry::DefinitionRegistryImpl;

pub use di_abstractions::BeanContainer;
