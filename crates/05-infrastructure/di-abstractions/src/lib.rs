//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义 Bean 定义模型与容器的核心接口。
//!
//! ## 核心接口
//!
//! - [`BeanDefinition`] - Bean 定义
//! - [`DefinitionRegistry`] - 定义注册表接口
//! - [`InstanceFactory`] - 实例构造接口
//! - [`BeanContainer`] - 容器门面接口
//! - [`Overrides`] - 解析时的覆盖值

pub mod container;
pub mod definition;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use container::*;
pub use definition::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
