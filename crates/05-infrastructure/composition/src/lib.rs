//! # 基础设施组合层
//!
//! 将定义配置源、日志与依赖注入实现组合成一个可用的应用上下文。
//!
//! ## 主要功能
//!
//! - **上下文构建器**: 使用构建者模式汇集 Bean 定义、构造器与容器配置
//! - **定义配置源**: 从 TOML / JSON / YAML 文件和环境变量加载 Bean 定义
//! - **日志初始化**: 基于 `tracing-subscriber` 的统一日志配置
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{ContextBuilder, LoggingConfig};
//! use di_impl::{BeanContainer, TypeFactoryRegistry};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let factories = TypeFactoryRegistry::new()
//!         .register("Greeter", |_| Ok(String::from("hello")));
//!
//!     let context = ContextBuilder::new()
//!         .add_config_file("config/beans.toml")?
//!         .add_config_env_vars("BEAN")
//!         .with_factory(factories)
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     let greeter = context.get::<String>("greeter")?;
//!     println!("{}", greeter);
//!     println!("{:?}", context.stats());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config_sources;

// 重新导出主要类型
pub use builder::{ContextBuilder, LoggingConfig};
pub use config_sources::{
    ConfigSourceDescriptor, ConfigSourceType, ContextSettings, DefinitionSources,
};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;

#[cfg(test)]
#[path = "tests/integration_tests.rs"]
mod integration_tests;
