//! # Infrastructure Common
//!
//! 这个 crate 提供了 Bean 容器各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`DependencyError`] - 依赖解析错误
//! - [`ConstructionError`] - 构造机制产生的原始错误
//! - [`Scope`] - Bean 作用域
//! - [`TypeInfo`] - 交给构造机制的类型描述

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
