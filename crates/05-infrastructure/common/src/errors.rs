//! 错误类型定义

use std::fmt;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("不支持的配置文件格式: {path}")]
    UnsupportedFormat { path: String },
}

/// 构造错误
///
/// 由外部构造机制产生，容器不解释也不包装其内容：
/// `Display` 与 `source()` 都直接转发给原始错误。
pub struct ConstructionError(Box<dyn std::error::Error + Send + Sync>);

impl ConstructionError {
    /// 包装任意构造错误
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self(error.into())
    }

    /// 从描述信息创建构造错误
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }

    /// 获取原始错误
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Debug for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ConstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("Bean 未定义: {name}")]
    BeanNotFound { name: String },

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("Bean 定义重复: {name}")]
    DuplicateDefinition { name: String },

    #[error("Bean 定义无效: {name}, 原因: {message}")]
    InvalidDefinition { name: String, message: String },

    #[error("Bean 类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },
}

impl DependencyError {
    /// 创建未找到错误
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::BeanNotFound { name: name.into() }
    }

    /// 是否为未找到错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BeanNotFound { .. })
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
