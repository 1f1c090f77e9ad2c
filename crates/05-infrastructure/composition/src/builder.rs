//! 应用上下文构建器

use crate::config_sources::{ConfigSourceType, ContextSettings, DefinitionSources};
use di_abstractions::{BeanDefinition, ContainerConfig, InstanceFactory};
use di_impl::ApplicationContext;
use infrastructure_common::{InfrastructureError, InfrastructureResult};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 应用上下文构建器
///
/// 汇集配置文件、环境变量与代码中声明的 Bean 定义，再交给 [`ApplicationContext`]。
/// 配置文件中的定义排在前面，代码中添加的定义排在后面；
/// 在 `LastWins` 策略下，同名定义以代码中添加的为准。
pub struct ContextBuilder {
    /// 配置源
    sources: DefinitionSources,
    /// 代码中声明的定义
    definitions: Vec<BeanDefinition>,
    /// 显式指定的容器配置，优先于配置文件中的 `[context]`
    config: Option<ContainerConfig>,
    /// 实例构造器
    factory: Option<Arc<dyn InstanceFactory>>,
    /// 日志配置，为 `None` 时不初始化日志
    logging_config: Option<LoggingConfig>,
}

impl ContextBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            sources: DefinitionSources::new(),
            definitions: Vec::new(),
            config: None,
            factory: None,
            logging_config: None,
        }
    }

    /// 添加单个 Bean 定义
    pub fn add_definition(mut self, definition: BeanDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// 批量添加 Bean 定义
    pub fn add_definitions<I>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = BeanDefinition>,
    {
        self.definitions.extend(definitions);
        self
    }

    /// 添加定义文件（TOML / JSON / YAML）
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        self.sources = self.sources.add_file(path)?;
        Ok(self)
    }

    /// 添加内存中的定义内容
    pub fn add_config_str(
        mut self,
        content: impl Into<String>,
        source_type: ConfigSourceType,
    ) -> Self {
        self.sources = self.sources.add_str(content, source_type);
        self
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        self.sources = self.sources.with_env_prefix(prefix);
        self
    }

    /// 指定容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 指定实例构造器
    pub fn with_factory<F: InstanceFactory + 'static>(self, factory: F) -> Self {
        self.with_shared_factory(Arc::new(factory))
    }

    /// 指定共享的实例构造器
    pub fn with_shared_factory(mut self, factory: Arc<dyn InstanceFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// 启用日志并指定配置
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 构建应用上下文
    pub fn build(self) -> InfrastructureResult<ApplicationContext> {
        if let Some(logging) = &self.logging_config {
            logging.initialize()?;
        }

        info!("开始构建应用上下文");

        let settings = if self.sources.is_empty() {
            ContextSettings::default()
        } else {
            self.sources.load()?
        };

        let config = self.config.unwrap_or(settings.context);
        let factory = self.factory.ok_or_else(|| InfrastructureError::BootstrapFailed {
            message: "未指定实例构造器".to_string(),
        })?;

        let file_count = settings.beans.len();
        let definitions = settings.beans.into_iter().chain(self.definitions);
        let context = ApplicationContext::with_config(definitions, factory, config)?;

        info!(
            "应用上下文构建完成: {}（配置文件定义 {} 个）",
            context.id(),
            file_count
        );
        Ok(context)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以环境变量为准
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名和行号
    pub show_location: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_location: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_location: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_location: false,
            json_format: true,
        }
    }

    /// 以指定级别创建配置
    pub fn with_level(level: tracing::Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// 安装全局日志订阅器
    pub fn initialize(&self) -> InfrastructureResult<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_location)
            .with_line_number(self.show_location);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
