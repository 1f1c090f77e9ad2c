//! Bean 定义与容器配置的配置源
//!
//! 通过 `config` crate 合并多个文件和环境变量，产出 [`ContextSettings`]。
//! 文件结构：
//!
//! ```toml
//! [context]
//! duplicate_policy = "reject"
//! construction_guard = "per_name"
//!
//! [[beans]]
//! name = "db"
//! type = "DataSource"
//! scope = "singleton"
//! init_method = "connect"
//! args = [{ name = "dsn", value = "postgres://localhost" }]
//! fields = { timeout = 30 }
//! ```

use di_abstractions::{BeanDefinition, ContainerConfig};
use infrastructure_common::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 从配置源加载的上下文设置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// 容器配置
    pub context: ContainerConfig,
    /// Bean 定义，按出现顺序排列
    pub beans: Vec<BeanDefinition>,
}

/// 配置源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceType {
    /// TOML 文件
    Toml,
    /// JSON 文件
    Json,
    /// YAML 文件
    Yaml,
}

impl ConfigSourceType {
    /// 根据文件扩展名推断类型
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn format(self) -> config::FileFormat {
        match self {
            Self::Toml => config::FileFormat::Toml,
            Self::Json => config::FileFormat::Json,
            Self::Yaml => config::FileFormat::Yaml,
        }
    }
}

/// 配置源描述
#[derive(Debug, Clone)]
pub enum ConfigSourceDescriptor {
    /// 配置文件
    File {
        path: PathBuf,
        source_type: ConfigSourceType,
        required: bool,
    },
    /// 内存中的配置内容
    Inline {
        content: String,
        source_type: ConfigSourceType,
    },
}

/// 定义配置源集合
///
/// 后添加的配置源优先级更高；环境变量始终最后合并。
#[derive(Debug, Clone, Default)]
pub struct DefinitionSources {
    sources: Vec<ConfigSourceDescriptor>,
    env_prefix: Option<String>,
}

impl DefinitionSources {
    /// 创建空配置源集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加必需的配置文件
    pub fn add_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        self.push_file(path, true)
    }

    /// 添加可选的配置文件，文件不存在时忽略
    pub fn add_optional_file<P: AsRef<Path>>(self, path: P) -> ConfigResult<Self> {
        self.push_file(path.as_ref(), false)
    }

    fn push_file(mut self, path: &Path, required: bool) -> ConfigResult<Self> {
        let source_type =
            ConfigSourceType::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            })?;

        info!("添加配置文件: {} ({:?})", path.display(), source_type);
        self.sources.push(ConfigSourceDescriptor::File {
            path: path.to_path_buf(),
            source_type,
            required,
        });
        Ok(self)
    }

    /// 添加内存中的配置内容
    pub fn add_str(mut self, content: impl Into<String>, source_type: ConfigSourceType) -> Self {
        debug!("添加内存配置 ({:?})", source_type);
        self.sources.push(ConfigSourceDescriptor::Inline {
            content: content.into(),
            source_type,
        });
        self
    }

    /// 设置环境变量前缀，例如 `BEAN__CONTEXT__CONSTRUCTION_GUARD=per_name`
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 是否没有任何配置源
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.env_prefix.is_none()
    }

    /// 合并所有配置源并反序列化
    pub fn load(&self) -> ConfigResult<ContextSettings> {
        let mut builder = config::Config::builder();

        for source in &self.sources {
            builder = match source {
                ConfigSourceDescriptor::File {
                    path,
                    source_type,
                    required,
                } => builder.add_source(
                    config::File::from(path.as_path())
                        .format(source_type.format())
                        .required(*required),
                ),
                ConfigSourceDescriptor::Inline { content, source_type } => {
                    builder.add_source(config::File::from_str(content, source_type.format()))
                }
            };
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let settings: ContextSettings = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;

        info!(
            "配置加载完成，共 {} 个 Bean 定义，{} 个配置源",
            settings.beans.len(),
            self.sources.len()
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{ArgKey, ConstructionGuard, DuplicatePolicy};
    use infrastructure_common::Scope;
    use serde_json::json;
    use std::io::Write;

    const BEANS_TOML: &str = r#"
[context]
duplicate_policy = "reject"

[[beans]]
name = "db"
type = "DataSource"
init_method = "connect"
args = [{ name = "dsn", value = "postgres://localhost" }, { value = 8 }]
fields = { timeout = 30 }

[[beans]]
name = "request"
type = "Request"
scope = "prototype"
"#;

    #[test]
    fn test_load_toml_str() {
        let settings = DefinitionSources::new()
            .add_str(BEANS_TOML, ConfigSourceType::Toml)
            .load()
            .unwrap();

        assert_eq!(settings.context.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(settings.context.construction_guard, ConstructionGuard::Optimistic);
        assert_eq!(settings.beans.len(), 2);

        let db = &settings.beans[0];
        assert_eq!(db.name, "db");
        assert_eq!(db.scope, Scope::Singleton);
        assert_eq!(db.init_method.as_deref(), Some("connect"));
        assert_eq!(
            db.constructor_args.get(&ArgKey::from("dsn")),
            Some(&json!("postgres://localhost"))
        );
        assert_eq!(db.constructor_args.get(&ArgKey::Index(1)), Some(&json!(8)));
        assert_eq!(db.fields.get("timeout"), Some(&json!(30)));

        assert_eq!(settings.beans[1].scope, Scope::Prototype);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            "{}",
            json!({
                "context": { "construction_guard": "per_name" },
                "beans": [{ "name": "cache", "type": "Cache", "fields": { "ttl": null } }]
            })
        )
        .unwrap();

        let settings = DefinitionSources::new().add_file(file.path()).unwrap().load().unwrap();

        assert_eq!(settings.context.construction_guard, ConstructionGuard::PerName);
        assert_eq!(settings.beans[0].type_info.name, "Cache");
        assert_eq!(settings.beans[0].fields.get("ttl"), Some(&json!(null)));
    }

    #[test]
    fn test_env_overrides_context_settings() {
        std::env::set_var("LORN_SOURCES_TEST__CONTEXT__CONSTRUCTION_GUARD", "per_name");
        std::env::set_var("LORN_SOURCES_TEST__CONTEXT__DUPLICATE_POLICY", "last_wins");

        let settings = DefinitionSources::new()
            .add_str(BEANS_TOML, ConfigSourceType::Toml)
            .with_env_prefix("LORN_SOURCES_TEST")
            .load()
            .unwrap();

        std::env::remove_var("LORN_SOURCES_TEST__CONTEXT__CONSTRUCTION_GUARD");
        std::env::remove_var("LORN_SOURCES_TEST__CONTEXT__DUPLICATE_POLICY");

        assert_eq!(settings.context.construction_guard, ConstructionGuard::PerName);
        assert_eq!(settings.context.duplicate_policy, DuplicatePolicy::LastWins);
        assert_eq!(settings.beans.len(), 2);
    }

    #[test]
    fn test_missing_required_file() {
        let result = DefinitionSources::new().add_file("/nonexistent/beans.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_unknown_extension() {
        let result = DefinitionSources::new().add_optional_file("beans.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_optional_missing_file_is_ignored() {
        let settings = DefinitionSources::new()
            .add_optional_file("/nonexistent/beans.toml")
            .unwrap()
            .load()
            .unwrap();
        assert!(settings.beans.is_empty());
    }
}
