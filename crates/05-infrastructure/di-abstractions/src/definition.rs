//! Bean 定义
//!
//! 描述如何构建一个具名组件：类型、作用域、构造参数、字段注入值以及初始化方法。
//! 注册后的定义不再修改，合并覆盖值总是产生新的定义。

use crate::registry::DefinitionRegistry;
use infrastructure_common::{Scope, TypeInfo};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// 缺省标记：构造参数覆盖值为该值时不替换也不追加
pub const ABSENT: Value = Value::Null;

/// 字段注入值
pub type Fields = HashMap<String, Value>;

/// 构造参数键，可以是位置或名称
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgKey {
    /// 位置参数
    Index(usize),
    /// 命名参数
    Name(String),
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{}", index),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ArgKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ArgKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ArgKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// 有序构造参数
///
/// 顺序决定位置构造，同一定义内键不可重复。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ArgEntry>", into = "Vec<ArgEntry>")]
pub struct ConstructorArgs {
    entries: Vec<(ArgKey, Value)>,
}

impl ConstructorArgs {
    /// 创建空参数列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加参数（构建者风格）
    pub fn with(mut self, key: impl Into<ArgKey>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// 追加参数
    pub fn push(&mut self, key: impl Into<ArgKey>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// 获取参数值
    pub fn get(&self, key: &ArgKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 获取可变参数值
    pub fn get_mut(&mut self, key: &ArgKey) -> Option<&mut Value> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// 参数所在位置
    pub fn position(&self, key: &ArgKey) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// 是否包含参数键
    pub fn contains_key(&self, key: &ArgKey) -> bool {
        self.position(key).is_some()
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按顺序遍历参数
    pub fn iter(&self) -> impl Iterator<Item = (&ArgKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// 第一个重复出现的键
    pub fn first_duplicate_key(&self) -> Option<&ArgKey> {
        self.entries
            .iter()
            .enumerate()
            .find(|(i, (key, _))| self.entries[..*i].iter().any(|(k, _)| k == key))
            .map(|(_, (key, _))| key)
    }
}

impl<K, V> FromIterator<(K, V)> for ConstructorArgs
where
    K: Into<ArgKey>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// 构造参数的配置形式
///
/// 既没有 `name` 也没有 `index` 的条目使用其在列表中的位置作为键。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default)]
    pub value: Value,
}

impl From<Vec<ArgEntry>> for ConstructorArgs {
    fn from(entries: Vec<ArgEntry>) -> Self {
        entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                let key = match (entry.name, entry.index) {
                    (Some(name), _) => ArgKey::Name(name),
                    (None, Some(index)) => ArgKey::Index(index),
                    (None, None) => ArgKey::Index(position),
                };
                (key, entry.value)
            })
            .collect()
    }
}

impl From<ConstructorArgs> for Vec<ArgEntry> {
    fn from(args: ConstructorArgs) -> Self {
        args.entries
            .into_iter()
            .map(|(key, value)| match key {
                ArgKey::Name(name) => ArgEntry { name: Some(name), index: None, value },
                ArgKey::Index(index) => ArgEntry { name: None, index: Some(index), value },
            })
            .collect()
    }
}

/// Bean 定义
#[derive(Clone, Serialize, Deserialize)]
pub struct BeanDefinition {
    /// Bean 名称，在注册表内唯一
    pub name: String,
    /// 类型描述，交给构造机制解释
    #[serde(rename = "type")]
    pub type_info: TypeInfo,
    /// 作用域
    #[serde(default)]
    pub scope: Scope,
    /// 构造完成后调用的初始化方法
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub init_method: Option<String>,
    /// 构造参数
    #[serde(default, rename = "args")]
    pub constructor_args: ConstructorArgs,
    /// 字段注入值
    #[serde(default)]
    pub fields: Fields,
    /// 所属注册表，用于嵌套查找
    #[serde(skip)]
    registry: Option<Weak<dyn DefinitionRegistry>>,
}

impl BeanDefinition {
    /// 创建新的 Bean 定义
    pub fn new(name: impl Into<String>, type_info: impl Into<TypeInfo>) -> Self {
        Self {
            name: name.into(),
            type_info: type_info.into(),
            scope: Scope::default(),
            init_method: None,
            constructor_args: ConstructorArgs::new(),
            fields: Fields::new(),
            registry: None,
        }
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 设置初始化方法，空字符串表示没有
    pub fn with_init_method(mut self, init_method: impl Into<String>) -> Self {
        let init_method = init_method.into();
        self.init_method = (!init_method.is_empty()).then_some(init_method);
        self
    }

    /// 追加构造参数
    pub fn with_arg(mut self, key: impl Into<ArgKey>, value: impl Into<Value>) -> Self {
        self.constructor_args.push(key, value);
        self
    }

    /// 设置字段注入值
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// 是否为单例
    pub fn is_singleton(&self) -> bool {
        self.scope.is_singleton()
    }

    /// 获取所属注册表
    pub fn registry(&self) -> Option<Arc<dyn DefinitionRegistry>> {
        self.registry.as_ref().and_then(Weak::upgrade)
    }

    /// 绑定所属注册表
    pub fn attach_registry(&mut self, registry: Weak<dyn DefinitionRegistry>) {
        self.registry = Some(registry);
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("type_info", &self.type_info)
            .field("scope", &self.scope)
            .field("init_method", &self.init_method)
            .field("constructor_args", &self.constructor_args)
            .field("fields", &self.fields)
            .field("registry", &self.registry.is_some())
            .finish()
    }
}

/// 比较时忽略所属注册表
impl PartialEq for BeanDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.type_info == other.type_info
            && self.scope == other.scope
            && self.init_method == other.init_method
            && self.constructor_args == other.constructor_args
            && self.fields == other.fields
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
