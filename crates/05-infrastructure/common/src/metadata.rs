//! 类型描述信息
//!
//! 容器本身不解释类型描述，只把它原样交给构造机制。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID（仅在通过 `TypeInfo::of` 创建时可用）
    pub id: Option<TypeId>,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>().to_string(),
            id: Some(TypeId::of::<T>()),
        }
    }

    /// 从类型名称创建类型信息（用于配置）
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// 是否描述类型 `T`
    pub fn is<T: 'static>(&self) -> bool {
        match self.id {
            Some(id) => id == TypeId::of::<T>(),
            None => self.name == std::any::type_name::<T>(),
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for TypeInfo {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl Serialize for TypeInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for TypeInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from_name)
    }
}
