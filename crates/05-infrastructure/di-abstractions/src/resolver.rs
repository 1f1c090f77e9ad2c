//! 解析时的覆盖值

use crate::definition::{ArgKey, Fields};
use indexmap::IndexMap;
use serde_json::Value;

/// 构造参数覆盖值，按插入顺序追加新键
pub type ArgOverrides = IndexMap<ArgKey, Value>;

/// 调用方在解析时提供的覆盖值
///
/// 构造参数覆盖值为 [`ABSENT`](crate::ABSENT) 时被忽略，字段覆盖值则无条件生效。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// 字段覆盖值
    pub fields: Fields,
    /// 构造参数覆盖值
    pub args: ArgOverrides,
}

impl Overrides {
    /// 创建空覆盖值
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置字段覆盖值
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// 设置构造参数覆盖值
    pub fn arg(mut self, key: impl Into<ArgKey>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// 是否没有任何覆盖值
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.args.is_empty()
    }
}
