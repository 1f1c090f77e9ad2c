//! 定义合并
//!
//! 将调用方的覆盖值合并到基础定义上，产生新的定义，基础定义保持不变。
//!
//! - 构造参数：覆盖值为 [`ABSENT`](di_abstractions::ABSENT) 时跳过；键已存在时原位替换；
//!   否则按覆盖值的顺序追加到末尾。
//! - 字段：无条件覆盖，`null` 也会替换基础值。

use di_abstractions::{BeanDefinition, Overrides};
use std::sync::Arc;

/// 合并定义与覆盖值
///
/// 覆盖值为空时直接返回 `base` 本身（同一个 `Arc`）。
pub fn merge(base: &Arc<BeanDefinition>, overrides: &Overrides) -> Arc<BeanDefinition> {
    if overrides.is_empty() {
        return Arc::clone(base);
    }

    let mut merged = BeanDefinition::clone(base);

    for (key, value) in &overrides.args {
        if value.is_null() {
            continue;
        }
        match merged.constructor_args.get_mut(key) {
            Some(slot) => *slot = value.clone(),
            None => merged.constructor_args.push(key.clone(), value.clone()),
        }
    }

    merged
        .fields
        .extend(overrides.fields.iter().map(|(k, v)| (k.clone(), v.clone())));

    Arc::new(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{ArgKey, ConstructorArgs, ABSENT};
    use infrastructure_common::Scope;
    use serde_json::json;

    fn base() -> Arc<BeanDefinition> {
        Arc::new(
            BeanDefinition::new("db", "DataSource")
                .with_scope(Scope::Prototype)
                .with_init_method("connect")
                .with_arg("a", 1)
                .with_arg("b", 2)
                .with_field("x", 1)
                .with_field("y", 2),
        )
    }

    #[test]
    fn test_empty_overrides_return_base_itself() {
        let base = base();
        let merged = merge(&base, &Overrides::new());
        assert!(Arc::ptr_eq(&base, &merged));
    }

    #[test]
    fn test_arg_overrides_replace_append_and_skip_absent() {
        let base = base();
        let overrides = Overrides::new().arg("b", 20).arg("c", 3).arg("d", ABSENT);

        let merged = merge(&base, &overrides);

        assert_eq!(
            merged.constructor_args,
            ConstructorArgs::new().with("a", 1).with("b", 20).with("c", 3)
        );
        assert!(!merged.constructor_args.contains_key(&ArgKey::from("d")));
    }

    #[test]
    fn test_absent_arg_never_removes_base_value() {
        let base = base();
        let merged = merge(&base, &Overrides::new().arg("a", ABSENT));

        assert!(!Arc::ptr_eq(&base, &merged));
        assert_eq!(merged.constructor_args, base.constructor_args);
    }

    #[test]
    fn test_new_arg_keys_follow_override_order() {
        let base = base();
        let overrides = Overrides::new().arg("z", 26).arg("a", 10).arg(7usize, "seven");

        let merged = merge(&base, &overrides);

        let keys: Vec<String> = merged
            .constructor_args
            .iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, vec!["a", "b", "z", "#7"]);
        assert_eq!(merged.constructor_args.get(&"a".into()), Some(&json!(10)));
    }

    #[test]
    fn test_field_overrides_are_not_filtered() {
        let base = base();
        let overrides = Overrides::new().field("y", ABSENT).field("z", 3);

        let merged = merge(&base, &overrides);

        assert_eq!(merged.fields.len(), 3);
        assert_eq!(merged.fields.get("x"), Some(&json!(1)));
        assert_eq!(merged.fields.get("y"), Some(&json!(null)));
        assert_eq!(merged.fields.get("z"), Some(&json!(3)));
    }

    #[test]
    fn test_merge_leaves_base_untouched() {
        let base = base();
        let snapshot = BeanDefinition::clone(&base);
        let overrides = Overrides::new().arg("a", 100).arg("e", 5).field("x", "changed");

        let merged = merge(&base, &overrides);

        assert_eq!(*base, snapshot);
        assert_eq!(merged.name, base.name);
        assert_eq!(merged.scope, base.scope);
        assert_eq!(merged.type_info, base.type_info);
        assert_eq!(merged.init_method, base.init_method);
    }
}
