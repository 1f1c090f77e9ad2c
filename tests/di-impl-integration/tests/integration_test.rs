//! Centralized integration tests for di-impl crate
//!
//! 工厂把收到的（已合并的）定义原样作为实例返回，便于观察合并结果。

use di_abstractions::{
    ArgKey, BeanContainer, BeanDefinition, ConstructionGuard, ContainerConfig, Instance,
    InstanceFactory, Overrides, ABSENT,
};
use di_impl::{merge, ApplicationContext};
use infrastructure_common::{ConstructionError, DependencyError, Scope};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 记录调用次数并返回定义快照的构造器
#[derive(Default)]
struct SnapshotFactory {
    calls: AtomicUsize,
}

impl SnapshotFactory {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InstanceFactory for SnapshotFactory {
    fn construct(&self, definition: &BeanDefinition) -> Result<Instance, ConstructionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if definition.type_info.name == "Broken" {
            return Err(ConstructionError::msg(format!("无法构造 {}", definition.name)));
        }
        Ok(Arc::new(definition.clone()))
    }
}

fn setup(
    definitions: Vec<BeanDefinition>,
    guard: ConstructionGuard,
) -> (ApplicationContext, Arc<SnapshotFactory>) {
    init_test_logger();
    let factory = Arc::new(SnapshotFactory::default());
    let config = ContainerConfig {
        construction_guard: guard,
        ..ContainerConfig::default()
    };
    let context = ApplicationContext::with_config(definitions, factory.clone(), config).unwrap();
    (context, factory)
}

fn concurrent_resolve(context: &ApplicationContext, name: &str, threads: usize) -> Vec<Instance> {
    let barrier = Barrier::new(threads);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    context.resolve(name).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn test_two_threads_observe_single_survivor() {
    let (context, factory) = setup(
        vec![BeanDefinition::new("db", "DataSource").with_arg("dsn", "x")],
        ConstructionGuard::Optimistic,
    );

    let instances = concurrent_resolve(&context, "db", 2);

    assert!(Arc::ptr_eq(&instances[0], &instances[1]));
    assert!((1..=2).contains(&factory.calls()));
    assert_eq!(context.stats().cached_singletons, 1);
}

#[test]
fn test_singleton_identity_under_contention() {
    for guard in [ConstructionGuard::Optimistic, ConstructionGuard::PerName] {
        let (context, factory) = setup(vec![BeanDefinition::new("db", "DataSource")], guard);

        let instances = concurrent_resolve(&context, "db", 32);
        let later = context.resolve("db").unwrap();

        assert!(instances.iter().all(|i| Arc::ptr_eq(i, &later)));
        if guard == ConstructionGuard::PerName {
            assert_eq!(factory.calls(), 1);
        }
    }
}

#[test]
fn test_prototype_never_repeats_identity() {
    let (context, factory) = setup(
        vec![BeanDefinition::new("request", "Request").with_scope(Scope::Prototype)],
        ConstructionGuard::Optimistic,
    );

    let a = context.resolve("request").unwrap();
    let b = context.resolve("request").unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(factory.calls(), 2);
    assert_eq!(context.stats().cached_singletons, 0);
}

#[test]
fn test_merge_without_overrides_returns_base() {
    let base = Arc::new(
        BeanDefinition::new("db", "DataSource")
            .with_arg("a", 1)
            .with_field("x", 1),
    );
    let snapshot = (*base).clone();

    assert!(Arc::ptr_eq(&merge(&base, &Overrides::new()), &base));

    let merged = merge(&base, &Overrides::new().arg("a", 2).field("x", 2));
    assert!(!Arc::ptr_eq(&merged, &base));
    assert_eq!(*base, snapshot);
}

#[test]
fn test_arg_overrides_flow_into_construction() {
    let (context, _) = setup(
        vec![BeanDefinition::new("svc", "Service")
            .with_scope(Scope::Prototype)
            .with_arg("a", 1)
            .with_arg("b", 2)],
        ConstructionGuard::Optimistic,
    );

    let overrides = Overrides::new().arg("b", 20).arg("c", 3).arg("d", ABSENT);
    let built = context.get_with::<BeanDefinition>("svc", &overrides).unwrap();

    let args: Vec<(ArgKey, serde_json::Value)> =
        built.constructor_args.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    assert_eq!(
        args,
        vec![
            (ArgKey::from("a"), json!(1)),
            (ArgKey::from("b"), json!(20)),
            (ArgKey::from("c"), json!(3)),
        ]
    );

    // 注册的定义保持不变
    let registered = context.definition("svc").unwrap();
    assert_eq!(registered.constructor_args.len(), 2);
    assert_eq!(registered.constructor_args.get(&ArgKey::from("b")), Some(&json!(2)));
}

#[test]
fn test_field_overrides_keep_null() {
    let (context, _) = setup(
        vec![BeanDefinition::new("svc", "Service")
            .with_scope(Scope::Prototype)
            .with_field("x", 1)
            .with_field("y", 2)],
        ConstructionGuard::Optimistic,
    );

    let overrides = Overrides::new().field("y", ABSENT).field("z", 3);
    let built = context.get_with::<BeanDefinition>("svc", &overrides).unwrap();

    assert_eq!(built.fields.len(), 3);
    assert_eq!(built.fields.get("x"), Some(&json!(1)));
    assert_eq!(built.fields.get("y"), Some(&json!(null)));
    assert_eq!(built.fields.get("z"), Some(&json!(3)));
}

#[test]
fn test_missing_bean_reports_name() {
    let (context, factory) = setup(vec![], ConstructionGuard::Optimistic);

    let err = context.resolve("missing").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(&err, DependencyError::BeanNotFound { name } if name == "missing"));
    assert!(err.to_string().contains("missing"));

    assert!(!context.has("missing"));
    assert_eq!(factory.calls(), 0);
}

#[test]
fn test_singleton_ignores_overrides_after_first_resolution() {
    let (context, factory) = setup(
        vec![BeanDefinition::new("db", "DataSource").with_arg("dsn", "x")],
        ConstructionGuard::Optimistic,
    );

    let first = context.get::<BeanDefinition>("db").unwrap();
    let second = context
        .get_with::<BeanDefinition>("db", &Overrides::new().arg("dsn", "y"))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.constructor_args.get(&ArgKey::from("dsn")), Some(&json!("x")));
    assert_eq!(factory.calls(), 1);
}

#[test]
fn test_construction_failure_surfaces_unchanged() {
    let (context, factory) = setup(
        vec![BeanDefinition::new("bad", "Broken")],
        ConstructionGuard::PerName,
    );

    let err = context.resolve("bad").unwrap_err();
    assert!(matches!(err, DependencyError::Construction(_)));
    assert_eq!(err.to_string(), "无法构造 bad");

    // 失败不会被缓存，下一次解析会重新构造
    assert!(context.resolve("bad").is_err());
    assert_eq!(factory.calls(), 2);
    assert!(!context.is_singleton_cached("bad"));
}

#[test]
fn test_constructed_definition_sees_registry() {
    let (context, _) = setup(
        vec![
            BeanDefinition::new("db", "DataSource"),
            BeanDefinition::new("repo", "Repository").with_arg("db", "db"),
        ],
        ConstructionGuard::Optimistic,
    );

    let built = context
        .get_with::<BeanDefinition>("repo", &Overrides::new().field("cache", true))
        .unwrap();
    let registry = built.registry().expect("合并后的定义应保留注册表引用");

    assert!(registry.exists("db"));
    assert!(!registry.exists("cache"));
    assert_eq!(registry.names(), vec!["db".to_string(), "repo".to_string()]);
}
