//! # 示例应用程序
//!
//! 演示如何从定义文件构建应用上下文，并在命令行中按名称解析 Bean。
//!
//! ```text
//! example-app --config config/beans.toml data_source \
//!     --arg dsn='"postgres://db"' --field timeout=10
//! ```

use anyhow::{anyhow, Context};
use clap::Parser;
use di_abstractions::{ArgKey, BeanContainer, BeanDefinition, Instance, Overrides};
use di_impl::factory::{arg, field};
use di_impl::TypeFactoryRegistry;
use infrastructure_common::ConstructionError;
use infrastructure_composition::{ContextBuilder, LoggingConfig};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use uuid::Uuid;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn Bean Context 示例应用")]
struct Args {
    /// 定义文件路径
    #[arg(short, long, default_value = "config/beans.toml")]
    config: String,

    /// 要解析的 Bean 名称，省略时列出全部定义
    bean: Option<String>,

    /// 构造参数覆盖，格式为 `键=JSON`，键为数字时按位置匹配
    #[arg(long = "arg", value_name = "KEY=JSON")]
    args: Vec<String>,

    /// 字段覆盖，格式为 `字段=JSON`
    #[arg(long = "field", value_name = "NAME=JSON")]
    fields: Vec<String>,

    /// 重复解析次数，用于观察单例与原型的差别
    #[arg(short, long, default_value_t = 1)]
    times: usize,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let context = ContextBuilder::new()
        .add_config_file(&args.config)
        .with_context(|| format!("无法加载定义文件: {}", args.config))?
        .add_config_env_vars("BEAN")
        .with_factory(demo_factories())
        .with_logging(LoggingConfig::with_level(parse_log_level(&args.log_level)))
        .build()?;

    info!("启动 Lorn Bean Context 示例应用");

    let Some(name) = args.bean.as_deref() else {
        for name in context.definition_names() {
            let definition = context.definition(&name)?;
            println!("{:<20} {:<16} {}", name, definition.type_info, definition.scope);
        }
        return Ok(());
    };

    let overrides = parse_overrides(&args.args, &args.fields)?;
    let mut previous: Option<Instance> = None;
    for round in 1..=args.times.max(1) {
        let instance = context.resolve_with(name, &overrides)?;
        let same = previous
            .as_ref()
            .map(|p| std::sync::Arc::ptr_eq(p, &instance));
        println!(
            "#{} {} {}",
            round,
            describe(&instance),
            match same {
                Some(true) => "(同一实例)",
                Some(false) => "(新实例)",
                None => "",
            }
        );
        previous = Some(instance);
    }

    println!("{:#?}", context.stats());
    Ok(())
}

/// 演示用的数据源
#[derive(Debug)]
struct DataSource {
    dsn: String,
    pool_size: u32,
    timeout: Option<u64>,
    connected: AtomicBool,
}

/// 演示用的问候服务
#[derive(Debug)]
struct Greeter {
    greeting: String,
    target: String,
}

/// 演示用的请求上下文
#[derive(Debug)]
struct RequestContext {
    id: Uuid,
}

fn demo_factories() -> TypeFactoryRegistry {
    TypeFactoryRegistry::new()
        .register("DataSource", |definition| {
            Ok(DataSource {
                dsn: arg(definition, "dsn")?,
                pool_size: arg(definition, 1usize)?,
                timeout: field(definition, "timeout")?,
                connected: AtomicBool::new(false),
            })
        })
        .register_initializer(
            "DataSource",
            "connect",
            |ds: &DataSource, definition: &BeanDefinition| {
                if ds.dsn.is_empty() {
                    return Err(ConstructionError::msg(format!(
                        "数据源地址为空: {}",
                        definition.name
                    )));
                }
                ds.connected.store(true, Ordering::SeqCst);
                Ok(())
            },
        )
        .register("Greeter", |definition| {
            Ok(Greeter {
                greeting: arg(definition, 0usize)?,
                target: field(definition, "target")?.unwrap_or_else(|| "world".to_string()),
            })
        })
        .register("RequestContext", |_| Ok(RequestContext { id: Uuid::new_v4() }))
}

fn describe(instance: &Instance) -> String {
    if let Some(ds) = instance.downcast_ref::<DataSource>() {
        format!(
            "DataSource {{ dsn: {}, pool_size: {}, timeout: {:?}, connected: {} }}",
            ds.dsn,
            ds.pool_size,
            ds.timeout,
            ds.connected.load(Ordering::SeqCst)
        )
    } else if let Some(greeter) = instance.downcast_ref::<Greeter>() {
        format!("{}, {}!", greeter.greeting, greeter.target)
    } else if let Some(request) = instance.downcast_ref::<RequestContext>() {
        format!("RequestContext {{ id: {} }}", request.id)
    } else {
        "<未知类型>".to_string()
    }
}

fn parse_overrides(args: &[String], fields: &[String]) -> anyhow::Result<Overrides> {
    let mut overrides = Overrides::new();
    for raw in args {
        let (key, value) = split_assignment(raw)?;
        let key = match key.parse::<usize>() {
            Ok(index) => ArgKey::Index(index),
            Err(_) => ArgKey::from(key),
        };
        overrides = overrides.arg(key, value);
    }
    for raw in fields {
        let (name, value) = split_assignment(raw)?;
        overrides = overrides.field(name, value);
    }
    Ok(overrides)
}

/// 解析 `键=JSON`，值不是合法 JSON 时按字符串处理
fn split_assignment(raw: &str) -> anyhow::Result<(&str, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("格式错误，应为 键=值: {}", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim(), value))
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
