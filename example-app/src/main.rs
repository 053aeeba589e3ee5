//! # 示例应用程序
//!
//! 演示如何使用 Wirecore 定义层注册 bean、登记注入点并查询连线计划

use clap::Parser;
use container_common::{TypeInfo, WiringMode};
use container_core::{BeanRegistry, ContainerConfig, InitMethodStrategy, PrototypeScope};
use container_introspect::{
    CtorModel, FieldModel, MethodModel, ProviderSpec, TypeModel, TypeSchema,
};
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Wirecore 示例应用")]
struct Args {
    /// 是否使用完整类型名作为默认 bean 名称
    #[arg(long)]
    full_type_names: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(parse_log_level(&args.log_level))
        .init();

    info!("启动 Wirecore 示例应用");

    let config = ContainerConfig::new().with_full_type_names(args.full_type_names);
    let registry = BeanRegistry::new(config);

    // 注册零件 bean，演示集合注入的元素来源
    registry.register_bean::<SteelPart>().register()?;
    registry.register_bean::<PlasticPart>().register()?;

    // 注册引擎并声明初始化方法
    let engine = registry.register_bean::<Engine>().register()?;
    info!(bean = %engine.name, "注册引擎完成");
    registry.register_init_methods(&engine.name, InitMethodStrategy::PostDefine, &["warm_up"])?;

    // 注册整车：构造函数注入 + 集合注入
    let car = registry
        .register_bean::<Car>()
        .with_name("car")
        .with_wiring(WiringMode::Strict)
        .register()?;
    registry.register_ctor_injection_point(
        &car.name,
        Some(&[TypeInfo::of::<Engine>()]),
        Some(&["engine"]),
    )?;
    registry.register_set_injection_point(&car.name, "parts")?;

    // 注册工厂与实例方法提供者
    registry.register_bean::<CarFactory>().register()?;
    registry.register_instance_provider("spare_car", "car_factory", "build", None)?;

    // 注册原型作用域 bean
    registry
        .register_bean::<Inspection>()
        .with_scope::<PrototypeScope>()
        .register()?;

    // 定义参数并演示引用插值
    registry.define_parameter("garage.city", "Rotterdam");
    registry.define_parameter("car.plate", "WC-01");
    registry.define_parameter("car.home", "garage of ${garage.city}");
    let params = registry.resolve_bean_params("car");
    info!(?params, "car 的参数键");
    info!(home = ?registry.parameter("car.home"), "插值结果");

    // 查询连线计划
    let definition = registry.lookup_existing("car")?;
    info!(
        ctor = definition.ctor.is_some(),
        sets = definition.sets.as_ref().map_or(0, Vec::len),
        "car 的连线计划"
    );

    let part_beans = registry.bean_names_for_type(&TypeInfo::of::<dyn Part>());
    info!(?part_beans, "可赋值到 Part 的 bean");

    info!(
        beans = registry.total_beans(),
        scopes = registry.total_scopes(),
        providers = registry.total_providers(),
        "注册表统计"
    );

    Ok(())
}

/// 解析日志级别
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

// 示例组件

/// 零件抽象
trait Part {}

/// 钢制零件
struct SteelPart;

impl Part for SteelPart {}

impl TypeSchema for SteelPart {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .assignable_to(TypeInfo::of::<dyn Part>())
            .with_ctor(CtorModel::new())
    }
}

/// 塑料零件
struct PlasticPart;

impl Part for PlasticPart {}

impl TypeSchema for PlasticPart {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .assignable_to(TypeInfo::of::<dyn Part>())
            .with_ctor(CtorModel::new())
    }
}

/// 引擎
struct Engine;

impl Engine {
    #[allow(dead_code)]
    fn warm_up(&self) {}
}

impl TypeSchema for Engine {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_ctor(CtorModel::new())
            .with_method(MethodModel::new("warm_up"))
    }
}

/// 整车
struct Car {
    #[allow(dead_code)]
    engine: Engine,
    #[allow(dead_code)]
    parts: Vec<Box<dyn Part>>,
}

impl TypeSchema for Car {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_field(FieldModel::new("engine", TypeInfo::of::<Engine>()))
            .with_field(
                FieldModel::new("parts", TypeInfo::of::<Vec<Box<dyn Part>>>())
                    .with_element(TypeInfo::of::<dyn Part>()),
            )
            .with_ctor(CtorModel::new().with_param(TypeInfo::of::<Engine>()))
    }
}

/// 整车工厂
struct CarFactory;

impl CarFactory {
    #[allow(dead_code)]
    fn build(&self) -> Car {
        Car {
            engine: Engine,
            parts: Vec::new(),
        }
    }
}

impl TypeSchema for CarFactory {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_ctor(CtorModel::new())
            .with_method(MethodModel::new("build").with_ret(TypeInfo::of::<Car>()))
            .with_provider(ProviderSpec::new("factory_car", "build"))
    }
}

/// 质检单
struct Inspection;

impl TypeSchema for Inspection {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>().with_ctor(CtorModel::new())
    }
}
