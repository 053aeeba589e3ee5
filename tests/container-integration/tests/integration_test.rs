//! 定义层的端到端集成测试
//!
//! 覆盖完整的注册流程：注册 bean、登记注入点、注册提供者、
//! 按类型解析名称集合，以及参数解析

use container_common::{DefinitionError, TypeInfo, WiringMode};
use container_core::{
    BeanRegistry, ContainerConfig, InitMethodStrategy, ProviderTarget, SingletonScope,
};
use container_introspect::{
    CtorModel, FieldModel, MethodModel, TypeModel, TypeSchema,
};
use serde_json::Value;
use std::any::TypeId;

// 示例领域模型

trait Part {}

struct Engine;

impl TypeSchema for Engine {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_ctor(CtorModel::new())
            .with_method(MethodModel::new("warm_up"))
    }
}

struct Car;

impl TypeSchema for Car {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_ctor(CtorModel::new())
            .with_ctor(CtorModel::new().with_param(TypeInfo::of::<Engine>()))
            .with_field(FieldModel::new("engine", TypeInfo::of::<Engine>()))
            .with_field(
                FieldModel::new("parts", TypeInfo::of::<Vec<Box<dyn Part>>>())
                    .with_element(TypeInfo::of::<dyn Part>()),
            )
    }
}

struct SteelPart;

impl Part for SteelPart {}

impl TypeSchema for SteelPart {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .assignable_to(TypeInfo::of::<dyn Part>())
            .with_ctor(CtorModel::new())
    }
}

struct PlasticPart;

impl Part for PlasticPart {}

impl TypeSchema for PlasticPart {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .assignable_to(TypeInfo::of::<dyn Part>())
            .with_ctor(CtorModel::new())
    }
}

struct CarFactory;

impl TypeSchema for CarFactory {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_bean_name("factory")
            .with_ctor(CtorModel::new())
            .with_method(MethodModel::new("build").with_ret(TypeInfo::of::<Car>()))
    }
}

/// 场景 A：无显式名称注册具体类型
///
/// 名称按策略推导，作用域为配置的默认作用域，无任何注入点
#[test]
fn scenario_a_plain_registration() {
    let registry = BeanRegistry::default();
    let definition = registry.register_bean::<Engine>().register().unwrap();

    assert_eq!(definition.name, "engine");
    assert_eq!(definition.wiring, WiringMode::Strict);
    assert!(definition.ctor.is_none());
    assert!(definition.properties.is_none());
    assert!(definition.sets.is_none());
    assert!(definition.methods.is_none());
    assert!(definition.init_methods.is_none());

    // 默认作用域已被解析并登记
    assert!(registry
        .scope_registry()
        .lookup(TypeId::of::<SingletonScope>())
        .is_some());
}

/// 场景 B：两个构造函数、省略提示
///
/// 构造函数没有名称，多于一个即歧义错误
#[test]
fn scenario_b_ctor_ambiguity() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Car>().register().unwrap();

    let err = registry
        .register_ctor_injection_point("car", None, None)
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("2 个可用的构造函数注入点"));
}

/// 场景 C：集合注入与按类型的名称解析
///
/// 集合元素按类型可赋值性在全量注册表上解析，结果为注册顺序
#[test]
fn scenario_c_set_injection_over_implementors() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Car>().with_name("x").register().unwrap();
    registry
        .register_set_injection_point("x", "parts")
        .unwrap();

    registry.register_bean::<SteelPart>().register().unwrap();
    registry.register_bean::<PlasticPart>().register().unwrap();

    let definition = registry.lookup_existing("x").unwrap();
    let sets = definition.sets.expect("集合注入点");
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].element, TypeInfo::of::<dyn Part>());

    // 实例化引擎稍后按元素类型解析出全部实现者
    let names = registry.bean_names_for_type(&sets[0].element);
    assert_eq!(names.as_ref(), ["steel_part", "plastic_part"]);
}

/// 场景 D：实例方法提供者
#[test]
fn scenario_d_instance_provider() {
    let registry = BeanRegistry::default();
    registry.register_bean::<CarFactory>().register().unwrap();

    registry
        .register_instance_provider("p1", "factory", "build", None)
        .unwrap();

    let provider = registry.lookup_provider("p1").expect("提供者定义");
    assert_eq!(provider.name, "p1");
    match provider.target {
        ProviderTarget::InstanceMethod { bean, method } => {
            assert_eq!(bean, "factory");
            assert_eq!(method.name, "build");
        }
        ProviderTarget::StaticMethod { .. } => panic!("期望实例方法提供者"),
    }
}

/// 完整连线流程：构造函数 + 属性 + 集合 + 初始化方法
#[test]
fn full_wiring_plan() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Engine>().register().unwrap();
    registry.register_bean::<Car>().register().unwrap();

    registry
        .register_ctor_injection_point("car", Some(&[TypeInfo::of::<Engine>()]), None)
        .unwrap();
    registry
        .register_property_injection_point("car", "engine", Some("engine"))
        .unwrap();
    registry.register_set_injection_point("car", "parts").unwrap();
    registry
        .register_init_methods("engine", InitMethodStrategy::PostDefine, &["warm_up"])
        .unwrap();

    let car = registry.lookup_existing("car").unwrap();
    let ctor = car.ctor.expect("构造函数注入点");
    assert_eq!(ctor.references, vec![vec!["engine".to_string()]]);
    assert_eq!(car.properties.as_deref().map(<[_]>::len), Some(1));
    assert_eq!(car.sets.as_deref().map(<[_]>::len), Some(1));

    let engine = registry.lookup_existing("engine").unwrap();
    let init = engine.init_methods.expect("初始化方法调用点");
    assert_eq!(init.len(), 1);
    assert_eq!(init[0].strategy, InitMethodStrategy::PostDefine);
    assert_eq!(init[0].ordinal, 0);
}

/// 类型到名称的索引在后续注册/移除后必须保持正确
#[test]
fn type_index_freshness_guarantee() {
    let registry = BeanRegistry::default();
    registry.register_bean::<SteelPart>().register().unwrap();

    assert_eq!(
        registry
            .bean_names_for_type(&TypeInfo::of::<dyn Part>())
            .as_ref(),
        ["steel_part"]
    );

    registry.register_bean::<PlasticPart>().register().unwrap();
    assert_eq!(
        registry
            .bean_names_for_type(&TypeInfo::of::<dyn Part>())
            .as_ref(),
        ["steel_part", "plastic_part"]
    );

    registry.remove_bean("plastic_part");
    assert_eq!(
        registry
            .bean_names_for_type(&TypeInfo::of::<dyn Part>())
            .as_ref(),
        ["steel_part"]
    );
}

/// 重复注册：检测策略失败且不改动既有定义；替换策略完整替换
#[test]
fn duplicate_policies_end_to_end() {
    // 检测策略
    let detecting =
        BeanRegistry::new(ContainerConfig::new().with_detect_duplicated_bean_names(true));
    detecting.register_bean::<Engine>().register().unwrap();
    let err = detecting
        .register_bean::<Car>()
        .with_name("engine")
        .register()
        .unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicatedBeanName { .. }));
    assert_eq!(
        detecting.lookup_existing("engine").unwrap().type_info,
        TypeInfo::of::<Engine>()
    );

    // 替换策略
    let replacing = BeanRegistry::default();
    replacing.register_bean::<Engine>().register().unwrap();
    let replaced = replacing
        .register_bean::<Car>()
        .with_name("engine")
        .register()
        .unwrap();
    assert_eq!(replaced.type_info, TypeInfo::of::<Car>());
    assert_eq!(replacing.total_beans(), 1);
}

/// 参数定义与引用插值贯通定义层
#[test]
fn parameters_with_reference_interpolation() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Car>().register().unwrap();

    registry.define_parameter("garage.city", "Rotterdam");
    registry.define_parameter("car.plate", "WC-01");
    registry.define_parameter("car.home", "garage of ${garage.city}");

    let keys = registry.resolve_bean_params("car");
    assert_eq!(keys, ["car.home", "car.plate"]);
    assert_eq!(
        registry.parameter("car.home"),
        Some(Value::from("garage of Rotterdam"))
    );
}

/// 类型声明的 bean 名称参与注册与提供者绑定
#[test]
fn declared_bean_name_is_used() {
    let registry = BeanRegistry::default();
    let definition = registry.register_bean::<CarFactory>().register().unwrap();

    assert_eq!(definition.name, "factory");
    assert_eq!(registry.resolve_bean_name::<CarFactory>(), "factory");
}
