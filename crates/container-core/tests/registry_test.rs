//! Bean 注册表的单元测试

use container_common::{
    BeanInstance, DefinitionError, LookupError, Scope, ScopeBinding, TypeInfo, WiringMode,
};
use std::any::TypeId;
use container_core::{
    BeanRegistry, ContainerConfig, InitMethodStrategy, ProviderTarget, PrototypeScope,
    SingletonScope,
};
use container_introspect::{CtorModel, FieldModel, MethodModel, ProviderSpec, TypeModel, TypeSchema};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Part {}

struct Engine;

impl TypeSchema for Engine {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>().with_ctor(CtorModel::new())
    }
}

struct Car;

impl TypeSchema for Car {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_ctor(CtorModel::new())
            .with_ctor(CtorModel::new().with_param(TypeInfo::of::<Engine>()))
            .with_field(
                FieldModel::new("parts", TypeInfo::of::<Vec<String>>())
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

struct PartInterface;

impl TypeSchema for PartInterface {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>().as_interface()
    }
}

struct NamedService;

impl TypeSchema for NamedService {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_bean_name("declared_name")
            .with_wiring(WiringMode::None)
            .with_ctor(CtorModel::new())
    }
}

struct SessionCache;

impl TypeSchema for SessionCache {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_scope(ScopeBinding::of::<PrototypeScope>())
            .with_ctor(CtorModel::new())
    }
}

struct Factory;

impl TypeSchema for Factory {
    fn type_model() -> TypeModel {
        TypeModel::of::<Self>()
            .with_ctor(CtorModel::new())
            .with_method(MethodModel::new("build").with_ret(TypeInfo::of::<Engine>()))
            .with_method(
                MethodModel::new("build_default")
                    .with_ret(TypeInfo::of::<Engine>())
                    .with_static(),
            )
            .with_provider(ProviderSpec::new("declared_provider", "build"))
    }
}

/// 记录清退次数的作用域替身
#[derive(Debug, Default)]
struct CountingScope {
    evictions: AtomicUsize,
}

impl Scope for CountingScope {
    fn retrieve(&self, _name: &str) -> Option<BeanInstance> {
        None
    }

    fn store(&self, _name: &str, _instance: BeanInstance) {}

    fn evict(&self, _name: &str) {
        self.evictions.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn register_with_policy_derived_name_and_defaults() {
    let registry = BeanRegistry::default();
    let definition = registry.register_bean::<Engine>().register().unwrap();

    assert_eq!(definition.name, "engine");
    assert_eq!(definition.wiring, WiringMode::Strict);
    assert!(definition.ctor.is_none());
    assert!(definition.properties.is_none());
    assert!(definition.init_methods.is_none());
    assert!(registry.is_bean_name_registered("engine"));
    assert_eq!(registry.total_beans(), 1);
    assert_eq!(registry.total_scopes(), 1);
}

#[test]
fn full_type_name_policy() {
    let registry = BeanRegistry::new(ContainerConfig::new().with_full_type_names(true));
    let definition = registry.register_bean::<Engine>().register().unwrap();

    assert!(definition.name.ends_with("::Engine"));
    assert_eq!(definition.name, registry.resolve_bean_name::<Engine>());
}

#[test]
fn type_declared_metadata_beats_policy() {
    let registry = BeanRegistry::default();
    let definition = registry.register_bean::<NamedService>().register().unwrap();

    assert_eq!(definition.name, "declared_name");
    assert_eq!(definition.wiring, WiringMode::None);

    // 显式实参仍然优先于类型声明
    let explicit = registry
        .register_bean::<NamedService>()
        .with_name("other")
        .with_wiring(WiringMode::Autowire)
        .register()
        .unwrap();
    assert_eq!(explicit.name, "other");
    assert_eq!(explicit.wiring, WiringMode::Autowire);
}

#[test]
fn type_declared_scope_is_used() {
    let registry = BeanRegistry::default();
    registry.register_bean::<SessionCache>().register().unwrap();

    // 类型声明的作用域优先于容器默认作用域
    assert!(registry
        .scope_registry()
        .lookup(TypeId::of::<PrototypeScope>())
        .is_some());
    assert!(registry
        .scope_registry()
        .lookup(TypeId::of::<SingletonScope>())
        .is_none());
}

#[test]
fn interface_registration_is_rejected() {
    let registry = BeanRegistry::default();
    let err = registry
        .register_bean::<PartInterface>()
        .register()
        .unwrap_err();

    assert!(matches!(err, DefinitionError::InterfaceNotAllowed { .. }));
    assert_eq!(registry.total_beans(), 0);
}

#[test]
fn duplicate_detection_fails_without_mutation() {
    let registry =
        BeanRegistry::new(ContainerConfig::new().with_detect_duplicated_bean_names(true));
    registry.register_bean::<Engine>().register().unwrap();

    let err = registry
        .register_bean::<Car>()
        .with_name("engine")
        .register()
        .unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicatedBeanName { .. }));

    // 既有定义未被改动
    let existing = registry.lookup_existing("engine").unwrap();
    assert_eq!(existing.type_info, TypeInfo::of::<Engine>());
}

#[test]
fn duplicate_replacement_evicts_prior_binding() {
    let registry = BeanRegistry::default();
    let counting = Arc::new(CountingScope::default());
    registry
        .scope_registry()
        .register::<SingletonScope>(counting.clone());

    registry.register_bean::<Engine>().register().unwrap();
    let replaced = registry
        .register_bean::<Car>()
        .with_name("engine")
        .register()
        .unwrap();

    assert_eq!(replaced.type_info, TypeInfo::of::<Car>());
    assert_eq!(registry.total_beans(), 1);
    // 替换时恰好清退一次旧绑定
    assert_eq!(counting.evictions.load(Ordering::SeqCst), 1);
}

#[test]
fn remove_unknown_bean_has_no_side_effects() {
    let registry = BeanRegistry::default();
    let counting = Arc::new(CountingScope::default());
    registry
        .scope_registry()
        .register::<SingletonScope>(counting.clone());

    assert!(registry.remove_bean("ghost").is_none());
    assert_eq!(counting.evictions.load(Ordering::SeqCst), 0);
}

#[test]
fn remove_known_bean_evicts_exactly_once() {
    let registry = BeanRegistry::default();
    let counting = Arc::new(CountingScope::default());
    registry
        .scope_registry()
        .register::<SingletonScope>(counting.clone());

    registry.register_bean::<Engine>().register().unwrap();
    let removed = registry.remove_bean("engine").expect("被移除的定义");

    assert_eq!(removed.name, "engine");
    assert_eq!(counting.evictions.load(Ordering::SeqCst), 1);
    assert!(!registry.is_bean_name_registered("engine"));
}

#[test]
fn remove_beans_of_type_is_exact() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Engine>().register().unwrap();
    registry
        .register_bean::<Engine>()
        .with_name("spare_engine")
        .register()
        .unwrap();
    registry.register_bean::<SteelPart>().register().unwrap();

    registry.remove_beans_of_type(&TypeInfo::of::<Engine>());

    assert!(!registry.is_bean_name_registered("engine"));
    assert!(!registry.is_bean_name_registered("spare_engine"));
    assert!(registry.is_bean_name_registered("steel_part"));
}

#[test]
fn bean_names_for_type_in_registration_order() {
    let registry = BeanRegistry::default();
    registry.register_bean::<SteelPart>().register().unwrap();
    registry.register_bean::<PlasticPart>().register().unwrap();

    let names = registry.bean_names_for_type(&TypeInfo::of::<dyn Part>());
    assert_eq!(names.as_ref(), ["steel_part", "plastic_part"]);
}

#[test]
fn bean_names_for_type_stays_fresh_after_mutation() {
    let registry = BeanRegistry::default();
    registry.register_bean::<SteelPart>().register().unwrap();

    let before = registry.bean_names_for_type(&TypeInfo::of::<dyn Part>());
    assert_eq!(before.as_ref(), ["steel_part"]);

    // 后续注册必须反映在索引里
    registry.register_bean::<PlasticPart>().register().unwrap();
    let after = registry.bean_names_for_type(&TypeInfo::of::<dyn Part>());
    assert_eq!(after.as_ref(), ["steel_part", "plastic_part"]);

    // 移除同样生效
    registry.remove_bean("steel_part");
    let final_names = registry.bean_names_for_type(&TypeInfo::of::<dyn Part>());
    assert_eq!(final_names.as_ref(), ["plastic_part"]);
}

#[test]
fn define_closes_injection_points() {
    let registry = BeanRegistry::default();
    let definition = registry
        .register_bean::<Engine>()
        .define()
        .register()
        .unwrap();

    // 构造函数已自动解析，其余注入点为显式空标记
    assert!(definition.ctor.is_some());
    assert_eq!(definition.properties.as_deref().map(<[_]>::len), Some(0));
    assert_eq!(definition.methods.as_deref().map(<[_]>::len), Some(0));
    assert_eq!(definition.init_methods.as_deref().map(<[_]>::len), Some(0));
    assert_eq!(definition.sets.as_deref().map(<[_]>::len), Some(0));
}

#[test]
fn injection_point_registration_requires_existing_bean() {
    let registry = BeanRegistry::default();
    let err = registry
        .register_property_injection_point("ghost", "field", None)
        .unwrap_err();

    assert!(matches!(
        err,
        container_common::ContainerError::Lookup {
            source: LookupError::BeanNotFound { .. }
        }
    ));
}

#[test]
fn ctor_injection_point_attaches() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Car>().register().unwrap();
    registry
        .register_ctor_injection_point(
            "car",
            Some(&[TypeInfo::of::<Engine>()]),
            Some(&["engine"]),
        )
        .unwrap();

    let definition = registry.lookup_existing("car").unwrap();
    let ctor = definition.ctor.expect("构造函数注入点");
    assert_eq!(ctor.references, vec![vec!["engine".to_string()]]);
}

#[test]
fn method_injection_point_attaches() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Factory>().register().unwrap();
    registry
        .register_method_injection_point("factory", "build", None, None)
        .unwrap();

    let definition = registry.lookup_existing("factory").unwrap();
    assert_eq!(definition.methods.as_deref().map(<[_]>::len), Some(1));
}

#[test]
fn init_method_ordinals_accumulate_across_calls() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Factory>().register().unwrap();
    registry
        .register_init_methods("factory", InitMethodStrategy::PostConstruct, &["build"])
        .unwrap();
    registry
        .register_init_methods("factory", InitMethodStrategy::PostDefine, &["build"])
        .unwrap();

    let definition = registry.lookup_existing("factory").unwrap();
    let points = definition.init_methods.expect("初始化方法调用点");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].ordinal, 0);
    assert_eq!(points[1].ordinal, 1);
    assert_eq!(points[1].strategy, InitMethodStrategy::PostDefine);
}

#[test]
fn declared_providers_register_with_bean() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Factory>().register().unwrap();

    let provider = registry
        .lookup_provider("declared_provider")
        .expect("类型声明的提供者");
    match provider.target {
        ProviderTarget::InstanceMethod { bean, method } => {
            assert_eq!(bean, "factory");
            assert_eq!(method.name, "build");
        }
        ProviderTarget::StaticMethod { .. } => panic!("期望实例方法提供者"),
    }
}

#[test]
fn instance_provider_requires_existing_bean_and_method() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Factory>().register().unwrap();

    registry
        .register_instance_provider("p1", "factory", "build", None)
        .unwrap();
    let provider = registry.lookup_provider("p1").unwrap();
    assert!(matches!(
        provider.target,
        ProviderTarget::InstanceMethod { .. }
    ));

    let err = registry
        .register_instance_provider("p2", "factory", "missing", None)
        .unwrap_err();
    assert!(matches!(
        err,
        container_common::ContainerError::Definition {
            source: DefinitionError::ProviderMethodNotFound { .. }
        }
    ));
}

#[test]
fn static_provider_targets_static_method() {
    let registry = BeanRegistry::default();
    registry
        .register_static_provider::<Factory>("builder", "build_default", None)
        .unwrap();

    let provider = registry.lookup_provider("builder").unwrap();
    match provider.target {
        ProviderTarget::StaticMethod { type_info, method } => {
            assert_eq!(type_info, TypeInfo::of::<Factory>());
            assert!(method.is_static);
        }
        ProviderTarget::InstanceMethod { .. } => panic!("期望静态方法提供者"),
    }
}

#[test]
fn prototype_scope_beans_share_scope_instance() {
    let registry = BeanRegistry::default();
    let a = registry
        .register_bean::<Engine>()
        .with_scope::<PrototypeScope>()
        .register()
        .unwrap();
    let b = registry
        .register_bean::<Car>()
        .with_scope::<PrototypeScope>()
        .register()
        .unwrap();

    assert!(Arc::ptr_eq(&a.scope, &b.scope));
    assert_eq!(registry.total_scopes(), 1);
}

#[test]
fn lookup_first_follows_priority_order() {
    let registry = BeanRegistry::default();
    registry.register_bean::<Engine>().register().unwrap();

    let found = registry
        .lookup_first(&["missing", "engine", "car"])
        .expect("第一个存在的定义");
    assert_eq!(found.name, "engine");
    assert!(registry.lookup_first(&["a", "b"]).is_none());
}

#[test]
fn bean_names_follow_registration_order() {
    let registry = BeanRegistry::default();
    registry.register_bean::<PlasticPart>().register().unwrap();
    registry.register_bean::<Engine>().register().unwrap();
    registry.register_bean::<SteelPart>().register().unwrap();

    assert_eq!(
        registry.bean_names(),
        ["plastic_part", "engine", "steel_part"]
    );
}

#[test]
fn parameters_round_trip() {
    let registry = BeanRegistry::default();
    registry.define_parameter("engine.fuel", "diesel");
    registry.define_parameters(vec![(
        "engine.power".to_string(),
        serde_json::Value::from(300),
    )]);

    assert_eq!(
        registry.parameter("engine.fuel"),
        Some(serde_json::Value::from("diesel"))
    );
    assert_eq!(
        registry.resolve_bean_params("engine"),
        ["engine.fuel", "engine.power"]
    );
}
