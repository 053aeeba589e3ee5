//! 作用域与作用域注册表的单元测试

use container_common::{BeanInstance, Scope, ScopeBinding, ScopeFactory};
use container_core::{PrototypeScope, ScopeRegistry, SingletonScope};
use std::any::TypeId;
use std::sync::Arc;

#[derive(Debug)]
struct RecordingScope;

impl Scope for RecordingScope {
    fn retrieve(&self, _name: &str) -> Option<BeanInstance> {
        None
    }

    fn store(&self, _name: &str, _instance: BeanInstance) {}

    fn evict(&self, _name: &str) {}
}

#[test]
fn resolve_creates_once_per_kind() {
    let registry = ScopeRegistry::new();
    let binding = ScopeBinding::of::<SingletonScope>();

    let first = registry.resolve(&binding).unwrap();
    let second = registry.resolve(&binding).unwrap();

    // 同一种类共享同一个实例
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.total_scopes(), 1);
}

#[test]
fn distinct_kinds_get_distinct_instances() {
    let registry = ScopeRegistry::new();
    registry.resolve(&ScopeBinding::of::<SingletonScope>()).unwrap();
    registry.resolve(&ScopeBinding::of::<PrototypeScope>()).unwrap();

    assert_eq!(registry.total_scopes(), 2);
}

#[test]
fn substitution_affects_later_resolves_only() {
    let registry = ScopeRegistry::new();
    let binding = ScopeBinding::of::<SingletonScope>();
    let original = registry.resolve(&binding).unwrap();

    // 以测试替身替换种类实现
    registry.register::<SingletonScope>(Arc::new(RecordingScope));
    let replaced = registry.resolve(&binding).unwrap();

    assert!(!Arc::ptr_eq(&original, &replaced));
    assert!(registry
        .lookup(TypeId::of::<SingletonScope>())
        .map_or(false, |scope| Arc::ptr_eq(&scope, &replaced)));
}

#[test]
fn registered_scope_carries_diagnostics() {
    let registry = ScopeRegistry::new();
    let binding = ScopeBinding::of::<SingletonScope>();
    registry.resolve(&binding).unwrap();

    assert!(registry.registered_at(binding.kind()).is_some());
    assert!(registry.scope_id(binding.kind()).is_some());
}

#[test]
fn singleton_scope_stores_and_evicts() {
    let scope = SingletonScope::create().unwrap();
    let instance: BeanInstance = Arc::new(42_u32);

    scope.store("answer", instance);
    assert!(scope.retrieve("answer").is_some());
    assert_eq!(scope.total_instances(), 1);

    scope.evict("answer");
    assert!(scope.retrieve("answer").is_none());
    assert_eq!(scope.total_instances(), 0);
}

#[test]
fn prototype_scope_never_hits() {
    let scope = PrototypeScope::create().unwrap();
    scope.store("anything", Arc::new(1_u8));

    assert!(scope.retrieve("anything").is_none());
}
