//! 作用域实现与作用域注册表

use chrono::{DateTime, Utc};
use container_common::{BeanInstance, DefinitionResult, Scope, ScopeBinding, ScopeFactory};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// 单例作用域
///
/// 每个 bean 定义至多持有一个存活实例
#[derive(Default)]
pub struct SingletonScope {
    instances: DashMap<String, BeanInstance>,
}

impl SingletonScope {
    /// 创建新的单例作用域
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前存活实例数量
    pub fn total_instances(&self) -> usize {
        self.instances.len()
    }
}

impl fmt::Debug for SingletonScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonScope")
            .field("instances", &self.instances.len())
            .finish()
    }
}

impl Scope for SingletonScope {
    fn retrieve(&self, name: &str) -> Option<BeanInstance> {
        self.instances.get(name).map(|entry| entry.clone())
    }

    fn store(&self, name: &str, instance: BeanInstance) {
        self.instances.insert(name.to_string(), instance);
    }

    fn evict(&self, name: &str) {
        self.instances.remove(name);
    }
}

impl ScopeFactory for SingletonScope {
    fn create() -> DefinitionResult<Self> {
        Ok(Self::new())
    }
}

/// 原型作用域
///
/// 不保存任何实例，每次取出都为未命中
#[derive(Debug, Default)]
pub struct PrototypeScope;

impl PrototypeScope {
    /// 创建新的原型作用域
    pub fn new() -> Self {
        Self
    }
}

impl Scope for PrototypeScope {
    fn retrieve(&self, _name: &str) -> Option<BeanInstance> {
        None
    }

    fn store(&self, _name: &str, _instance: BeanInstance) {}

    fn evict(&self, _name: &str) {}
}

impl ScopeFactory for PrototypeScope {
    fn create() -> DefinitionResult<Self> {
        Ok(Self::new())
    }
}

/// 作用域注册条目
#[derive(Debug, Clone)]
struct ScopeEntry {
    scope: Arc<dyn Scope>,
    /// 诊断标识
    id: Uuid,
    registered_at: DateTime<Utc>,
}

impl ScopeEntry {
    fn new(scope: Arc<dyn Scope>) -> Self {
        Self {
            scope,
            id: Uuid::new_v4(),
            registered_at: Utc::now(),
        }
    }
}

/// 作用域注册表
///
/// 按作用域种类登记共享实例，首次解析时惰性创建。
/// 创建使用原子的"不存在则创建"原语，并发首次解析同一种类时
/// 只会产生一个实例
#[derive(Debug, Default)]
pub struct ScopeRegistry {
    scopes: DashMap<TypeId, ScopeEntry>,
}

impl ScopeRegistry {
    /// 创建新的作用域注册表
    pub fn new() -> Self {
        Self {
            scopes: DashMap::new(),
        }
    }

    /// 解析（必要时创建并登记）作用域实例
    pub fn resolve(&self, binding: &ScopeBinding) -> DefinitionResult<Arc<dyn Scope>> {
        match self.scopes.entry(binding.kind()) {
            Entry::Occupied(entry) => Ok(entry.get().scope.clone()),
            Entry::Vacant(vacant) => {
                let scope = binding.instantiate()?;
                debug!(scope = binding.kind_name(), "创建作用域");
                vacant.insert(ScopeEntry::new(scope.clone()));
                Ok(scope)
            }
        }
    }

    /// 登记或替换作用域实例
    ///
    /// 作用域在首次解析时自动登记，无需手工调用；手工登记用于
    /// 预先注册或替换实现（例如测试替身）。替换只影响后续的解析，
    /// 已经持有旧实例的 bean 定义不受影响
    pub fn register<K: Scope + 'static>(&self, scope: Arc<dyn Scope>) {
        let replaced = self
            .scopes
            .insert(TypeId::of::<K>(), ScopeEntry::new(scope))
            .is_some();
        if replaced {
            warn!(scope = std::any::type_name::<K>(), "替换已登记的作用域");
        }
    }

    /// 按种类查找已登记的作用域
    pub fn lookup(&self, kind: TypeId) -> Option<Arc<dyn Scope>> {
        self.scopes.get(&kind).map(|entry| entry.scope.clone())
    }

    /// 查询作用域的登记时间（诊断用途）
    pub fn registered_at(&self, kind: TypeId) -> Option<DateTime<Utc>> {
        self.scopes.get(&kind).map(|entry| entry.registered_at)
    }

    /// 查询作用域的诊断标识
    pub fn scope_id(&self, kind: TypeId) -> Option<Uuid> {
        self.scopes.get(&kind).map(|entry| entry.id)
    }

    /// 已登记的作用域数量
    pub fn total_scopes(&self) -> usize {
        self.scopes.len()
    }
}
