//! 作用域抽象
//!
//! 作用域按"作用域种类"共享：同一种类在容器内只有一个共享实例，
//! 由该种类下注册的全部 bean 定义复用。容器核心只负责作用域实例的
//! 创建、登记与查找，存储策略由具体实现决定

use crate::errors::{DefinitionError, DefinitionResult};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Bean 实例的不透明载体
pub type BeanInstance = Arc<dyn Any + Send + Sync>;

/// 作用域 trait
///
/// 实例的存取与清退由外部的实例化引擎调用；
/// 定义层自身只在移除 bean 时触发清退
pub trait Scope: Send + Sync + fmt::Debug {
    /// 按 bean 名称取出存活实例
    fn retrieve(&self, name: &str) -> Option<BeanInstance>;

    /// 存入实例
    fn store(&self, name: &str, instance: BeanInstance);

    /// 清退实例
    fn evict(&self, name: &str);
}

/// 作用域构造能力
pub trait ScopeFactory: Scope + Sized {
    /// 创建新的作用域实例
    fn create() -> DefinitionResult<Self>;
}

/// 作用域种类绑定
///
/// 以值的形式携带作用域种类标识与构造能力，
/// 供注册请求与容器配置传递作用域种类
#[derive(Clone)]
pub struct ScopeBinding {
    kind: TypeId,
    kind_name: &'static str,
    create: fn() -> DefinitionResult<Arc<dyn Scope>>,
}

impl ScopeBinding {
    /// 绑定指定种类的作用域
    pub fn of<S: ScopeFactory + 'static>() -> Self {
        fn build<S: ScopeFactory + 'static>() -> DefinitionResult<Arc<dyn Scope>> {
            Ok(Arc::new(S::create()?))
        }
        Self {
            kind: TypeId::of::<S>(),
            kind_name: std::any::type_name::<S>(),
            create: build::<S>,
        }
    }

    /// 作用域种类标识
    pub fn kind(&self) -> TypeId {
        self.kind
    }

    /// 作用域种类名称
    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    /// 调用构造能力创建作用域实例
    pub fn instantiate(&self) -> DefinitionResult<Arc<dyn Scope>> {
        (self.create)().map_err(|e| DefinitionError::ScopeCreationFailed {
            scope_name: self.kind_name.to_string(),
            message: e.to_string(),
        })
    }
}

impl fmt::Debug for ScopeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeBinding")
            .field("kind_name", &self.kind_name)
            .finish()
    }
}
