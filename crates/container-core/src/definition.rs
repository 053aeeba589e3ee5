//! Bean 定义与注入点
//!
//! Bean 定义是定义层的最终产物：一份经过注册期校验的连线计划。
//! 定义由注册调用创建，由后续的注入点注册调用原地追加，
//! 移除时通知所属作用域清退对应的存活实例

use container_common::{Scope, TypeInfo, WiringMode};
use container_introspect::{CtorDescriptor, FieldDescriptor, MethodDescriptor};
use std::sync::Arc;

/// 构造函数注入点
#[derive(Debug, Clone)]
pub struct CtorInjectionPoint {
    /// 目标构造函数
    pub ctor: CtorDescriptor,
    /// 每个参数的候选引用名称，按优先级排列，
    /// 由实例化引擎在实例化时依次尝试
    pub references: Vec<Vec<String>>,
}

/// 属性注入点
#[derive(Debug, Clone)]
pub struct PropertyInjectionPoint {
    /// 目标字段
    pub field: FieldDescriptor,
    /// 候选引用名称，按优先级排列
    pub references: Vec<String>,
}

/// 集合注入点
///
/// 不携带引用：实例化引擎按元素类型在全量注册表上动态解析
#[derive(Debug, Clone)]
pub struct SetInjectionPoint {
    /// 目标集合字段
    pub field: FieldDescriptor,
    /// 集合元素类型
    pub element: TypeInfo,
}

/// 方法注入点
#[derive(Debug, Clone)]
pub struct MethodInjectionPoint {
    /// 目标方法
    pub method: MethodDescriptor,
    /// 每个参数的候选引用名称，按优先级排列
    pub references: Vec<Vec<String>>,
}

/// 初始化方法调用时机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitMethodStrategy {
    /// 构造完成后、注入前
    PostConstruct,
    /// 注入完成后
    PostDefine,
    /// 参数填充完成后
    PostInitialize,
}

/// 初始化方法调用点
#[derive(Debug, Clone)]
pub struct InitMethodPoint {
    /// 目标方法（无参）
    pub method: MethodDescriptor,
    /// 执行序号，保证确定性的执行顺序
    pub ordinal: usize,
    /// 调用时机
    pub strategy: InitMethodStrategy,
}

/// Bean 定义
///
/// 注入点集合的 `None` 表示留待自动解析，
/// 空集合是"已定义、无需连线"的显式空标记
#[derive(Debug, Clone)]
pub struct BeanDefinition {
    /// bean 名称，注册表内唯一
    pub name: String,
    /// 具体实现类型（不允许接口）
    pub type_info: TypeInfo,
    /// 所属作用域实例
    pub scope: Arc<dyn Scope>,
    /// 连线模式
    pub wiring: WiringMode,
    /// 构造函数注入点（至多一个）
    pub ctor: Option<CtorInjectionPoint>,
    /// 属性注入点
    pub properties: Option<Vec<PropertyInjectionPoint>>,
    /// 集合注入点
    pub sets: Option<Vec<SetInjectionPoint>>,
    /// 方法注入点
    pub methods: Option<Vec<MethodInjectionPoint>>,
    /// 初始化方法调用点
    pub init_methods: Option<Vec<InitMethodPoint>>,
    pub(crate) ordinal: u64,
}

impl BeanDefinition {
    pub(crate) fn new(
        name: String,
        type_info: TypeInfo,
        scope: Arc<dyn Scope>,
        wiring: WiringMode,
        ordinal: u64,
    ) -> Self {
        Self {
            name,
            type_info,
            scope,
            wiring,
            ctor: None,
            properties: None,
            sets: None,
            methods: None,
            init_methods: None,
            ordinal,
        }
    }

    /// 追加属性注入点
    pub fn add_property_injection_point(&mut self, point: PropertyInjectionPoint) {
        self.properties.get_or_insert_with(Vec::new).push(point);
    }

    /// 追加集合注入点
    pub fn add_set_injection_point(&mut self, point: SetInjectionPoint) {
        self.sets.get_or_insert_with(Vec::new).push(point);
    }

    /// 追加方法注入点
    pub fn add_method_injection_point(&mut self, point: MethodInjectionPoint) {
        self.methods.get_or_insert_with(Vec::new).push(point);
    }

    /// 追加初始化方法调用点
    pub fn add_init_method_points(&mut self, points: Vec<InitMethodPoint>) {
        self.init_methods.get_or_insert_with(Vec::new).extend(points);
    }

    /// 已登记的初始化方法数量
    pub fn init_method_count(&self) -> usize {
        self.init_methods.as_ref().map_or(0, Vec::len)
    }

    /// 通知所属作用域清退本定义的存活实例
    pub fn scope_evict(&self) {
        self.scope.evict(&self.name);
    }
}
