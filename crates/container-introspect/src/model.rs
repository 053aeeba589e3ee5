//! 类型结构模型定义
//!
//! 结构模型是注册期提供的元数据表，描述一个类型的字段、方法与
//! 构造函数，以及注册相关的声明（bean 名称、作用域、连线模式、
//! 提供者）。模型一经提交便视为不可变

use container_common::{ScopeBinding, TypeInfo, WiringMode};

/// 成员可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// 公开成员
    Public,
    /// 非公开成员
    Private,
}

impl Visibility {
    /// 是否公开
    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

/// 类型形态分类
///
/// 分类标志的唯一来源；集合形态的判定在描述符构建时完成一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeShape {
    /// 普通类型
    #[default]
    Plain,
    /// 数组
    Array,
    /// 列表
    List,
    /// 集合（去重）
    Set,
    /// 映射
    Map,
}

/// 字段结构模型
#[derive(Debug, Clone)]
pub struct FieldModel {
    /// 字段名称
    pub name: String,
    /// 字段类型
    pub type_info: TypeInfo,
    /// 集合字段的元素类型，非集合字段为 None
    pub element: Option<TypeInfo>,
    /// 可见性
    pub visibility: Visibility,
}

impl FieldModel {
    /// 创建新的字段模型
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        Self {
            name: name.into(),
            type_info,
            element: None,
            visibility: Visibility::Public,
        }
    }

    /// 声明集合元素类型
    pub fn with_element(mut self, element: TypeInfo) -> Self {
        self.element = Some(element);
        self
    }

    /// 设置可见性
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// 方法结构模型
#[derive(Debug, Clone)]
pub struct MethodModel {
    /// 方法名称
    pub name: String,
    /// 参数类型列表
    pub params: Vec<TypeInfo>,
    /// 返回类型，None 表示无返回值
    pub ret: Option<TypeInfo>,
    /// 可见性
    pub visibility: Visibility,
    /// 是否为静态（关联）方法
    pub is_static: bool,
}

impl MethodModel {
    /// 创建新的方法模型
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    /// 追加参数类型
    pub fn with_param(mut self, param: TypeInfo) -> Self {
        self.params.push(param);
        self
    }

    /// 设置返回类型
    pub fn with_ret(mut self, ret: TypeInfo) -> Self {
        self.ret = Some(ret);
        self
    }

    /// 设置可见性
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// 标记为静态方法
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// 构造函数结构模型
#[derive(Debug, Clone)]
pub struct CtorModel {
    /// 参数类型列表
    pub params: Vec<TypeInfo>,
    /// 可见性
    pub visibility: Visibility,
    /// 标记为注入首选的构造函数
    pub marked_inject: bool,
}

impl CtorModel {
    /// 创建新的构造函数模型
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            visibility: Visibility::Public,
            marked_inject: false,
        }
    }

    /// 追加参数类型
    pub fn with_param(mut self, param: TypeInfo) -> Self {
        self.params.push(param);
        self
    }

    /// 设置可见性
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// 标记为注入首选
    pub fn with_inject(mut self) -> Self {
        self.marked_inject = true;
        self
    }
}

/// 类型自带的提供者声明
#[derive(Debug, Clone)]
pub struct ProviderSpec {
    /// 提供者名称
    pub name: String,
    /// 目标方法名称
    pub method_name: String,
    /// 目标方法参数类型，None 表示按名称唯一解析
    pub params: Option<Vec<TypeInfo>>,
}

impl ProviderSpec {
    /// 创建新的提供者声明
    pub fn new(name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method_name: method_name.into(),
            params: None,
        }
    }

    /// 指定目标方法的参数类型
    pub fn with_params(mut self, params: Vec<TypeInfo>) -> Self {
        self.params = Some(params);
        self
    }
}

/// 类型结构模型
#[derive(Debug, Clone)]
pub struct TypeModel {
    /// 类型信息
    pub type_info: TypeInfo,
    /// 类型形态
    pub shape: TypeShape,
    /// 接口（抽象）类型标记，接口类型不可注册为 bean
    pub is_interface: bool,
    /// 可赋值到的抽象类型标识
    pub assignable_to: Vec<TypeInfo>,
    /// 字段模型
    pub fields: Vec<FieldModel>,
    /// 方法模型
    pub methods: Vec<MethodModel>,
    /// 构造函数模型
    pub ctors: Vec<CtorModel>,
    /// 声明的 bean 名称
    pub bean_name: Option<String>,
    /// 声明的作用域种类
    pub scope: Option<ScopeBinding>,
    /// 声明的连线模式
    pub wiring: Option<WiringMode>,
    /// 声明的提供者
    pub providers: Vec<ProviderSpec>,
}

impl TypeModel {
    /// 创建指定类型的结构模型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_info(TypeInfo::of::<T>())
    }

    /// 从类型信息创建结构模型
    pub fn from_info(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            shape: TypeShape::Plain,
            is_interface: false,
            assignable_to: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            bean_name: None,
            scope: None,
            wiring: None,
            providers: Vec::new(),
        }
    }

    /// 设置类型形态
    pub fn with_shape(mut self, shape: TypeShape) -> Self {
        self.shape = shape;
        self
    }

    /// 标记为接口（抽象）类型
    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self
    }

    /// 声明可赋值到的抽象类型
    pub fn assignable_to(mut self, target: TypeInfo) -> Self {
        self.assignable_to.push(target);
        self
    }

    /// 追加字段模型
    pub fn with_field(mut self, field: FieldModel) -> Self {
        self.fields.push(field);
        self
    }

    /// 追加方法模型
    pub fn with_method(mut self, method: MethodModel) -> Self {
        self.methods.push(method);
        self
    }

    /// 追加构造函数模型
    pub fn with_ctor(mut self, ctor: CtorModel) -> Self {
        self.ctors.push(ctor);
        self
    }

    /// 声明 bean 名称
    pub fn with_bean_name(mut self, name: impl Into<String>) -> Self {
        self.bean_name = Some(name.into());
        self
    }

    /// 声明作用域种类
    pub fn with_scope(mut self, binding: ScopeBinding) -> Self {
        self.scope = Some(binding);
        self
    }

    /// 声明连线模式
    pub fn with_wiring(mut self, wiring: WiringMode) -> Self {
        self.wiring = Some(wiring);
        self
    }

    /// 声明提供者
    pub fn with_provider(mut self, provider: ProviderSpec) -> Self {
        self.providers.push(provider);
        self
    }
}

/// 类型自描述 trait
///
/// 每个可注册类型提供自身的结构模型，等价于把隐式的反射
/// 提升为显式的注册期元数据表
pub trait TypeSchema: 'static {
    /// 返回类型结构模型
    fn type_model() -> TypeModel;
}
