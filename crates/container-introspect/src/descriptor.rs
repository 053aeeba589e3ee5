//! 类型结构描述符
//!
//! 描述符按"公开/全部"两个视图为字段、方法、构造函数与 bean 属性
//! 建立索引。各分区惰性构建，构建一次后在进程生命周期内复用，
//! 前提是类型的结构形态在进程内不再变化。
//!
//! 非公开成员同样被收入"全部"视图并强制启用，
//! 以便解析器在允许的配置下连线非公开成员。
//! 成员缺失以 `None` 表示，不用于其它控制流

use crate::model::{CtorModel, FieldModel, MethodModel, TypeModel, TypeShape, Visibility};
use container_common::TypeInfo;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 字段描述符
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// 字段名称
    pub name: String,
    /// 字段类型
    pub type_info: TypeInfo,
    /// 集合字段的元素类型
    pub element: Option<TypeInfo>,
    /// 可见性
    pub visibility: Visibility,
    /// 是否可用（非公开成员在全部视图中被强制启用）
    pub accessible: bool,
}

impl FieldDescriptor {
    fn from_model(model: &FieldModel, force_access: bool) -> Self {
        Self {
            name: model.name.clone(),
            type_info: model.type_info.clone(),
            element: model.element.clone(),
            visibility: model.visibility,
            accessible: model.visibility.is_public() || force_access,
        }
    }
}

/// 方法描述符
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// 方法名称
    pub name: String,
    /// 参数类型列表
    pub params: Vec<TypeInfo>,
    /// 返回类型
    pub ret: Option<TypeInfo>,
    /// 可见性
    pub visibility: Visibility,
    /// 是否为静态（关联）方法
    pub is_static: bool,
    /// 是否可用
    pub accessible: bool,
}

impl MethodDescriptor {
    fn from_model(model: &MethodModel, force_access: bool) -> Self {
        Self {
            name: model.name.clone(),
            params: model.params.clone(),
            ret: model.ret.clone(),
            visibility: model.visibility,
            is_static: model.is_static,
            accessible: model.visibility.is_public() || force_access,
        }
    }

    /// 判断参数签名是否精确匹配
    pub fn matches_params(&self, params: &[TypeInfo]) -> bool {
        self.params.len() == params.len()
            && self.params.iter().zip(params).all(|(a, b)| a.id == b.id)
    }
}

/// 构造函数描述符
#[derive(Debug, Clone)]
pub struct CtorDescriptor {
    /// 参数类型列表
    pub params: Vec<TypeInfo>,
    /// 可见性
    pub visibility: Visibility,
    /// 标记为注入首选
    pub marked_inject: bool,
    /// 是否可用
    pub accessible: bool,
}

impl CtorDescriptor {
    fn from_model(model: &CtorModel, force_access: bool) -> Self {
        Self {
            params: model.params.clone(),
            visibility: model.visibility,
            marked_inject: model.marked_inject,
            accessible: model.visibility.is_public() || force_access,
        }
    }

    /// 判断参数签名是否精确匹配
    pub fn matches_params(&self, params: &[TypeInfo]) -> bool {
        self.params.len() == params.len()
            && self.params.iter().zip(params).all(|(a, b)| a.id == b.id)
    }
}

/// 属性描述符
///
/// 读写两半独立存在，可见性也按视图独立判定
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    /// 属性名称
    pub name: String,
    /// 读方法
    pub read: Option<MethodDescriptor>,
    /// 写方法
    pub write: Option<MethodDescriptor>,
}

/// 字段索引
#[derive(Debug, Default)]
struct Fields {
    list: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl Fields {
    fn add(&mut self, field: FieldDescriptor) {
        self.index.insert(field.name.clone(), self.list.len());
        self.list.push(field);
    }

    fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.list[i])
    }
}

/// 方法索引，按名称分组保留全部重载
#[derive(Debug, Default)]
struct Methods {
    by_name: HashMap<String, Vec<MethodDescriptor>>,
    count: usize,
}

impl Methods {
    fn add(&mut self, method: MethodDescriptor) {
        self.by_name.entry(method.name.clone()).or_default().push(method);
        self.count += 1;
    }

    fn all_named(&self, name: &str) -> &[MethodDescriptor] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    fn by_signature(&self, name: &str, params: &[TypeInfo]) -> Option<&MethodDescriptor> {
        self.all_named(name).iter().find(|m| m.matches_params(params))
    }
}

/// 构造函数索引
#[derive(Debug, Default)]
struct Ctors {
    list: Vec<CtorDescriptor>,
}

impl Ctors {
    fn by_signature(&self, params: &[TypeInfo]) -> Option<&CtorDescriptor> {
        self.list.iter().find(|c| c.matches_params(params))
    }

    fn default_ctor(&self) -> Option<&CtorDescriptor> {
        self.list.iter().find(|c| c.params.is_empty())
    }
}

/// 属性索引
#[derive(Debug, Default)]
struct Properties {
    by_name: HashMap<String, PropertyDescriptor>,
}

impl Properties {
    fn add_read(&mut self, name: &str, method: MethodDescriptor) {
        let entry = self.by_name.entry(name.to_string()).or_insert_with(|| {
            PropertyDescriptor {
                name: name.to_string(),
                ..PropertyDescriptor::default()
            }
        });
        entry.read = Some(method);
    }

    fn add_write(&mut self, name: &str, method: MethodDescriptor) {
        let entry = self.by_name.entry(name.to_string()).or_insert_with(|| {
            PropertyDescriptor {
                name: name.to_string(),
                ..PropertyDescriptor::default()
            }
        });
        entry.write = Some(method);
    }

    fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name)
    }
}

/// 公开/全部成对视图
#[derive(Debug)]
struct Partition<T> {
    public: T,
    all: T,
}

impl<T> Partition<T> {
    fn view(&self, declared: bool) -> &T {
        if declared {
            &self.all
        } else {
            &self.public
        }
    }
}

/// 属性命名约定：`set_x` 为写方法，`get_x`/`is_x` 为读方法
fn property_write_name(method: &MethodModel) -> Option<&str> {
    if method.is_static || method.params.len() != 1 {
        return None;
    }
    method.name.strip_prefix("set_").filter(|n| !n.is_empty())
}

fn property_read_name(method: &MethodModel) -> Option<&str> {
    if method.is_static || !method.params.is_empty() || method.ret.is_none() {
        return None;
    }
    method
        .name
        .strip_prefix("get_")
        .or_else(|| method.name.strip_prefix("is_"))
        .filter(|n| !n.is_empty())
}

/// 类型结构描述符
///
/// 从结构模型构建一次，之后只读。使用计数仅用于诊断
#[derive(Debug)]
pub struct TypeDescriptor {
    model: TypeModel,
    is_array: bool,
    is_map: bool,
    is_list: bool,
    is_set: bool,
    is_collection: bool,
    fields: OnceCell<Partition<Fields>>,
    methods: OnceCell<Partition<Methods>>,
    ctors: OnceCell<Partition<Ctors>>,
    properties: OnceCell<Partition<Properties>>,
    usage_count: AtomicU64,
}

impl TypeDescriptor {
    /// 从结构模型创建描述符
    pub fn new(model: TypeModel) -> Self {
        let shape = model.shape;
        Self {
            model,
            is_array: shape == TypeShape::Array,
            is_map: shape == TypeShape::Map,
            is_list: shape == TypeShape::List,
            is_set: shape == TypeShape::Set,
            is_collection: matches!(shape, TypeShape::List | TypeShape::Set),
            fields: OnceCell::new(),
            methods: OnceCell::new(),
            ctors: OnceCell::new(),
            properties: OnceCell::new(),
            usage_count: AtomicU64::new(0),
        }
    }

    /// 描述的类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.model.type_info
    }

    /// 底层结构模型
    pub fn model(&self) -> &TypeModel {
        &self.model
    }

    /// 类型是否为数组
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// 类型是否为映射
    pub fn is_map(&self) -> bool {
        self.is_map
    }

    /// 类型是否为列表
    pub fn is_list(&self) -> bool {
        self.is_list
    }

    /// 类型是否为去重集合
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    /// 类型是否为集合
    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    /// 可赋值性判断：精确类型或声明的抽象类型
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        self.model.type_info.id == target.id
            || self.model.assignable_to.iter().any(|t| t.id == target.id)
    }

    pub(crate) fn increase_usage(&self) {
        self.usage_count.fetch_add(1, Ordering::Relaxed);
    }

    /// 描述符被查询的次数
    pub fn usage_count(&self) -> u64 {
        self.usage_count.load(Ordering::Relaxed)
    }

    // ---------------------------------------------------------------- 字段

    fn inspect_fields(&self) -> &Partition<Fields> {
        self.fields.get_or_init(|| {
            let mut public = Fields::default();
            let mut all = Fields::default();
            for field in &self.model.fields {
                if field.visibility.is_public() {
                    public.add(FieldDescriptor::from_model(field, false));
                }
                all.add(FieldDescriptor::from_model(field, true));
            }
            Partition { public, all }
        })
    }

    /// 按名称查找字段
    pub fn field(&self, name: &str, declared: bool) -> Option<&FieldDescriptor> {
        self.inspect_fields().view(declared).get(name)
    }

    /// 枚举全部字段（模型声明顺序）
    pub fn all_fields(&self, declared: bool) -> &[FieldDescriptor] {
        &self.inspect_fields().view(declared).list
    }

    // ---------------------------------------------------------------- 方法

    fn inspect_methods(&self) -> &Partition<Methods> {
        self.methods.get_or_init(|| {
            let mut public = Methods::default();
            let mut all = Methods::default();
            for method in &self.model.methods {
                if method.visibility.is_public() {
                    public.add(MethodDescriptor::from_model(method, false));
                }
                all.add(MethodDescriptor::from_model(method, true));
            }
            Partition { public, all }
        })
    }

    /// 查找指定名称的全部重载
    pub fn methods(&self, name: &str, declared: bool) -> &[MethodDescriptor] {
        self.inspect_methods().view(declared).all_named(name)
    }

    /// 按名称与精确签名查找方法
    pub fn method_by_signature(
        &self,
        name: &str,
        params: &[TypeInfo],
        declared: bool,
    ) -> Option<&MethodDescriptor> {
        self.inspect_methods().view(declared).by_signature(name, params)
    }

    /// 方法总数
    pub fn methods_count(&self, declared: bool) -> usize {
        self.inspect_methods().view(declared).count
    }

    // ---------------------------------------------------------------- 构造函数

    fn inspect_ctors(&self) -> &Partition<Ctors> {
        self.ctors.get_or_init(|| {
            let mut public = Ctors::default();
            let mut all = Ctors::default();
            for ctor in &self.model.ctors {
                if ctor.visibility.is_public() {
                    public.list.push(CtorDescriptor::from_model(ctor, false));
                }
                all.list.push(CtorDescriptor::from_model(ctor, true));
            }
            Partition { public, all }
        })
    }

    /// 枚举全部构造函数
    pub fn ctors(&self, declared: bool) -> &[CtorDescriptor] {
        &self.inspect_ctors().view(declared).list
    }

    /// 按精确签名查找构造函数
    pub fn ctor_by_signature(
        &self,
        params: &[TypeInfo],
        declared: bool,
    ) -> Option<&CtorDescriptor> {
        self.inspect_ctors().view(declared).by_signature(params)
    }

    /// 查找无参构造函数
    pub fn default_ctor(&self, declared: bool) -> Option<&CtorDescriptor> {
        self.inspect_ctors().view(declared).default_ctor()
    }

    // ---------------------------------------------------------------- 属性

    fn inspect_properties(&self) -> &Partition<Properties> {
        self.properties.get_or_init(|| {
            let mut public = Properties::default();
            let mut all = Properties::default();
            for method in &self.model.methods {
                if let Some(name) = property_write_name(method) {
                    if method.visibility.is_public() {
                        public.add_write(name, MethodDescriptor::from_model(method, false));
                    }
                    all.add_write(name, MethodDescriptor::from_model(method, true));
                } else if let Some(name) = property_read_name(method) {
                    if method.visibility.is_public() {
                        public.add_read(name, MethodDescriptor::from_model(method, false));
                    }
                    all.add_read(name, MethodDescriptor::from_model(method, true));
                }
            }
            Partition { public, all }
        })
    }

    /// 按名称查找属性
    pub fn property(&self, name: &str, declared: bool) -> Option<&PropertyDescriptor> {
        self.inspect_properties().view(declared).get(name)
    }

    /// 查找属性的写方法
    pub fn property_setter(&self, name: &str, declared: bool) -> Option<&MethodDescriptor> {
        self.property(name, declared).and_then(|p| p.write.as_ref())
    }

    /// 查找属性的读方法
    pub fn property_getter(&self, name: &str, declared: bool) -> Option<&MethodDescriptor> {
        self.property(name, declared).and_then(|p| p.read.as_ref())
    }
}
