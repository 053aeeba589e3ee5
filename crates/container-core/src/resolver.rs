//! 注入点解析器
//!
//! 将"类型 + 可选提示"解析为经过校验的注入点。统一的选择纪律：
//! 显式参数类型提示要求精确的签名匹配；省略提示时要求恰好一个
//! 候选成员，零个或多个都是硬错误，歧义必须由调用方补充提示消除，
//! 解析器从不猜测。解析器自身无副作用，注入点由调用方挂接到定义上

use crate::definition::{
    CtorInjectionPoint, InitMethodPoint, InitMethodStrategy, MethodInjectionPoint,
    PropertyInjectionPoint, SetInjectionPoint,
};
use container_common::{DefinitionError, DefinitionResult, NamingConventions, TypeInfo};
use container_introspect::{CtorDescriptor, MethodDescriptor, TypeDescriptor};

/// 注入点解析器
#[derive(Debug, Clone)]
pub struct InjectionPointResolver {
    use_full_type_names: bool,
}

impl InjectionPointResolver {
    /// 创建新的解析器
    pub fn new(use_full_type_names: bool) -> Self {
        Self {
            use_full_type_names,
        }
    }

    // ---------------------------------------------------------------- 构造函数

    /// 解析构造函数注入点
    ///
    /// 省略提示时要求类型上总共只有一个构造函数：
    /// 构造函数没有名称，多于一个即无从选择
    pub fn resolve_ctor(
        &self,
        descriptor: &TypeDescriptor,
        param_types: Option<&[TypeInfo]>,
        references: Option<&[&str]>,
    ) -> DefinitionResult<CtorInjectionPoint> {
        let type_name = descriptor.type_info().module_path.clone();
        let ctor = match param_types {
            Some(params) => descriptor
                .ctor_by_signature(params, true)
                .cloned()
                .ok_or(DefinitionError::CtorNotFound {
                    type_name: type_name.clone(),
                })?,
            None => {
                let ctors = descriptor.ctors(true);
                match ctors.len() {
                    0 => {
                        return Err(DefinitionError::CtorNotFound { type_name });
                    }
                    1 => ctors[0].clone(),
                    count => {
                        return Err(DefinitionError::AmbiguousCtor { count, type_name });
                    }
                }
            }
        };
        let references = self.member_references(&ctor.params, references, &type_name, "<init>")?;
        Ok(CtorInjectionPoint { ctor, references })
    }

    /// 自动解析构造函数（定义路径）
    ///
    /// 依次尝试：唯一的注入首选构造函数、唯一的构造函数、
    /// 无参构造函数
    pub fn resolve_default_ctor(
        &self,
        descriptor: &TypeDescriptor,
    ) -> DefinitionResult<CtorInjectionPoint> {
        let type_name = descriptor.type_info().module_path.clone();
        let ctors = descriptor.ctors(true);
        let marked: Vec<&CtorDescriptor> = ctors.iter().filter(|c| c.marked_inject).collect();

        let ctor = match marked.len() {
            1 => marked[0].clone(),
            count if count > 1 => {
                return Err(DefinitionError::AmbiguousCtor { count, type_name });
            }
            _ => match ctors.len() {
                0 => {
                    return Err(DefinitionError::CtorNotFound { type_name });
                }
                1 => ctors[0].clone(),
                count => descriptor
                    .default_ctor(true)
                    .cloned()
                    .ok_or(DefinitionError::AmbiguousCtor { count, type_name })?,
            },
        };

        let type_name = descriptor.type_info().module_path.clone();
        let references = self.member_references(&ctor.params, None, &type_name, "<init>")?;
        Ok(CtorInjectionPoint { ctor, references })
    }

    // ---------------------------------------------------------------- 属性

    /// 解析属性注入点
    pub fn resolve_property(
        &self,
        descriptor: &TypeDescriptor,
        property: &str,
        reference: Option<&str>,
    ) -> DefinitionResult<PropertyInjectionPoint> {
        let field = descriptor.field(property, true).cloned().ok_or_else(|| {
            DefinitionError::PropertyNotFound {
                type_name: descriptor.type_info().module_path.clone(),
                property: property.to_string(),
            }
        })?;

        // 未给出引用时默认按字段名称匹配
        let references = match reference {
            Some(reference) => vec![reference.to_string()],
            None => vec![field.name.clone()],
        };

        Ok(PropertyInjectionPoint { field, references })
    }

    /// 解析集合注入点
    pub fn resolve_set(
        &self,
        descriptor: &TypeDescriptor,
        property: &str,
    ) -> DefinitionResult<SetInjectionPoint> {
        let field = descriptor.field(property, true).cloned().ok_or_else(|| {
            DefinitionError::PropertyNotFound {
                type_name: descriptor.type_info().module_path.clone(),
                property: property.to_string(),
            }
        })?;

        let element = field
            .element
            .clone()
            .ok_or_else(|| DefinitionError::NotACollection {
                type_name: descriptor.type_info().module_path.clone(),
                property: property.to_string(),
            })?;

        Ok(SetInjectionPoint { field, element })
    }

    // ---------------------------------------------------------------- 方法

    /// 解析方法注入点
    pub fn resolve_method(
        &self,
        descriptor: &TypeDescriptor,
        method_name: &str,
        param_types: Option<&[TypeInfo]>,
        references: Option<&[&str]>,
    ) -> DefinitionResult<MethodInjectionPoint> {
        let type_name = descriptor.type_info().module_path.clone();
        let method = self.select_method(descriptor, method_name, param_types, |_| true)?;
        let references =
            self.member_references(&method.params, references, &type_name, method_name)?;
        Ok(MethodInjectionPoint { method, references })
    }

    /// 解析初始化方法调用点
    ///
    /// 每个名称都必须解析到一个无参方法；序号从 `first_ordinal`
    /// 起连续分配，保证跨多次注册的确定性执行顺序
    pub fn resolve_init_methods(
        &self,
        descriptor: &TypeDescriptor,
        method_names: &[&str],
        strategy: InitMethodStrategy,
        first_ordinal: usize,
    ) -> DefinitionResult<Vec<InitMethodPoint>> {
        method_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let method = descriptor
                    .method_by_signature(name, &[], true)
                    .cloned()
                    .ok_or_else(|| DefinitionError::InitMethodNotFound {
                        type_name: descriptor.type_info().module_path.clone(),
                        method_name: (*name).to_string(),
                    })?;
                Ok(InitMethodPoint {
                    method,
                    ordinal: first_ordinal + i,
                    strategy,
                })
            })
            .collect()
    }

    /// 解析提供者目标方法
    pub fn resolve_provider_method(
        &self,
        descriptor: &TypeDescriptor,
        method_name: &str,
        param_types: Option<&[TypeInfo]>,
        require_static: bool,
    ) -> DefinitionResult<MethodDescriptor> {
        self.select_method(descriptor, method_name, param_types, |m| {
            m.is_static == require_static
        })
        .map_err(|err| match err {
            DefinitionError::MethodNotFound {
                type_name,
                method_name,
            } => DefinitionError::ProviderMethodNotFound {
                type_name,
                method_name,
            },
            other => other,
        })
    }

    /// 统一的方法选择纪律
    fn select_method(
        &self,
        descriptor: &TypeDescriptor,
        method_name: &str,
        param_types: Option<&[TypeInfo]>,
        eligible: impl Fn(&MethodDescriptor) -> bool,
    ) -> DefinitionResult<MethodDescriptor> {
        let type_name = descriptor.type_info().module_path.clone();
        match param_types {
            Some(params) => descriptor
                .method_by_signature(method_name, params, true)
                .filter(|m| eligible(m))
                .cloned()
                .ok_or(DefinitionError::MethodNotFound {
                    type_name,
                    method_name: method_name.to_string(),
                }),
            None => {
                let candidates: Vec<&MethodDescriptor> = descriptor
                    .methods(method_name, true)
                    .iter()
                    .filter(|m| eligible(m))
                    .collect();
                match candidates.len() {
                    0 => Err(DefinitionError::MethodNotFound {
                        type_name,
                        method_name: method_name.to_string(),
                    }),
                    1 => Ok(candidates[0].clone()),
                    count => Err(DefinitionError::AmbiguousMethod {
                        count,
                        type_name,
                        method_name: method_name.to_string(),
                    }),
                }
            }
        }
    }

    // ---------------------------------------------------------------- 引用

    /// 为成员参数构建候选引用列表
    ///
    /// 显式引用与参数一一对应；省略时按命名策略从参数类型推导
    fn member_references(
        &self,
        params: &[TypeInfo],
        references: Option<&[&str]>,
        type_name: &str,
        member: &str,
    ) -> DefinitionResult<Vec<Vec<String>>> {
        match references {
            None => Ok(params
                .iter()
                .map(|param| {
                    vec![NamingConventions::resolve_bean_name(
                        param,
                        self.use_full_type_names,
                    )]
                })
                .collect()),
            Some(references) => {
                if references.len() != params.len() {
                    return Err(DefinitionError::ReferenceCountMismatch {
                        type_name: type_name.to_string(),
                        member: member.to_string(),
                        expected: params.len(),
                        actual: references.len(),
                    });
                }
                Ok(references
                    .iter()
                    .map(|reference| vec![(*reference).to_string()])
                    .collect())
            }
        }
    }
}
