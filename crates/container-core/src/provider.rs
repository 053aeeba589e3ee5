//! 提供者定义
//!
//! 提供者是命名的工厂间接层：以方法调用代替直接构造来供给实例

use container_common::TypeInfo;
use container_introspect::MethodDescriptor;

/// 提供者目标
#[derive(Debug, Clone)]
pub enum ProviderTarget {
    /// 实例方法提供者：来源 bean 及其类型上的实例方法
    InstanceMethod {
        /// 来源 bean 名称
        bean: String,
        /// 实例方法
        method: MethodDescriptor,
    },
    /// 静态方法提供者：类型及其上的静态方法
    StaticMethod {
        /// 目标类型
        type_info: TypeInfo,
        /// 静态方法
        method: MethodDescriptor,
    },
}

/// 提供者定义
///
/// 同名重复注册时替换既有定义
#[derive(Debug, Clone)]
pub struct ProviderDefinition {
    /// 提供者名称
    pub name: String,
    /// 提供者目标
    pub target: ProviderTarget,
}

impl ProviderDefinition {
    /// 创建实例方法提供者
    pub fn instance_method(
        name: impl Into<String>,
        bean: impl Into<String>,
        method: MethodDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            target: ProviderTarget::InstanceMethod {
                bean: bean.into(),
                method,
            },
        }
    }

    /// 创建静态方法提供者
    pub fn static_method(
        name: impl Into<String>,
        type_info: TypeInfo,
        method: MethodDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            target: ProviderTarget::StaticMethod { type_info, method },
        }
    }
}
