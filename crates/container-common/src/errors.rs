//! 错误类型定义

use thiserror::Error;

/// 定义期错误类型
///
/// 所有注册期校验失败都属于此类。错误在触发调用处同步上报，
/// 失败的调用不产生任何状态变更
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("无法注册接口类型: {type_name}")]
    InterfaceNotAllowed { type_name: String },

    #[error("检测到重复的 bean 名称: {name}, 已注册类型: {existing_type}, 新类型: {new_type}")]
    DuplicatedBeanName {
        name: String,
        existing_type: String,
        new_type: String,
    },

    #[error("构造函数未找到: {type_name}")]
    CtorNotFound { type_name: String },

    #[error("找到 {count} 个可用的构造函数注入点: {type_name}")]
    AmbiguousCtor { count: usize, type_name: String },

    #[error("方法未找到: {type_name}#{method_name}")]
    MethodNotFound {
        type_name: String,
        method_name: String,
    },

    #[error("找到 {count} 个可用的方法注入点: {type_name}#{method_name}")]
    AmbiguousMethod {
        count: usize,
        type_name: String,
        method_name: String,
    },

    #[error("属性未找到: {type_name}#{property}")]
    PropertyNotFound { type_name: String, property: String },

    #[error("字段不是集合类型: {type_name}#{property}")]
    NotACollection { type_name: String, property: String },

    #[error("初始化方法未找到: {type_name}#{method_name}")]
    InitMethodNotFound {
        type_name: String,
        method_name: String,
    },

    #[error("提供者方法未找到: {type_name}#{method_name}")]
    ProviderMethodNotFound {
        type_name: String,
        method_name: String,
    },

    #[error("引用数量不匹配: {type_name}#{member}, 期望 {expected}, 实际 {actual}")]
    ReferenceCountMismatch {
        type_name: String,
        member: String,
        expected: usize,
        actual: usize,
    },

    #[error("无法创建作用域: {scope_name}, 原因: {message}")]
    ScopeCreationFailed { scope_name: String, message: String },

    #[error("类型结构描述缺失: {type_name}")]
    DescriptorMissing { type_name: String },
}

/// 查找错误类型
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Bean 未找到: {name}")]
    BeanNotFound { name: String },
}

/// 容器统一错误类型
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("定义错误: {source}")]
    Definition {
        #[from]
        source: DefinitionError,
    },

    #[error("查找错误: {source}")]
    Lookup {
        #[from]
        source: LookupError,
    },
}

/// 结果类型别名
pub type DefinitionResult<T> = Result<T, DefinitionError>;
pub type LookupResult<T> = Result<T, LookupError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
