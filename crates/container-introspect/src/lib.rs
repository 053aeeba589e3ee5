//! # Container Introspect
//!
//! 这个 crate 以显式的能力描述符替代运行时反射：每个可注册类型
//! 提供一份字段/方法/构造函数的结构模型，容器据此建立按可见性
//! 分区的索引并在进程生命周期内记忆。
//!
//! ## 核心组件
//!
//! - [`TypeModel`] - 类型结构模型（注册期提供的元数据表）
//! - [`TypeSchema`] - 类型自描述 trait
//! - [`TypeDescriptor`] - 惰性构建的结构描述符
//! - [`TypeIntrospector`] - 按类型标识记忆的描述符缓存

pub mod cache;
pub mod descriptor;
pub mod model;

pub use cache::*;
pub use descriptor::*;
pub use model::*;
