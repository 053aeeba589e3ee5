//! # Container Common
//!
//! 这个 crate 提供了 Wirecore 容器各层共享的基础词汇。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] - 类型标识元数据
//! - [`Scope`] - 作用域抽象与构造能力
//! - [`WiringMode`] - 连线模式
//! - [`NamingConventions`] - 命名约定规范
//! - [`DefinitionError`] / [`LookupError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 所有操作均为同步的内存内计算
//! - 约定优于配置

pub mod conventions;
pub mod errors;
pub mod metadata;
pub mod scope;
pub mod wiring;

pub use conventions::*;
pub use errors::*;
pub use metadata::*;
pub use scope::*;
pub use wiring::*;
