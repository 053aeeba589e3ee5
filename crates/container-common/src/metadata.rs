//! 类型标识元数据
//!
//! 在没有运行时反射的环境下，类型以 [`TypeInfo`] 为身份参与
//! 注册、查找与可赋值性判断

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 相等性与散列只基于 [`TypeId`]，名称字段仅用于诊断与命名策略
#[derive(Debug, Clone, Eq)]
pub struct TypeInfo {
    /// 类型短名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整模块路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    ///
    /// 支持 `dyn Trait` 形式的抽象类型标识，用作可赋值性目标
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            name: full.split("::").last().unwrap_or(full).to_string(),
            id: TypeId::of::<T>(),
            module_path: full.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        self.name.split("::").last().unwrap_or(&self.name)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Marker {}

    struct Sample;

    #[test]
    fn type_info_identity() {
        let a = TypeInfo::of::<Sample>();
        let b = TypeInfo::of::<Sample>();
        assert_eq!(a, b);
        assert_eq!(a.short_name(), "Sample");
    }

    #[test]
    fn trait_object_identity() {
        let t = TypeInfo::of::<dyn Marker>();
        assert_eq!(t.short_name(), "Marker");
        assert_ne!(t, TypeInfo::of::<Sample>());
    }
}
