//! 命名约定规范
//!
//! 提供 bean 默认名称的推导规则

use crate::metadata::TypeInfo;

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 解析 bean 的默认名称
    ///
    /// 完整名称策略使用类型的模块路径；简单名称策略使用
    /// 蛇形命名的类型短名称。对同一类型与同一策略，结果是确定的
    pub fn resolve_bean_name(type_info: &TypeInfo, use_full_type_names: bool) -> String {
        if use_full_type_names {
            type_info.module_path.clone()
        } else {
            Self::to_snake_case(type_info.short_name())
        }
    }

    /// 将驼峰命名转换为蛇形命名
    pub fn to_snake_case(s: &str) -> String {
        let mut result = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch.is_uppercase() && !result.is_empty() {
                if let Some(&next_ch) = chars.peek() {
                    if next_ch.is_lowercase() {
                        result.push('_');
                    }
                }
            }
            result.push(ch.to_lowercase().next().unwrap_or(ch));
        }

        result
    }
}
