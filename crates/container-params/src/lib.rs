//! # Container Params
//!
//! 这个 crate 为容器提供键值参数服务：按 bean 名称前缀收集参数键，
//! 并支持字符串值中的 `${引用}` 插值。参数由配置层写入，
//! 由外部的实例化引擎在填充基本类型参数时消费。

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// 引用插值的最大展开深度
const MAX_REFERENCE_DEPTH: usize = 16;

/// 参数存储
#[derive(Debug, Default)]
pub struct ParamStore {
    params: RwLock<HashMap<String, Value>>,
}

impl ParamStore {
    /// 创建新的参数存储
    pub fn new() -> Self {
        Self {
            params: RwLock::new(HashMap::new()),
        }
    }

    /// 定义参数，同名参数会被替换
    pub fn put(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.write().insert(name.into(), value.into());
    }

    /// 读取参数
    pub fn get(&self, name: &str) -> Option<Value> {
        self.params.read().get(name).cloned()
    }

    /// 批量定义参数
    pub fn put_all(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        let mut params = self.params.write();
        for (name, value) in entries {
            params.insert(name, value);
        }
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.params.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.params.read().is_empty()
    }

    /// 收集指定 bean 的全部参数键
    ///
    /// 返回以 `bean名称.` 为前缀的键，按字典序排列。
    /// `resolve_references` 为 true 时先将这些键的字符串值中的
    /// `${引用}` 展开为被引用参数的值；未定义的引用原样保留
    pub fn resolve(&self, bean_name: &str, resolve_references: bool) -> Vec<String> {
        let prefix = format!("{bean_name}.");

        if resolve_references {
            self.resolve_references(&prefix);
        }

        let params = self.params.read();
        let mut keys: Vec<String> = params
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        keys.sort();
        debug!(bean = bean_name, count = keys.len(), "收集 bean 参数");
        keys
    }

    /// 就地展开指定前缀下的引用
    fn resolve_references(&self, prefix: &str) {
        let mut params = self.params.write();
        let keys: Vec<String> = params
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in keys {
            if let Some(Value::String(raw)) = params.get(&key).cloned() {
                let resolved = Self::interpolate(&params, &raw, 0);
                if resolved != raw {
                    params.insert(key, Value::String(resolved));
                }
            }
        }
    }

    /// 展开字符串中的 `${引用}`，递归深度有界
    fn interpolate(params: &HashMap<String, Value>, input: &str, depth: usize) -> String {
        if depth >= MAX_REFERENCE_DEPTH {
            return input.to_string();
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match params.get(name) {
                        Some(Value::String(value)) => {
                            out.push_str(&Self::interpolate(params, value, depth + 1));
                        }
                        Some(value) => out.push_str(&value.to_string()),
                        None => {
                            // 未定义的引用原样保留
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}
