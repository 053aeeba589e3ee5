//! 类型描述符缓存
//!
//! 每个类型只构建一次描述符。构建使用按键原子的
//! "不存在则计算"原语，并发首次查询同一类型时不会产生
//! 重复的描述符实例

use crate::descriptor::TypeDescriptor;
use crate::model::{TypeModel, TypeSchema};
use container_common::{DefinitionError, DefinitionResult, TypeInfo};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// 类型描述符缓存
#[derive(Debug, Default)]
pub struct TypeIntrospector {
    cache: DashMap<TypeId, Arc<TypeDescriptor>>,
}

impl TypeIntrospector {
    /// 创建新的描述符缓存
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// 查询（必要时构建）类型描述符
    pub fn describe<T: TypeSchema>(&self) -> Arc<TypeDescriptor> {
        let descriptor = self
            .cache
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                let model = T::type_model();
                debug!(r#type = %model.type_info, "构建类型描述符");
                Arc::new(TypeDescriptor::new(model))
            })
            .clone();
        descriptor.increase_usage();
        descriptor
    }

    /// 手工登记结构模型（生成或手写的描述符）
    ///
    /// 同一类型重复登记时保留先前的描述符
    pub fn register_model(&self, model: TypeModel) -> Arc<TypeDescriptor> {
        let type_id = model.type_info.id;
        self.cache
            .entry(type_id)
            .or_insert_with(|| {
                debug!(r#type = %model.type_info, "登记类型结构模型");
                Arc::new(TypeDescriptor::new(model))
            })
            .clone()
    }

    /// 按类型标识查找已缓存的描述符
    pub fn lookup(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.cache.get(&type_id).map(|entry| {
            entry.increase_usage();
            entry.clone()
        })
    }

    /// 查找必须存在的描述符
    pub fn lookup_required(&self, type_info: &TypeInfo) -> DefinitionResult<Arc<TypeDescriptor>> {
        self.lookup(type_info.id)
            .ok_or_else(|| DefinitionError::DescriptorMissing {
                type_name: type_info.module_path.clone(),
            })
    }

    /// 已缓存的类型数量
    pub fn total_types(&self) -> usize {
        self.cache.len()
    }
}
