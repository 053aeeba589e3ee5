//! Bean 注册表
//!
//! 容器的定义层核心：持有全部 bean 定义、提供者定义与作用域，
//! 协调注入点解析并维护类型到名称的索引。注册表是显式拥有的
//! 容器值，按引用传递给协作方，不依赖全局环境状态。
//!
//! 并发模型：bean 与提供者表采用读写锁（单写者纪律），
//! 类型到名称的索引与作用域表采用按键原子的并发映射；
//! 查找返回定义的克隆快照

use crate::config::ContainerConfig;
use crate::definition::{BeanDefinition, InitMethodStrategy};
use crate::provider::ProviderDefinition;
use crate::resolver::InjectionPointResolver;
use crate::scopes::ScopeRegistry;
use container_common::{
    ContainerResult, DefinitionError, DefinitionResult, LookupError, LookupResult,
    NamingConventions, ScopeBinding, TypeInfo, WiringMode,
};
use container_introspect::{TypeDescriptor, TypeIntrospector, TypeModel, TypeSchema};
use container_params::ParamStore;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Bean 注册表
#[derive(Debug)]
pub struct BeanRegistry {
    /// 全部 bean 定义
    beans: RwLock<HashMap<String, BeanDefinition>>,
    /// 全部提供者定义
    providers: RwLock<HashMap<String, ProviderDefinition>>,
    /// 类型到 bean 名称集合的缓存，任何注册/移除都会使其失效
    bean_collections: DashMap<TypeId, Arc<[String]>>,
    scope_registry: ScopeRegistry,
    introspector: Arc<TypeIntrospector>,
    resolver: InjectionPointResolver,
    params: ParamStore,
    config: ContainerConfig,
    next_ordinal: AtomicU64,
}

impl Default for BeanRegistry {
    fn default() -> Self {
        Self::new(ContainerConfig::default())
    }
}

impl BeanRegistry {
    /// 使用给定配置创建注册表
    pub fn new(config: ContainerConfig) -> Self {
        Self::with_introspector(config, Arc::new(TypeIntrospector::new()))
    }

    /// 使用共享的描述符缓存创建注册表
    pub fn with_introspector(config: ContainerConfig, introspector: Arc<TypeIntrospector>) -> Self {
        Self {
            beans: RwLock::new(HashMap::new()),
            providers: RwLock::new(HashMap::new()),
            bean_collections: DashMap::new(),
            scope_registry: ScopeRegistry::new(),
            introspector,
            resolver: InjectionPointResolver::new(config.use_full_type_names),
            params: ParamStore::new(),
            config,
            next_ordinal: AtomicU64::new(0),
        }
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 描述符缓存
    pub fn introspector(&self) -> &Arc<TypeIntrospector> {
        &self.introspector
    }

    /// 作用域注册表
    pub fn scope_registry(&self) -> &ScopeRegistry {
        &self.scope_registry
    }

    /// 参数存储
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    // ---------------------------------------------------------------- 名称解析

    /// 解析类型的 bean 名称：类型声明优先，否则按命名策略推导
    pub fn resolve_bean_name<T: TypeSchema>(&self) -> String {
        let descriptor = self.introspector.describe::<T>();
        self.bean_name_of(descriptor.model())
    }

    fn bean_name_of(&self, model: &TypeModel) -> String {
        model.bean_name.clone().unwrap_or_else(|| {
            NamingConventions::resolve_bean_name(&model.type_info, self.config.use_full_type_names)
        })
    }

    // ---------------------------------------------------------------- 注册

    /// 开始注册一个 bean
    pub fn register_bean<T: TypeSchema>(&self) -> BeanRegistration<'_> {
        BeanRegistration {
            registry: self,
            descriptor: self.introspector.describe::<T>(),
            name: None,
            scope: None,
            wiring: None,
            define: false,
        }
    }

    fn register_definition(
        &self,
        descriptor: &Arc<TypeDescriptor>,
        name: Option<String>,
        scope: Option<ScopeBinding>,
        wiring: Option<WiringMode>,
        define: bool,
    ) -> DefinitionResult<BeanDefinition> {
        let model = descriptor.model();

        // 每个字段的默认值解析次序：显式实参、类型声明、容器默认
        let name = name.unwrap_or_else(|| self.bean_name_of(model));
        let mut wiring = wiring.or(model.wiring).unwrap_or(WiringMode::Default);
        if wiring == WiringMode::Default {
            wiring = self.config.default_wiring_mode();
        }
        let binding = scope
            .or_else(|| model.scope.clone())
            .unwrap_or_else(|| self.config.default_scope.clone());

        // 接口类型不可注册为具体 bean
        if model.is_interface {
            return Err(DefinitionError::InterfaceNotAllowed {
                type_name: model.type_info.module_path.clone(),
            });
        }

        // 重复名称检测先于任何状态变更
        if self.config.detect_duplicated_bean_names {
            if let Some(existing) = self.lookup_bean(&name) {
                return Err(DefinitionError::DuplicatedBeanName {
                    name,
                    existing_type: existing.type_info.module_path.clone(),
                    new_type: model.type_info.module_path.clone(),
                });
            }
        }

        debug!(
            bean = %name,
            r#type = model.type_info.short_name(),
            scope = binding.kind_name(),
            ?wiring,
            "注册 bean"
        );

        // 先完成全部可失败的解析，再做任何状态变更
        let scope_instance = self.scope_registry.resolve(&binding)?;
        let ordinal = self.next_ordinal.fetch_add(1, Ordering::Relaxed);
        let mut definition = BeanDefinition::new(
            name.clone(),
            model.type_info.clone(),
            scope_instance,
            wiring,
            ordinal,
        );

        // define：构造函数自动解析，其余注入点设为显式空标记
        if define {
            definition.ctor = Some(self.resolver.resolve_default_ctor(descriptor)?);
            definition.properties = Some(Vec::new());
            definition.sets = Some(Vec::new());
            definition.methods = Some(Vec::new());
            definition.init_methods = Some(Vec::new());
        }

        // 类型声明的提供者随 bean 一并解析
        let mut provider_definitions = Vec::with_capacity(model.providers.len());
        for spec in &model.providers {
            let method = self.resolver.resolve_provider_method(
                descriptor,
                &spec.method_name,
                spec.params.as_deref(),
                false,
            )?;
            provider_definitions.push(ProviderDefinition::instance_method(
                spec.name.clone(),
                name.clone(),
                method,
            ));
        }

        // 替换策略：先移除既有定义（含作用域清退），再写入新定义
        self.remove_bean(&name);
        self.beans.write().insert(name, definition.clone());
        for provider in provider_definitions {
            self.put_provider(provider);
        }
        self.invalidate_bean_collections();

        Ok(definition)
    }

    // ---------------------------------------------------------------- 查找

    /// 查找 bean 定义，返回克隆快照
    pub fn lookup_bean(&self, name: &str) -> Option<BeanDefinition> {
        self.beans.read().get(name).cloned()
    }

    /// 按候选名称次序查找第一个存在的定义
    pub fn lookup_first(&self, names: &[&str]) -> Option<BeanDefinition> {
        names.iter().find_map(|name| self.lookup_bean(name))
    }

    /// 查找必须存在的 bean 定义
    pub fn lookup_existing(&self, name: &str) -> LookupResult<BeanDefinition> {
        self.lookup_bean(name)
            .ok_or_else(|| LookupError::BeanNotFound {
                name: name.to_string(),
            })
    }

    /// bean 名称是否已注册
    pub fn is_bean_name_registered(&self, name: &str) -> bool {
        self.beans.read().contains_key(name)
    }

    // ---------------------------------------------------------------- 移除

    /// 移除 bean，返回被移除的定义
    ///
    /// 同时通知所属作用域清退该定义的存活实例；
    /// 名称未注册时无任何副作用
    pub fn remove_bean(&self, name: &str) -> Option<BeanDefinition> {
        let removed = self.beans.write().remove(name);
        if let Some(ref definition) = removed {
            definition.scope_evict();
            self.invalidate_bean_collections();
            debug!(bean = %name, "移除 bean");
        }
        removed
    }

    /// 移除指定类型的全部 bean
    ///
    /// 名称不从类型推导：遍历全部定义，只移除类型精确相等的 bean，
    /// 不做多态匹配
    pub fn remove_beans_of_type(&self, type_info: &TypeInfo) {
        let names: Vec<String> = self
            .beans
            .read()
            .values()
            .filter(|definition| definition.type_info.id == type_info.id)
            .map(|definition| definition.name.clone())
            .collect();

        for name in names {
            self.remove_bean(&name);
        }
    }

    // ---------------------------------------------------------------- 类型索引

    /// 解析可赋值到指定类型的全部 bean 名称
    ///
    /// 结果按注册顺序排列，并按请求类型记忆；
    /// 任何注册/移除都会使缓存失效，索引始终反映当前注册状态
    pub fn bean_names_for_type(&self, type_info: &TypeInfo) -> Arc<[String]> {
        if let Some(cached) = self.bean_collections.get(&type_info.id) {
            return cached.clone();
        }

        let beans = self.beans.read();
        let mut entries: Vec<(u64, String)> = beans
            .values()
            .filter(|definition| self.is_assignable(&definition.type_info, type_info))
            .map(|definition| (definition.ordinal, definition.name.clone()))
            .collect();
        drop(beans);
        entries.sort_unstable_by_key(|(ordinal, _)| *ordinal);

        let names: Arc<[String]> = entries.into_iter().map(|(_, name)| name).collect();
        self.bean_collections.insert(type_info.id, names.clone());
        names
    }

    fn is_assignable(&self, concrete: &TypeInfo, target: &TypeInfo) -> bool {
        concrete.id == target.id
            || self
                .introspector
                .lookup(concrete.id)
                .map_or(false, |descriptor| descriptor.is_assignable_to(target))
    }

    fn invalidate_bean_collections(&self) {
        self.bean_collections.clear();
    }

    // ---------------------------------------------------------------- 注入点

    /// 注册构造函数注入点
    ///
    /// `param_types` 省略时要求类型上只有一个构造函数
    pub fn register_ctor_injection_point(
        &self,
        bean_name: &str,
        param_types: Option<&[TypeInfo]>,
        references: Option<&[&str]>,
    ) -> ContainerResult<()> {
        let definition = self.lookup_existing(bean_name)?;
        let descriptor = self.introspector.lookup_required(&definition.type_info)?;
        let point = self
            .resolver
            .resolve_ctor(&descriptor, param_types, references)?;

        self.attach(bean_name, |definition| definition.ctor = Some(point))
    }

    /// 注册属性注入点
    pub fn register_property_injection_point(
        &self,
        bean_name: &str,
        property: &str,
        reference: Option<&str>,
    ) -> ContainerResult<()> {
        let definition = self.lookup_existing(bean_name)?;
        let descriptor = self.introspector.lookup_required(&definition.type_info)?;
        let point = self
            .resolver
            .resolve_property(&descriptor, property, reference)?;

        self.attach(bean_name, |definition| {
            definition.add_property_injection_point(point);
        })
    }

    /// 注册集合注入点
    pub fn register_set_injection_point(
        &self,
        bean_name: &str,
        property: &str,
    ) -> ContainerResult<()> {
        let definition = self.lookup_existing(bean_name)?;
        let descriptor = self.introspector.lookup_required(&definition.type_info)?;
        let point = self.resolver.resolve_set(&descriptor, property)?;

        self.attach(bean_name, |definition| {
            definition.add_set_injection_point(point);
        })
    }

    /// 注册方法注入点
    pub fn register_method_injection_point(
        &self,
        bean_name: &str,
        method_name: &str,
        param_types: Option<&[TypeInfo]>,
        references: Option<&[&str]>,
    ) -> ContainerResult<()> {
        let definition = self.lookup_existing(bean_name)?;
        let descriptor = self.introspector.lookup_required(&definition.type_info)?;
        let point =
            self.resolver
                .resolve_method(&descriptor, method_name, param_types, references)?;

        self.attach(bean_name, |definition| {
            definition.add_method_injection_point(point);
        })
    }

    /// 注册初始化方法
    pub fn register_init_methods(
        &self,
        bean_name: &str,
        strategy: InitMethodStrategy,
        method_names: &[&str],
    ) -> ContainerResult<()> {
        let definition = self.lookup_existing(bean_name)?;
        let descriptor = self.introspector.lookup_required(&definition.type_info)?;
        let first_ordinal = definition.init_method_count();
        let points =
            self.resolver
                .resolve_init_methods(&descriptor, method_names, strategy, first_ordinal)?;

        self.attach(bean_name, |definition| {
            definition.add_init_method_points(points);
        })
    }

    /// 在写锁内将解析结果挂接到既有定义上
    fn attach(
        &self,
        bean_name: &str,
        apply: impl FnOnce(&mut BeanDefinition),
    ) -> ContainerResult<()> {
        let mut beans = self.beans.write();
        let definition = beans
            .get_mut(bean_name)
            .ok_or_else(|| LookupError::BeanNotFound {
                name: bean_name.to_string(),
            })?;
        apply(definition);
        Ok(())
    }

    // ---------------------------------------------------------------- 提供者

    /// 注册实例方法提供者
    ///
    /// 目标方法必须存在于来源 bean 的类型上：给出参数类型时要求
    /// 精确签名，省略时要求按名称唯一
    pub fn register_instance_provider(
        &self,
        provider_name: &str,
        bean_name: &str,
        method_name: &str,
        param_types: Option<&[TypeInfo]>,
    ) -> ContainerResult<()> {
        let definition = self.lookup_existing(bean_name)?;
        let descriptor = self.introspector.lookup_required(&definition.type_info)?;
        let method =
            self.resolver
                .resolve_provider_method(&descriptor, method_name, param_types, false)?;

        self.put_provider(ProviderDefinition::instance_method(
            provider_name,
            bean_name,
            method,
        ));
        Ok(())
    }

    /// 注册静态方法提供者
    pub fn register_static_provider<T: TypeSchema>(
        &self,
        provider_name: &str,
        method_name: &str,
        param_types: Option<&[TypeInfo]>,
    ) -> DefinitionResult<()> {
        let descriptor = self.introspector.describe::<T>();
        let method =
            self.resolver
                .resolve_provider_method(&descriptor, method_name, param_types, true)?;

        self.put_provider(ProviderDefinition::static_method(
            provider_name,
            descriptor.type_info().clone(),
            method,
        ));
        Ok(())
    }

    /// 查找提供者定义
    pub fn lookup_provider(&self, name: &str) -> Option<ProviderDefinition> {
        self.providers.read().get(name).cloned()
    }

    fn put_provider(&self, definition: ProviderDefinition) {
        let name = definition.name.clone();
        if self
            .providers
            .write()
            .insert(name.clone(), definition)
            .is_some()
        {
            warn!(provider = %name, "替换已注册的提供者");
        }
    }

    // ---------------------------------------------------------------- 统计

    /// 已注册的 bean 数量
    pub fn total_beans(&self) -> usize {
        self.beans.read().len()
    }

    /// 已使用的作用域数量
    pub fn total_scopes(&self) -> usize {
        self.scope_registry.total_scopes()
    }

    /// 已注册的提供者数量
    pub fn total_providers(&self) -> usize {
        self.providers.read().len()
    }

    /// 全部 bean 名称，按注册顺序排列
    pub fn bean_names(&self) -> Vec<String> {
        let beans = self.beans.read();
        let mut entries: Vec<(u64, String)> = beans
            .values()
            .map(|definition| (definition.ordinal, definition.name.clone()))
            .collect();
        drop(beans);
        entries.sort_unstable_by_key(|(ordinal, _)| *ordinal);
        entries.into_iter().map(|(_, name)| name).collect()
    }

    // ---------------------------------------------------------------- 参数

    /// 定义参数，同名参数会被替换
    pub fn define_parameter(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.put(name, value);
    }

    /// 读取已定义的参数
    pub fn parameter(&self, name: &str) -> Option<Value> {
        self.params.get(name)
    }

    /// 批量定义参数
    pub fn define_parameters(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        self.params.put_all(entries);
    }

    /// 为 bean 准备参数键列表，按容器配置决定是否解析内部引用
    pub fn resolve_bean_params(&self, name: &str) -> Vec<String> {
        self.params
            .resolve(name, self.config.resolve_reference_parameters)
    }
}

/// Bean 注册请求
///
/// 省略的字段在注册时按"显式实参、类型声明、容器默认"的次序补全
#[must_use = "注册请求在调用 register 前不会生效"]
pub struct BeanRegistration<'a> {
    registry: &'a BeanRegistry,
    descriptor: Arc<TypeDescriptor>,
    name: Option<String>,
    scope: Option<ScopeBinding>,
    wiring: Option<WiringMode>,
    define: bool,
}

impl BeanRegistration<'_> {
    /// 显式指定 bean 名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 显式指定作用域种类
    pub fn with_scope<S: container_common::ScopeFactory + 'static>(mut self) -> Self {
        self.scope = Some(ScopeBinding::of::<S>());
        self
    }

    /// 显式指定作用域绑定
    pub fn with_scope_binding(mut self, binding: ScopeBinding) -> Self {
        self.scope = Some(binding);
        self
    }

    /// 显式指定连线模式
    pub fn with_wiring(mut self, wiring: WiringMode) -> Self {
        self.wiring = Some(wiring);
        self
    }

    /// 注册为"已定义"：构造函数自动解析，其余注入点设为显式空标记，
    /// 绕过自动解析，之后完全由手工连线
    pub fn define(mut self) -> Self {
        self.define = true;
        self
    }

    /// 执行注册
    pub fn register(self) -> DefinitionResult<BeanDefinition> {
        self.registry.register_definition(
            &self.descriptor,
            self.name,
            self.scope,
            self.wiring,
            self.define,
        )
    }
}
