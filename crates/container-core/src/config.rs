//! 容器配置

use crate::scopes::SingletonScope;
use container_common::{ScopeBinding, WiringMode};
use tracing::warn;

/// 容器配置
///
/// 所有配置变更应当在 bean 注册流程开始之前完成
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// 是否使用完整类型名作为默认 bean 名称
    pub use_full_type_names: bool,
    /// 是否在注册时检测重复的 bean 名称
    pub detect_duplicated_bean_names: bool,
    /// 解析 bean 参数时是否跟随内部引用
    pub resolve_reference_parameters: bool,
    /// 默认作用域种类
    pub default_scope: ScopeBinding,
    default_wiring_mode: WiringMode,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            use_full_type_names: false,
            detect_duplicated_bean_names: false,
            resolve_reference_parameters: true,
            default_scope: ScopeBinding::of::<SingletonScope>(),
            default_wiring_mode: WiringMode::Strict,
        }
    }
}

impl ContainerConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置默认名称策略
    pub fn with_full_type_names(mut self, enabled: bool) -> Self {
        self.use_full_type_names = enabled;
        self
    }

    /// 设置重复名称检测
    pub fn with_detect_duplicated_bean_names(mut self, enabled: bool) -> Self {
        self.detect_duplicated_bean_names = enabled;
        self
    }

    /// 设置参数引用解析
    pub fn with_resolve_reference_parameters(mut self, enabled: bool) -> Self {
        self.resolve_reference_parameters = enabled;
        self
    }

    /// 设置默认作用域种类
    pub fn with_default_scope(mut self, binding: ScopeBinding) -> Self {
        self.default_scope = binding;
        self
    }

    /// 设置默认连线模式
    ///
    /// 默认连线模式必须是具体模式；`Default` 与 `None` 会被忽略
    pub fn with_default_wiring_mode(mut self, mode: WiringMode) -> Self {
        if matches!(mode, WiringMode::Default | WiringMode::None) {
            warn!(?mode, "默认连线模式必须是具体模式，保留原值");
            return self;
        }
        self.default_wiring_mode = mode;
        self
    }

    /// 当前的默认连线模式
    pub fn default_wiring_mode(&self) -> WiringMode {
        self.default_wiring_mode
    }
}
