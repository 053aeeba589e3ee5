//! Wirecore 定义层的集中集成测试工程
//!
//! 测试用例位于 `tests/` 目录
