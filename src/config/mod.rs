//! 配置管理
//!
//! 按 `config.toml` → `config.{APP_ENV}.toml` → 环境变量 的顺序叠加加载。

mod r#impl;
mod structs;

pub use structs::*;
