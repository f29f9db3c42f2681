//! 共享库
//!
//! 包含各服务共用的配置加载、错误处理、管理员授权和日志初始化等基础设施代码。

pub mod auth;
pub mod config;
pub mod error;
pub mod observability;

pub use error::{CampusError, Result};
