//! 管理员授权策略
//!
//! 基于邮箱白名单的管理员授权。白名单在进程启动时从配置加载一次，
//! 所有特权操作入口共用同一个校验函数，策略对象以引用方式注入，
//! 避免各调用点各自维护一份白名单常量。

use std::collections::HashSet;

use crate::config::AdminConfig;
use crate::error::{CampusError, Result};

/// 管理员授权策略
///
/// 邮箱匹配不区分大小写，加载时统一归一化为小写。
#[derive(Debug, Clone)]
pub struct AdminPolicy {
    emails: HashSet<String>,
}

impl AdminPolicy {
    /// 从配置构建策略
    pub fn from_config(config: &AdminConfig) -> Self {
        let emails = config
            .emails
            .iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// 判断指定邮箱是否在管理员白名单中
    pub fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    /// 校验指定邮箱对某项特权操作的访问权限
    ///
    /// 非管理员返回 `Forbidden`，由调用方直接向上传播。
    pub fn authorize(&self, email: &str, operation: &str) -> Result<()> {
        if self.is_admin(email) {
            Ok(())
        } else {
            Err(CampusError::Forbidden {
                operation: operation.to_string(),
            })
        }
    }
}
