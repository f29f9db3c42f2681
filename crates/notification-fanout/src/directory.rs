//! 收件人目录
//!
//! 通过 `RecipientDirectory` trait 抽象对托管目录服务的访问：
//! 等值条件查询与按令牌删除。生产环境由真实目录服务实现，
//! 测试与开发环境使用内存实现 `MemoryDirectory`。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::NotifierError;
use crate::models::{RecipientFilter, RecipientRecord};

/// 收件人目录访问接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    /// 按属性等值条件查询收件人记录
    ///
    /// 过滤条件中出现的字段以 AND 组合；role 为 "all" 时不限制角色。
    async fn query(&self, filter: &RecipientFilter) -> Result<Vec<RecipientRecord>, NotifierError>;

    /// 按推送令牌删除对应记录
    ///
    /// 用于清理传输方报告永久失效的令牌。
    async fn remove_token(&self, token: &str) -> Result<(), NotifierError>;
}

/// 内存收件人目录
///
/// 适用于测试和开发环境，不做持久化。
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    records: RwLock<Vec<RecipientRecord>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 批量写入收件人记录
    pub async fn insert_many(&self, records: impl IntoIterator<Item = RecipientRecord>) {
        self.records.write().await.extend(records);
    }

    /// 当前记录总数
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

/// 单条记录是否满足过滤条件
fn matches(record: &RecipientRecord, filter: &RecipientFilter) -> bool {
    if let Some(role) = filter.role_constraint() {
        if !record.role.eq_ignore_ascii_case(role) {
            return false;
        }
    }
    if let Some(branch) = &filter.branch {
        if &record.branch != branch {
            return false;
        }
    }
    if let Some(year) = filter.year {
        if record.year != year {
            return false;
        }
    }
    if let Some(section) = &filter.section {
        if &record.section != section {
            return false;
        }
    }
    true
}

#[async_trait]
impl RecipientDirectory for MemoryDirectory {
    async fn query(&self, filter: &RecipientFilter) -> Result<Vec<RecipientRecord>, NotifierError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| matches(r, filter))
            .cloned()
            .collect())
    }

    async fn remove_token(&self, token: &str) -> Result<(), NotifierError> {
        self.records
            .write()
            .await
            .retain(|r| r.token.as_deref() != Some(token));
        Ok(())
    }
}
