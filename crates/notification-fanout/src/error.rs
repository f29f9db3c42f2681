//! 通知服务错误类型
//!
//! 定义请求校验、目录查询和推送传输等场景的错误分类，
//! 便于上层区分"请求本身不合法"与"下游服务异常"。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("通知内容缺失: {field}")]
    MissingContent { field: &'static str },

    #[error("收件人目录查询失败: {0}")]
    Directory(String),

    #[error("推送传输失败: {0}")]
    Transport(String),

    #[error(transparent)]
    Shared(#[from] campus_shared::error::CampusError),
}
