//! 通知扇出领域模型

use serde::{Deserialize, Serialize};

use crate::error::NotifierError;

/// 收件人属性过滤条件
///
/// 各字段为等值约束，出现的字段以 AND 组合；role 取哨兵值 "all"
/// 时不限制角色。
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipientFilter {
    pub role: Option<String>,
    pub branch: Option<String>,
    pub year: Option<i32>,
    pub section: Option<String>,
}

impl RecipientFilter {
    /// role 约束是否生效（存在且不是 "all"）
    pub fn role_constraint(&self) -> Option<&str> {
        self.role
            .as_deref()
            .filter(|r| !r.eq_ignore_ascii_case("all"))
    }
}

/// 收件人目录记录
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientRecord {
    pub role: String,
    pub branch: String,
    pub year: i32,
    pub section: String,
    /// 推送令牌；注册推送前的用户没有该字段
    pub token: Option<String>,
}

/// 通知请求（来自上层 API 处理器的原始形状）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    pub topic: Option<String>,
    pub image_url: Option<String>,
    pub filters: Option<RecipientFilter>,
}

/// 投递目标
///
/// 从请求中解析得到，三种形态互斥。
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// 显式令牌列表，原样使用
    Tokens(Vec<String>),
    /// 主题广播，绕过收件人解析
    Topic(String),
    /// 属性过滤，查询收件人目录
    Filter(RecipientFilter),
}

impl NotificationRequest {
    /// 校验必填内容字段
    ///
    /// title/body 缺失时在任何目录查询或传输调用之前拒绝整个请求。
    pub fn validate(&self) -> Result<(), NotifierError> {
        if self.title.trim().is_empty() {
            return Err(NotifierError::MissingContent { field: "title" });
        }
        if self.body.trim().is_empty() {
            return Err(NotifierError::MissingContent { field: "body" });
        }
        Ok(())
    }

    /// 解析投递目标
    ///
    /// 优先级：非空令牌列表 > 主题 > 过滤条件；三者都缺省时
    /// 退化为空过滤条件（等价于全量过滤查询）。
    pub fn target(&self) -> Target {
        if !self.tokens.is_empty() {
            return Target::Tokens(self.tokens.clone());
        }
        if let Some(topic) = self.topic.as_deref().filter(|t| !t.trim().is_empty()) {
            return Target::Topic(topic.to_string());
        }
        Target::Filter(self.filters.clone().unwrap_or_default())
    }
}

/// 投递结果
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DeliveryOutcome {
    /// 主题广播：单次传输调用，携带传输方分配的消息标识
    Topic { message_id: String },
    /// 解析后没有任何收件人，区别于传输失败
    NoRecipients,
    /// 分批 multicast 的聚合计数
    Multicast {
        success_count: usize,
        failure_count: usize,
        /// 实际尝试投递的令牌总数
        recipient_count: usize,
    },
}
