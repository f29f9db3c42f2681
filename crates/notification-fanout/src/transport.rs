//! 推送传输
//!
//! 通过 `PushTransport` trait 抽象底层推送服务：主题广播与
//! multicast 批量推送。当前提供模拟实现（仅记录日志），便于在
//! 无外部依赖的情况下验证扇出管道的完整性；接入 FCM 等真实
//! 推送服务时只需实现同一 trait。

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::error::NotifierError;
use crate::payload::PushPayload;

/// 单个令牌的投递失败分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// 令牌格式非法
    InvalidToken,
    /// 令牌已注销
    Unregistered,
    /// 其他（可能是瞬时的）失败
    Other(String),
}

impl DeliveryErrorKind {
    /// 是否为永久失效令牌，应从收件人目录中清理
    pub fn is_stale_token(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::Unregistered)
    }
}

/// 单个令牌的投递回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDelivery {
    pub success: bool,
    pub error: Option<DeliveryErrorKind>,
}

impl TokenDelivery {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(kind: DeliveryErrorKind) -> Self {
        Self {
            success: false,
            error: Some(kind),
        }
    }
}

/// 推送传输接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// 向主题广播一条通知，返回传输方分配的消息标识
    async fn send_to_topic(
        &self,
        topic: &str,
        payload: &PushPayload,
    ) -> Result<String, NotifierError>;

    /// 向一批令牌（单次最多 500 个）推送同一载荷
    ///
    /// 返回与入参等长的逐令牌回执数组。
    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &PushPayload,
    ) -> Result<Vec<TokenDelivery>, NotifierError>;
}

/// 模拟推送传输
///
/// 生产环境中替换为 FCM 等推送服务的 SDK 调用
#[derive(Debug, Default)]
pub struct LoggingTransport;

#[async_trait]
impl PushTransport for LoggingTransport {
    async fn send_to_topic(
        &self,
        topic: &str,
        payload: &PushPayload,
    ) -> Result<String, NotifierError> {
        let message_id = Uuid::now_v7().to_string();

        info!(
            topic = %topic,
            message_id = %message_id,
            title = %payload.notification.title,
            "模拟发送主题推送"
        );

        Ok(message_id)
    }

    async fn send_multicast(
        &self,
        tokens: &[String],
        payload: &PushPayload,
    ) -> Result<Vec<TokenDelivery>, NotifierError> {
        info!(
            token_count = tokens.len(),
            title = %payload.notification.title,
            "模拟发送 multicast 推送"
        );

        Ok(tokens.iter().map(|_| TokenDelivery::success()).collect())
    }
}
