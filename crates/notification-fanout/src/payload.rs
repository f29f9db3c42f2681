//! 推送载荷构造
//!
//! 一份载荷同时携带通用通知块和 web push 专用块：web push 块
//! 复制标题正文并追加固定的图标、角标与点击跳转链接。
//! 配图为可选项，提供时同时写入两个块。

use campus_shared::config::PushConfig;
use serde::Serialize;

use crate::models::NotificationRequest;

/// 通用通知块
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationBlock {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// web push 专用通知块
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebPushNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// web push 点击行为配置
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FcmOptions {
    pub link: String,
}

/// web push 块
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebPushBlock {
    pub notification: WebPushNotification,
    pub fcm_options: FcmOptions,
}

/// 推送载荷
///
/// 所有批次共用同一份载荷，令牌列表在传输调用时单独传入。
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PushPayload {
    pub notification: NotificationBlock,
    pub webpush: WebPushBlock,
}

impl PushPayload {
    /// 从通知请求和推送资源配置构造载荷
    pub fn from_request(request: &NotificationRequest, push: &PushConfig) -> Self {
        Self {
            notification: NotificationBlock {
                title: request.title.clone(),
                body: request.body.clone(),
                image: request.image_url.clone(),
            },
            webpush: WebPushBlock {
                notification: WebPushNotification {
                    title: request.title.clone(),
                    body: request.body.clone(),
                    icon: push.icon.clone(),
                    badge: push.badge.clone(),
                    image: request.image_url.clone(),
                },
                fcm_options: FcmOptions {
                    link: push.click_link.clone(),
                },
            },
        }
    }
}
