//! 通知下发服务
//!
//! 在扇出引擎之前加一道管理员授权检查：通知下发属于特权操作，
//! 只有白名单内的管理员身份可以触发。授权策略由外部注入，
//! 与其他特权入口共用同一套校验逻辑。

use campus_shared::auth::AdminPolicy;
use tracing::info;

use crate::engine::FanoutEngine;
use crate::error::NotifierError;
use crate::models::{DeliveryOutcome, NotificationRequest};

/// 权限操作标识
const DISPATCH_OPERATION: &str = "notification:dispatch";

/// 通知下发服务
pub struct NotificationService {
    policy: AdminPolicy,
    engine: FanoutEngine,
}

impl NotificationService {
    pub fn new(policy: AdminPolicy, engine: FanoutEngine) -> Self {
        Self { policy, engine }
    }

    /// 以指定请求者身份下发一条通知
    ///
    /// 授权失败直接返回 `Forbidden`，不做任何目标解析或推送。
    pub async fn dispatch(
        &self,
        requester: &str,
        request: &NotificationRequest,
    ) -> Result<DeliveryOutcome, NotifierError> {
        self.policy
            .authorize(requester, DISPATCH_OPERATION)
            .map_err(NotifierError::from)?;

        info!(requester = %requester, title = %request.title, "管理员触发通知下发");
        self.engine.send(request).await
    }
}
