//! 通知扇出引擎
//!
//! 解析投递目标、构造载荷、按固定批次大小顺序推送并聚合计数。
//! 单个批次的传输异常只影响该批次自身的计数，不中断后续批次；
//! 永久失效的令牌通过独立后台任务做尽力而为的清理，清理的失败
//! 只记日志，不影响主响应。

use std::sync::Arc;

use campus_shared::config::PushConfig;
use tracing::{info, warn};

use crate::directory::RecipientDirectory;
use crate::error::NotifierError;
use crate::models::{DeliveryOutcome, NotificationRequest, Target};
use crate::payload::PushPayload;
use crate::transport::PushTransport;

/// 单次 multicast 调用的最大令牌数（多数推送传输的上限）
pub const MULTICAST_CHUNK_SIZE: usize = 500;

/// 通知扇出引擎
pub struct FanoutEngine {
    directory: Arc<dyn RecipientDirectory>,
    transport: Arc<dyn PushTransport>,
    push_config: PushConfig,
}

impl FanoutEngine {
    pub fn new(
        directory: Arc<dyn RecipientDirectory>,
        transport: Arc<dyn PushTransport>,
        push_config: PushConfig,
    ) -> Self {
        Self {
            directory,
            transport,
            push_config,
        }
    }

    /// 执行一次通知投递
    ///
    /// 仅在必填内容缺失时整体失败；目标解析之后的失败都是
    /// 按批次或按令牌隔离的部分失败，汇总在返回值中。
    pub async fn send(
        &self,
        request: &NotificationRequest,
    ) -> Result<DeliveryOutcome, NotifierError> {
        request.validate()?;

        let payload = PushPayload::from_request(request, &self.push_config);

        match request.target() {
            Target::Topic(topic) => {
                let message_id = self.transport.send_to_topic(&topic, &payload).await?;
                info!(topic = %topic, message_id = %message_id, "主题推送完成");
                Ok(DeliveryOutcome::Topic { message_id })
            }
            Target::Tokens(tokens) => self.multicast(tokens, &payload).await,
            Target::Filter(filter) => {
                let records = self.directory.query(&filter).await?;
                // 未注册推送或令牌为空的记录直接丢弃
                let tokens: Vec<String> = records
                    .into_iter()
                    .filter_map(|r| r.token)
                    .filter(|t| !t.is_empty())
                    .collect();
                self.multicast(tokens, &payload).await
            }
        }
    }

    /// 分批推送并聚合逐令牌回执
    async fn multicast(
        &self,
        tokens: Vec<String>,
        payload: &PushPayload,
    ) -> Result<DeliveryOutcome, NotifierError> {
        if tokens.is_empty() {
            info!("目标解析结果为空，未执行推送");
            return Ok(DeliveryOutcome::NoRecipients);
        }

        let recipient_count = tokens.len();
        let mut success_count = 0;
        let mut failure_count = 0;

        for chunk in tokens.chunks(MULTICAST_CHUNK_SIZE) {
            match self.transport.send_multicast(chunk, payload).await {
                Ok(deliveries) => {
                    for (token, delivery) in chunk.iter().zip(deliveries.iter()) {
                        if delivery.success {
                            success_count += 1;
                        } else {
                            failure_count += 1;
                            if delivery
                                .error
                                .as_ref()
                                .is_some_and(|kind| kind.is_stale_token())
                            {
                                self.spawn_token_cleanup(token.clone());
                            }
                        }
                    }
                }
                Err(e) => {
                    // 批次级异常：该批次不计入任何计数，继续后续批次
                    warn!(
                        error = %e,
                        chunk_size = chunk.len(),
                        "批次推送失败，跳过该批次"
                    );
                }
            }
        }

        info!(
            recipient_count,
            success_count, failure_count, "multicast 推送完成"
        );

        Ok(DeliveryOutcome::Multicast {
            success_count,
            failure_count,
            recipient_count,
        })
    }

    /// 派发失效令牌的后台清理任务
    ///
    /// 不等待完成，也不保证顺序；清理自身的失败只记日志。
    fn spawn_token_cleanup(&self, token: String) {
        let directory = Arc::clone(&self.directory);
        tokio::spawn(async move {
            if let Err(e) = directory.remove_token(&token).await {
                warn!(error = %e, "清理失效令牌失败");
            }
        });
    }
}
