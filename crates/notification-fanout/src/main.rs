//! 通知扇出服务入口
//!
//! 加载配置并初始化日志。推送传输与收件人目录的真实接入
//! 由部署环境装配，这里默认装配模拟实现。

use std::sync::Arc;

use campus_shared::auth::AdminPolicy;
use campus_shared::config::AppConfig;
use notification_fanout::{FanoutEngine, LoggingTransport, MemoryDirectory, NotificationService};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("notification-fanout")?;
    campus_shared::observability::init(&config.observability)?;

    let policy = AdminPolicy::from_config(&config.admin);
    let engine = FanoutEngine::new(
        Arc::new(MemoryDirectory::new()),
        Arc::new(LoggingTransport),
        config.push.clone(),
    );
    let _service = NotificationService::new(policy, engine);

    info!(
        service = %config.service_name,
        environment = %config.environment,
        "notification-fanout 已启动"
    );
    Ok(())
}
