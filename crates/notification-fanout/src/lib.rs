//! 通知扇出服务
//!
//! 将一条通知内容按目标规格（显式令牌列表、主题或属性过滤条件）
//! 解析为具体的收件人集合，按固定批次大小执行 multicast 推送，
//! 汇总各批次的成功/失败计数，并对永久失效的推送令牌做后台清理。
//!
//! 收件人目录与推送传输均为 trait 缝隙，生产环境接入真实的
//! 目录服务与推送 SDK，测试与开发环境使用内存目录与日志传输。

pub mod directory;
pub mod engine;
pub mod error;
pub mod models;
pub mod payload;
pub mod service;
pub mod transport;

pub use directory::{MemoryDirectory, RecipientDirectory};
pub use engine::{FanoutEngine, MULTICAST_CHUNK_SIZE};
pub use error::NotifierError;
pub use models::{DeliveryOutcome, NotificationRequest, RecipientFilter, RecipientRecord, Target};
pub use payload::PushPayload;
pub use service::NotificationService;
pub use transport::{DeliveryErrorKind, LoggingTransport, PushTransport, TokenDelivery};
