//! 通知扇出集成测试
//!
//! 使用脚本化的传输替身验证分批、批次故障隔离、计数聚合与
//! 失效令牌清理的端到端行为。清理是后台任务，测试只断言
//! 最终效果，不假设完成顺序。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use campus_shared::config::PushConfig;
use notification_fanout::{
    DeliveryErrorKind, DeliveryOutcome, FanoutEngine, MemoryDirectory, NotificationRequest,
    NotifierError, PushPayload, PushTransport, RecipientFilter, RecipientRecord, TokenDelivery,
};

// ==================== 测试替身 ====================

/// 单个批次的预设行为
#[derive(Debug, Clone)]
enum ChunkScript {
    /// 全部成功
    Succeed,
    /// 全部失败，统一错误分类
    FailAll(DeliveryErrorKind),
    /// 批次调用本身抛错
    Error,
    /// 首个令牌成功，其余按失效令牌处理
    StaleAfterFirst,
}

/// 脚本化推送传输
///
/// 按调用次序执行预设脚本，并记录每次调用的批次大小。
struct ScriptedTransport {
    scripts: Vec<ChunkScript>,
    chunk_sizes: Mutex<Vec<usize>>,
}

impl ScriptedTransport {
    fn new(scripts: Vec<ChunkScript>) -> Self {
        Self {
            scripts,
            chunk_sizes: Mutex::new(Vec::new()),
        }
    }

    fn recorded_chunk_sizes(&self) -> Vec<usize> {
        self.chunk_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for ScriptedTransport {
    async fn send_to_topic(
        &self,
        _topic: &str,
        _payload: &PushPayload,
    ) -> Result<String, NotifierError> {
        Err(NotifierError::Transport("不应走到主题推送".to_string()))
    }

    async fn send_multicast(
        &self,
        tokens: &[String],
        _payload: &PushPayload,
    ) -> Result<Vec<TokenDelivery>, NotifierError> {
        let call_index = {
            let mut sizes = self.chunk_sizes.lock().unwrap();
            sizes.push(tokens.len());
            sizes.len() - 1
        };

        let script = self
            .scripts
            .get(call_index)
            .cloned()
            .unwrap_or(ChunkScript::Succeed);

        match script {
            ChunkScript::Succeed => Ok(tokens.iter().map(|_| TokenDelivery::success()).collect()),
            ChunkScript::FailAll(kind) => Ok(tokens
                .iter()
                .map(|_| TokenDelivery::failure(kind.clone()))
                .collect()),
            ChunkScript::Error => Err(NotifierError::Transport("模拟批次级故障".to_string())),
            ChunkScript::StaleAfterFirst => Ok(tokens
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    if i == 0 {
                        TokenDelivery::success()
                    } else {
                        TokenDelivery::failure(DeliveryErrorKind::Unregistered)
                    }
                })
                .collect()),
        }
    }
}

fn student_record(token: Option<String>) -> RecipientRecord {
    RecipientRecord {
        role: "student".to_string(),
        branch: "CSE".to_string(),
        year: 2,
        section: "A".to_string(),
        token,
    }
}

fn token_request(tokens: Vec<String>) -> NotificationRequest {
    NotificationRequest {
        title: "奖学金公示".to_string(),
        body: "名单已在教务系统公布".to_string(),
        tokens,
        ..Default::default()
    }
}

fn filter_request(filter: RecipientFilter) -> NotificationRequest {
    NotificationRequest {
        title: "教学楼停电".to_string(),
        body: "明天上午九点至十二点".to_string(),
        filters: Some(filter),
        ..Default::default()
    }
}

fn engine_with(
    directory: Arc<MemoryDirectory>,
    transport: Arc<ScriptedTransport>,
) -> FanoutEngine {
    FanoutEngine::new(directory, transport, PushConfig::default())
}

/// 轮询等待目录收敛到期望的记录数
async fn wait_for_directory_count(directory: &MemoryDirectory, expected: usize) {
    for _ in 0..200 {
        if directory.count().await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "目录未在期限内收敛: 期望 {} 实际 {}",
        expected,
        directory.count().await
    );
}

// ==================== 分批与计数 ====================

#[tokio::test]
async fn test_1200_tokens_are_sent_in_three_chunks() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let engine = engine_with(Arc::new(MemoryDirectory::new()), Arc::clone(&transport));

    let tokens: Vec<String> = (0..1200).map(|i| format!("tok-{i}")).collect();
    let outcome = engine.send(&token_request(tokens)).await.unwrap();

    assert_eq!(transport.recorded_chunk_sizes(), vec![500, 500, 200]);
    assert_eq!(
        outcome,
        DeliveryOutcome::Multicast {
            success_count: 1200,
            failure_count: 0,
            recipient_count: 1200,
        }
    );
}

#[tokio::test]
async fn test_chunk_level_error_is_isolated_from_siblings() {
    // 第二批传输调用抛错：该批次不计入任何计数，第三批照常执行
    let transport = Arc::new(ScriptedTransport::new(vec![
        ChunkScript::Succeed,
        ChunkScript::Error,
        ChunkScript::Succeed,
    ]));
    let engine = engine_with(Arc::new(MemoryDirectory::new()), Arc::clone(&transport));

    let tokens: Vec<String> = (0..1200).map(|i| format!("tok-{i}")).collect();
    let outcome = engine.send(&token_request(tokens)).await.unwrap();

    assert_eq!(transport.recorded_chunk_sizes(), vec![500, 500, 200]);
    assert_eq!(
        outcome,
        DeliveryOutcome::Multicast {
            success_count: 700,
            failure_count: 0,
            recipient_count: 1200,
        }
    );
}

#[tokio::test]
async fn test_non_stale_failures_count_but_trigger_no_cleanup() {
    let directory = Arc::new(MemoryDirectory::new());
    directory
        .insert_many((0..3).map(|i| student_record(Some(format!("tok-{i}")))))
        .await;

    let transport = Arc::new(ScriptedTransport::new(vec![ChunkScript::FailAll(
        DeliveryErrorKind::Other("quota exceeded".to_string()),
    )]));
    let engine = engine_with(Arc::clone(&directory), transport);

    let outcome = engine
        .send(&filter_request(RecipientFilter::default()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DeliveryOutcome::Multicast {
            success_count: 0,
            failure_count: 3,
            recipient_count: 3,
        }
    );

    // 非失效类错误不触发删除，目录保持原样
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(directory.count().await, 3);
}

// ==================== 失效令牌清理 ====================

#[tokio::test]
async fn test_stale_tokens_are_eventually_removed() {
    let directory = Arc::new(MemoryDirectory::new());
    directory
        .insert_many((0..3).map(|i| student_record(Some(format!("tok-{i}")))))
        .await;

    let transport = Arc::new(ScriptedTransport::new(vec![ChunkScript::StaleAfterFirst]));
    let engine = engine_with(Arc::clone(&directory), transport);

    let outcome = engine
        .send(&filter_request(RecipientFilter::default()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DeliveryOutcome::Multicast {
            success_count: 1,
            failure_count: 2,
            recipient_count: 3,
        }
    );

    // 清理是后台任务，只断言最终效果
    wait_for_directory_count(&directory, 1).await;
}

// ==================== 目标解析 ====================

#[tokio::test]
async fn test_records_without_tokens_are_dropped() {
    let directory = Arc::new(MemoryDirectory::new());
    directory
        .insert_many(vec![
            student_record(Some("tok-0".to_string())),
            student_record(None),
            student_record(Some(String::new())),
        ])
        .await;

    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let engine = engine_with(directory, Arc::clone(&transport));

    let outcome = engine
        .send(&filter_request(RecipientFilter::default()))
        .await
        .unwrap();

    // 只有一条记录携带非空令牌
    assert_eq!(transport.recorded_chunk_sizes(), vec![1]);
    assert!(matches!(
        outcome,
        DeliveryOutcome::Multicast {
            recipient_count: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn test_role_all_sentinel_matches_every_role() {
    let directory = Arc::new(MemoryDirectory::new());
    directory
        .insert_many(vec![
            student_record(Some("tok-student".to_string())),
            RecipientRecord {
                role: "faculty".to_string(),
                branch: "CSE".to_string(),
                year: 0,
                section: "-".to_string(),
                token: Some("tok-faculty".to_string()),
            },
        ])
        .await;

    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let engine = engine_with(Arc::clone(&directory), Arc::clone(&transport));

    // role=all：两条记录都命中
    let outcome = engine
        .send(&filter_request(RecipientFilter {
            role: Some("all".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        DeliveryOutcome::Multicast {
            recipient_count: 2,
            ..
        }
    ));

    // role=student：只命中学生记录
    let outcome = engine
        .send(&filter_request(RecipientFilter {
            role: Some("student".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        DeliveryOutcome::Multicast {
            recipient_count: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn test_empty_resolution_is_not_an_error() {
    let transport = Arc::new(ScriptedTransport::new(vec![]));
    let engine = engine_with(Arc::new(MemoryDirectory::new()), Arc::clone(&transport));

    let outcome = engine
        .send(&filter_request(RecipientFilter {
            role: Some("student".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(outcome, DeliveryOutcome::NoRecipients);
    assert!(transport.recorded_chunk_sizes().is_empty());
}
