//! 学号解析器
//!
//! 将固定格式的学号字符串解析为结构化元数据（专业、入学类型、当前学年），
//! 支持：
//! - 按位分段的渐进式校验（输入不完整时给出部分结果）
//! - 针对每个校验阶段的独立告警信息
//! - 以注入参考日期的方式计算学年，保证函数纯度和可测试性
//!
//! 解析永不失败：任何输入（包括空串和乱码）都返回一个可渲染的结果，
//! 供前端在用户逐字输入时实时反馈。

pub mod decoder;
pub mod models;

pub use decoder::{decode, decode_now};
pub use models::{BranchInfo, Detection, DetectionView, EntryType, Partial, Stage};
