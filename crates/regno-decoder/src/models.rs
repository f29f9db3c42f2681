//! 学号解析领域模型

use serde::Serialize;

/// 专业信息
///
/// 专业短码与院系全称的静态映射条目。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub branch: &'static str,
    pub department: &'static str,
}

/// 入学类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryType {
    /// 普通入学（一年级起读）
    Regular,
    /// 转段入学（直接进入二年级，学年计算加一）
    LateralEntry,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::LateralEntry => "Lateral Entry",
        }
    }
}

/// 校验阶段
///
/// 按学号中字段出现的先后排列，前一阶段失败即短路后续阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 入学年份后缀（第 0..2 位）
    YearSuffix,
    /// 学院代码（第 2..4 位）
    CollegeCode,
    /// 入学方式代码（第 4..6 位）
    EntryCode,
    /// 专业代码首位（第 6 位）
    BranchCategory,
    /// 专业代码（第 6..8 位）
    BranchCode,
}

/// 部分解析结果
///
/// 输入长度不足以完成全部校验时，记录已经推导出的字段。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Partial {
    /// 已推算的学年；在入学方式校验通过前保持未钳位状态
    pub calculated_year: Option<i32>,
    pub entry_type: Option<EntryType>,
}

/// 解析结果
///
/// 三种互斥的终态/中间态，调用方可据此区分"输入还不够"与"输入错了"，
/// 无需对告警文案做字符串匹配。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// 输入是合法前缀但尚不完整
    Incomplete(Partial),
    /// 某一阶段校验失败
    Invalid {
        stage: Stage,
        message: &'static str,
        partial: Partial,
    },
    /// 完整且全部校验通过
    Valid {
        branch: BranchInfo,
        entry_type: EntryType,
        /// 钳位到 1..=4 的当前学年
        calculated_year: u8,
    },
}

impl Detection {
    /// 告警文案，仅 `Invalid` 状态存在
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Self::Invalid { message, .. } => Some(message),
            _ => None,
        }
    }

    /// 已解析出的专业信息，仅 `Valid` 状态存在
    pub fn branch(&self) -> Option<&BranchInfo> {
        match self {
            Self::Valid { branch, .. } => Some(branch),
            _ => None,
        }
    }

    /// 已推导的入学类型
    pub fn entry_type(&self) -> Option<EntryType> {
        match self {
            Self::Valid { entry_type, .. } => Some(*entry_type),
            Self::Incomplete(partial) | Self::Invalid { partial, .. } => partial.entry_type,
        }
    }

    /// 已推算的学年
    pub fn calculated_year(&self) -> Option<i32> {
        match self {
            Self::Valid {
                calculated_year, ..
            } => Some(i32::from(*calculated_year)),
            Self::Incomplete(partial) | Self::Invalid { partial, .. } => partial.calculated_year,
        }
    }
}

/// 扁平视图
///
/// 序列化给前端的结构：data 与 warning 互斥，部分字段允许单独出现。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionView {
    pub data: Option<BranchInfo>,
    pub warning: Option<&'static str>,
    pub entry_type: Option<&'static str>,
    pub calculated_year: Option<i32>,
}

impl From<&Detection> for DetectionView {
    fn from(detection: &Detection) -> Self {
        Self {
            data: detection.branch().copied(),
            warning: detection.warning(),
            entry_type: detection.entry_type().map(|e| e.as_str()),
            calculated_year: detection.calculated_year(),
        }
    }
}
