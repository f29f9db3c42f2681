//! 学号解析状态机
//!
//! 按字段偏移逐段校验：入学年份 -> 学院代码 -> 入学方式 -> 专业代码。
//! 每一段只有在输入足够长时才会执行，前一段失败立即短路返回，
//! 因此对任意前缀输入都能给出当前最具体的反馈。

use chrono::{Datelike, NaiveDate, Utc};

use crate::models::{BranchInfo, Detection, EntryType, Partial, Stage};

/// 学院代码（学号第 2..4 位的固定字面量）
pub const COLLEGE_CODE: &str = "HP";

/// 普通入学代码
pub const REGULAR_ENTRY_CODE: &str = "1A";

/// 转段入学代码
pub const LATERAL_ENTRY_CODE: &str = "5A";

/// 专业代码允许的首位字符
const BRANCH_CATEGORY_DIGITS: &[char] = &['0', '1', '6'];

const WARN_YEAR: &str = "Invalid Year Format";
const WARN_COLLEGE: &str = "Invalid College Code";
const WARN_ENTRY: &str = "Invalid Entry Code";
const WARN_BRANCH: &str = "No Branch Found Re-check Ones";

/// 专业代码静态映射表
const BRANCH_TABLE: &[(&str, BranchInfo)] = &[
    (
        "01",
        BranchInfo {
            branch: "CE",
            department: "Civil Engineering",
        },
    ),
    (
        "02",
        BranchInfo {
            branch: "EEE",
            department: "Electrical and Electronics Engineering",
        },
    ),
    (
        "03",
        BranchInfo {
            branch: "ME",
            department: "Mechanical Engineering",
        },
    ),
    (
        "04",
        BranchInfo {
            branch: "ECE",
            department: "Electronics and Communication Engineering",
        },
    ),
    (
        "05",
        BranchInfo {
            branch: "CSE",
            department: "Computer Science and Engineering",
        },
    ),
    (
        "12",
        BranchInfo {
            branch: "IT",
            department: "Information Technology",
        },
    ),
    (
        "66",
        BranchInfo {
            branch: "CSM",
            department: "Computer Science and Engineering (AI & ML)",
        },
    ),
    (
        "67",
        BranchInfo {
            branch: "CSD",
            department: "Computer Science and Engineering (Data Science)",
        },
    ),
];

/// 按两位专业代码查表
fn branch_for(code: &str) -> Option<&'static BranchInfo> {
    BRANCH_TABLE
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, info)| info)
}

/// 解析学号
///
/// 纯函数：参考日期 `today` 由调用方注入，同一输入与日期必然得到同一结果。
/// 任何输入都不会 panic，非法或不完整的输入通过 [`Detection`] 的变体表达。
///
/// 学年规则：当前两位年份减去入学年份后缀；参考日期在 6 月及之后再加一
/// （学年在 6 月滚动，与日历年无关）；转段入学额外加一；最终钳位到 1..=4。
pub fn decode(reg_no: &str, today: NaiveDate) -> Detection {
    let normalized = reg_no.trim().to_uppercase();
    let chars: Vec<char> = normalized.chars().collect();

    let mut partial = Partial::default();

    // 阶段 1：入学年份后缀
    if chars.len() < 2 {
        return Detection::Incomplete(partial);
    }
    if !chars[0].is_ascii_digit() || !chars[1].is_ascii_digit() {
        return Detection::Invalid {
            stage: Stage::YearSuffix,
            message: WARN_YEAR,
            partial,
        };
    }
    let join_year =
        (chars[0].to_digit(10).unwrap_or(0) * 10 + chars[1].to_digit(10).unwrap_or(0)) as i32;

    let current_two_digit = today.year().rem_euclid(100);
    let mut year = current_two_digit - join_year;
    // month0 为 0 基，5 即 6 月：新学年从 6 月开始
    if today.month0() >= 5 {
        year += 1;
    }
    partial.calculated_year = Some(year);

    // 阶段 2：学院代码
    if chars.len() < 4 {
        return Detection::Incomplete(partial);
    }
    let college: String = chars[2..4].iter().collect();
    if college != COLLEGE_CODE {
        return Detection::Invalid {
            stage: Stage::CollegeCode,
            message: WARN_COLLEGE,
            partial,
        };
    }

    // 阶段 3：入学方式代码
    if chars.len() < 6 {
        return Detection::Incomplete(partial);
    }
    let entry_code: String = chars[4..6].iter().collect();
    let entry_type = match entry_code.as_str() {
        REGULAR_ENTRY_CODE => EntryType::Regular,
        LATERAL_ENTRY_CODE => {
            // 转段生直接进入高一年级
            year += 1;
            EntryType::LateralEntry
        }
        _ => {
            return Detection::Invalid {
                stage: Stage::EntryCode,
                message: WARN_ENTRY,
                partial,
            };
        }
    };
    // 转段调整之后统一钳位，只钳这一次
    let year = year.clamp(1, 4);
    partial.calculated_year = Some(year);
    partial.entry_type = Some(entry_type);

    // 阶段 4：专业代码首位
    if chars.len() < 7 {
        return Detection::Incomplete(partial);
    }
    if !BRANCH_CATEGORY_DIGITS.contains(&chars[6]) {
        return Detection::Invalid {
            stage: Stage::BranchCategory,
            message: WARN_BRANCH,
            partial,
        };
    }

    // 阶段 5：完整专业代码查表
    if chars.len() < 8 {
        return Detection::Incomplete(partial);
    }
    let branch_code: String = chars[6..8].iter().collect();
    match branch_for(&branch_code) {
        Some(info) => Detection::Valid {
            branch: *info,
            entry_type,
            calculated_year: year as u8,
        },
        None => Detection::Invalid {
            stage: Stage::BranchCode,
            message: WARN_BRANCH,
            partial,
        },
    }
}

/// 以当前 UTC 日期解析学号
///
/// [`decode`] 的便捷封装，仅此入口读取系统时钟。
pub fn decode_now(reg_no: &str) -> Detection {
    decode(reg_no, Utc::now().date_naive())
}
