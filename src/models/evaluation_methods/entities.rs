use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考核类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/evaluation_method.ts")]
pub enum ExamType {
    Written,     // 笔试
    Performance, // 表现性评价
}

impl std::fmt::Display for ExamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamType::Written => write!(f, "written"),
            ExamType::Performance => write!(f, "performance"),
        }
    }
}

impl std::str::FromStr for ExamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "written" => Ok(ExamType::Written),
            "performance" => Ok(ExamType::Performance),
            _ => Err(format!("Invalid exam type: {s}")),
        }
    }
}

/// 评价方式
///
/// 同一 (科目, 学年, 学期, 年级) 下所有评价方式的权重之和不超过 100。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/evaluation_method.ts")]
pub struct EvaluationMethod {
    pub id: i64,
    pub subject_id: i64,
    pub year: i32,
    pub semester: i32,
    pub grade: i32,
    pub exam_type: ExamType,
    pub title: String,
    // 权重（百分比）
    pub weight: f64,
    // 满分
    pub full_score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 评价方式所属的汇总范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/evaluation_method.ts")]
pub struct EvaluationScope {
    pub subject_id: i64,
    pub year: i32,
    pub semester: i32,
    pub grade: i32,
}

impl EvaluationMethod {
    pub fn scope(&self) -> EvaluationScope {
        EvaluationScope {
            subject_id: self.subject_id,
            year: self.year,
            semester: self.semester,
            grade: self.grade,
        }
    }

    /// 原始分是否在 `0..=full_score` 之内
    pub fn accepts(&self, raw_score: f64) -> bool {
        raw_score.is_finite() && raw_score >= 0.0 && raw_score <= self.full_score
    }

    /// 折算分 = 原始分 / 满分 * 权重，保留两位小数
    pub fn weighted_score(&self, raw_score: f64) -> f64 {
        if self.full_score <= 0.0 {
            return 0.0;
        }
        crate::utils::round2(raw_score / self.full_score * self.weight)
    }
}

/// 加入 `weight` 后范围内权重之和是否仍不超过 100
///
/// `others` 为同一范围内其他评价方式的权重。
pub fn weight_fits(others: impl Iterator<Item = f64>, weight: f64) -> bool {
    let total: f64 = others.sum::<f64>() + weight;
    crate::utils::round2(total) <= 100.0
}

/// 评价方式写入结果
#[derive(Debug)]
pub enum MethodWrite {
    Saved(EvaluationMethod),
    NotFound,
    // 范围内权重之和将超过 100
    WeightExceeded,
    // 缩小满分后已有原始分超出
    ScoreAboveFullScore { student_id: i64, raw_score: f64 },
}
