use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 单项成绩
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/score.ts")]
pub struct Score {
    pub id: i64,
    pub student_id: i64,
    pub evaluation_method_id: i64,
    // 原始分
    pub raw_score: f64,
    // 折算分 = 原始分 / 满分 * 权重
    pub weighted_score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 一次成绩写入的结果
#[derive(Debug)]
pub enum ScoreWrite {
    Saved(Vec<Score>),
    MethodNotFound,
    OutOfRange {
        student_id: i64,
        raw_score: f64,
        full_score: f64,
    },
    // 该学生同科目同学期已有其他年级的成绩
    GradeConflict { student_id: i64, grade: i32 },
}
