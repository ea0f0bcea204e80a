use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 行为特点与综合意见
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/behavior.ts")]
pub struct Behavior {
    pub id: i64,
    pub student_id: i64,
    pub year: i32,
    pub semester: i32,
    pub content: String,
    // 撰写人（账号ID）
    pub written_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
